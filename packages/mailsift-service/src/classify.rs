use serde::{Deserialize, Serialize};

use mailsift_domain::{entities::ExtractedEntity, input};

use crate::{MailSiftService, Result, extraction::Stage, prompts};

pub const CATEGORY_FALLBACK: &str = "Final response generation failed.";

/// An entity as it appears in the categorizer prompt. Confidence only gates extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedEntity {
	#[serde(rename = "Entity")]
	pub entity: String,
	#[serde(rename = "Type")]
	pub label: String,
}
impl From<ExtractedEntity> for NamedEntity {
	fn from(entity: ExtractedEntity) -> Self {
		Self { entity: entity.entity, label: entity.label }
	}
}

/// The combined extraction object fed to the categorizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionOutput {
	Extracted { named_entities: Vec<NamedEntity>, key_phrases: Vec<String>, summary: String },
	Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
	pub email_id: Option<i64>,
	pub category_type: Option<String>,
	pub extraction: ExtractionOutput,
	/// Raw categorizer text, or [`CATEGORY_FALLBACK`].
	pub category: String,
	pub persisted: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttachmentText {
	#[serde(default)]
	pub extracted_text: Option<String>,
}

/// An already-parsed email as handed over by ingestion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifyRequest {
	#[serde(default)]
	pub body: Option<String>,
	#[serde(default)]
	pub attachments: Vec<AttachmentText>,
	#[serde(default)]
	pub email_id: Option<i64>,
	#[serde(default)]
	pub category_type: Option<String>,
}
impl ClassifyRequest {
	/// Body and attachment texts joined by single spaces, trimmed.
	pub fn merged_text(&self) -> String {
		let attachment_texts =
			self.attachments.iter().filter_map(|attachment| attachment.extracted_text.as_ref());
		let parts: Vec<&str> =
			self.body.iter().chain(attachment_texts).map(String::as_str).collect();

		parts.join(" ").trim().to_string()
	}
}

impl MailSiftService {
	pub async fn classify_request(&self, request: &ClassifyRequest) -> ClassificationResult {
		let text = request.merged_text();

		self.classify(&text, request.email_id, request.category_type.as_deref()).await
	}

	/// Runs the extraction stages, categorizes their combined output and writes the category
	/// back when `email_id` is given. Never fails: every error ends up in the returned value.
	pub async fn classify(
		&self,
		text: &str,
		email_id: Option<i64>,
		category_type: Option<&str>,
	) -> ClassificationResult {
		let extraction = self.extract_output(text).await;
		let (category, persisted) = self.categorize(&extraction, email_id, category_type).await;

		ClassificationResult {
			email_id,
			category_type: category_type.map(str::to_string),
			extraction,
			category,
			persisted,
		}
	}

	/// Entities, key phrases and summary for `text`. A validation failure becomes
	/// [`ExtractionOutput::Failed`].
	pub async fn extract_output(&self, text: &str) -> ExtractionOutput {
		match self.try_extract_output(text).await {
			Ok(output) => output,
			Err(err) => {
				tracing::warn!(error = %err, "Extraction failed.");

				ExtractionOutput::Failed { error: err.to_string() }
			},
		}
	}

	async fn try_extract_output(&self, text: &str) -> Result<ExtractionOutput> {
		let named_entities = self
			.extract_named_entities(text)
			.await?
			.into_iter()
			.map(NamedEntity::from)
			.collect();
		let key_phrases = self.extract_key_phrases(text).await?;
		let summary = self.generate_summary(text).await?;

		Ok(ExtractionOutput::Extracted { named_entities, key_phrases, summary })
	}

	/// Returns the category text and whether it was written back to the store.
	pub async fn categorize(
		&self,
		extraction: &ExtractionOutput,
		email_id: Option<i64>,
		category_type: Option<&str>,
	) -> (String, bool) {
		let serialized = match serde_json::to_string_pretty(extraction) {
			Ok(serialized) => serialized,
			Err(err) => {
				tracing::error!(error = %err, "Failed to serialize extraction output.");

				return (CATEGORY_FALLBACK.to_string(), false);
			},
		};
		let Ok(serialized) = input::validate_text(Some(&serialized)) else {
			return (CATEGORY_FALLBACK.to_string(), false);
		};
		let prompt = prompts::categorization(serialized);
		let Some(category) = self.generate_with_retry(Stage::Categorization, &prompt).await else {
			return (CATEGORY_FALLBACK.to_string(), false);
		};
		let Some(email_id) = email_id else {
			return (category, false);
		};
		let persisted =
			match self.store.update_email_category(email_id, category_type, &category).await {
				Ok(()) => {
					tracing::info!(email_id, "Stored email category.");

					true
				},
				Err(err) => {
					tracing::error!(error = %err, email_id, "Failed to store email category.");

					false
				},
			};

		(category, persisted)
	}
}
