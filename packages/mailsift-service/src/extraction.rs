use std::time::Duration;

use mailsift_domain::{
	entities::{self, ExtractedEntity},
	input,
	phrases::{self, MergeVocabulary},
	retry::RetryPolicy,
};

use crate::{MailSiftService, Result, prompts};

pub const SUMMARY_FALLBACK: &str = "Summary generation failed.";

/// A generative call site that uses the shared retry contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	NamedEntities,
	KeyPhrases,
	Summary,
	Categorization,
}
impl Stage {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::NamedEntities => "named_entities",
			Self::KeyPhrases => "key_phrases",
			Self::Summary => "summary",
			Self::Categorization => "categorization",
		}
	}
}

impl MailSiftService {
	pub fn retry_policy(&self) -> RetryPolicy {
		RetryPolicy::new(
			self.cfg.extraction.retries,
			Duration::from_millis(self.cfg.extraction.backoff_base_ms),
		)
	}

	pub fn merge_vocabulary(&self) -> MergeVocabulary {
		match self.cfg.extraction.merge_terms.as_ref() {
			Some(terms) => MergeVocabulary::new(terms),
			None => MergeVocabulary::default(),
		}
	}

	/// Entities at or above `extraction.min_entity_confidence`. Empty once retries run out.
	pub async fn extract_named_entities(&self, text: &str) -> Result<Vec<ExtractedEntity>> {
		let text = input::validate_text(Some(text))?;
		let prompt = prompts::named_entities(text);
		let Some(reply) = self.generate_with_retry(Stage::NamedEntities, &prompt).await else {
			return Ok(Vec::new());
		};

		Ok(entities::parse_entities(&reply, self.cfg.extraction.min_entity_confidence))
	}

	/// Key phrases without digits. Empty once retries run out.
	///
	/// The prompt carries the merged upper-cased text rather than the original, so legal-entity
	/// names reach the provider as single phrases.
	pub async fn extract_key_phrases(&self, text: &str) -> Result<Vec<String>> {
		let text = input::validate_text(Some(text))?;
		let merged_text = self.merge_vocabulary().merge_text(text);
		let prompt = prompts::key_phrases(&merged_text);
		let Some(reply) = self.generate_with_retry(Stage::KeyPhrases, &prompt).await else {
			return Ok(Vec::new());
		};

		Ok(phrases::filter_key_phrases(&reply))
	}

	/// A short summary paragraph, or [`SUMMARY_FALLBACK`] once retries run out.
	pub async fn generate_summary(&self, text: &str) -> Result<String> {
		let text = input::validate_text(Some(text))?;
		let prompt = prompts::summary(text);
		let summary = self
			.generate_with_retry(Stage::Summary, &prompt)
			.await
			.unwrap_or_else(|| SUMMARY_FALLBACK.to_string());

		Ok(summary)
	}

	/// Calls the generator until it returns non-blank text, sleeping `2^attempt` backoff units
	/// between failed attempts. `None` once every attempt failed.
	pub(crate) async fn generate_with_retry(&self, stage: Stage, prompt: &str) -> Option<String> {
		let policy = self.retry_policy();
		let generator_cfg = &self.cfg.providers.generator;
		let temperature = self.cfg.extraction.temperature;

		for attempt in 0..policy.attempts {
			match self.providers.generator.generate(generator_cfg, prompt, temperature).await {
				Ok(reply) if !reply.trim().is_empty() => {
					tracing::debug!(
						stage = stage.as_str(),
						attempt,
						reply = reply.as_str(),
						"Generator replied."
					);

					return Some(reply.trim().to_string());
				},
				Ok(_) => {
					tracing::warn!(
						stage = stage.as_str(),
						attempt,
						"Generator returned an empty reply."
					);
				},
				Err(err) => {
					tracing::error!(
						stage = stage.as_str(),
						attempt,
						error = %err,
						"Generator call failed."
					);
				},
			}

			if policy.has_next(attempt) {
				tokio::time::sleep(policy.delay_for(attempt)).await;
			}
		}

		tracing::warn!(
			stage = stage.as_str(),
			attempts = policy.attempts,
			"Generator retries exhausted."
		);

		None
	}
}
