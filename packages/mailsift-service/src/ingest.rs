use serde::{Deserialize, Serialize};
use serde_json::Value;

use mailsift_storage::models::NewEmail;

use crate::{MailSiftService, Result};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedAttachment {
	#[serde(default)]
	pub filename: Option<String>,
	#[serde(default)]
	pub extracted_text: Option<String>,
}

/// An email after MIME parsing and attachment text extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParsedEmail {
	#[serde(default)]
	pub subject: Option<String>,
	#[serde(default, rename = "from")]
	pub sender: Option<String>,
	#[serde(default, rename = "to")]
	pub recipient: Option<String>,
	#[serde(default)]
	pub body: Option<String>,
	#[serde(default)]
	pub attachments: Vec<ParsedAttachment>,
}
impl ParsedEmail {
	pub fn has_attachment(&self) -> bool {
		!self.attachments.is_empty()
	}

	fn attachment_metadata(&self) -> Option<Value> {
		if !self.has_attachment() {
			return None;
		}

		let names = self
			.attachments
			.iter()
			.map(|attachment| attachment.filename.clone().map_or(Value::Null, Value::String))
			.collect();

		Some(Value::Array(names))
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
	/// Id of the inserted row. `None` when the email was a duplicate.
	pub email_id: Option<i64>,
	pub is_duplicate: bool,
	pub duplicate_of: Option<i64>,
}

impl MailSiftService {
	/// Stores `email` unless it duplicates one already stored.
	pub async fn store_email(&self, email: &ParsedEmail) -> Result<IngestOutcome> {
		let body = email.body.as_deref().unwrap_or_default();
		let has_attachment = email.has_attachment();

		if let Some(found) = self.find_duplicate(body, has_attachment).await {
			tracing::info!(
				duplicate_of = found.email_id,
				attachment = found.attachment.as_str(),
				"Skipping duplicate email."
			);

			return Ok(IngestOutcome {
				email_id: None,
				is_duplicate: true,
				duplicate_of: Some(found.email_id),
			});
		}

		let new_email = NewEmail {
			sender: email.sender.clone(),
			recipient: email.recipient.clone(),
			subject: email.subject.clone(),
			body: email.body.clone(),
			has_attachment,
			attachment_metadata: email.attachment_metadata(),
		};
		let email_id = self.store.insert_email(&new_email).await?;

		tracing::info!(email_id, has_attachment, "Stored new email.");

		Ok(IngestOutcome { email_id: Some(email_id), is_duplicate: false, duplicate_of: None })
	}
}
