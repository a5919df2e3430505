use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

use mailsift_storage::models::StoredEmail;

use crate::{Error, MailSiftService, Result};

#[derive(Debug, Clone, Serialize)]
pub struct EmailRecord {
	pub email_id: i64,
	pub sender: Option<String>,
	pub recipient: Option<String>,
	pub subject: Option<String>,
	pub body: Option<String>,
	pub message_path: Option<String>,
	pub request_type: Option<String>,
	pub sub_request_type: Option<String>,
	pub processing_status: Option<String>,
	pub has_attachment: bool,
	pub attachment_metadata: Option<Value>,
	pub category_type: Option<String>,
	pub category: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde::option")]
	pub updated_at: Option<OffsetDateTime>,
}
impl From<StoredEmail> for EmailRecord {
	fn from(email: StoredEmail) -> Self {
		Self {
			email_id: email.email_id,
			sender: email.sender,
			recipient: email.recipient,
			subject: email.subject,
			body: email.body,
			message_path: email.message_path,
			request_type: email.request_type,
			sub_request_type: email.sub_request_type,
			processing_status: email.processing_status,
			has_attachment: email.has_attachment,
			attachment_metadata: email.attachment_metadata,
			category_type: email.category_type,
			category: email.category,
			created_at: email.created_at,
			updated_at: email.updated_at,
		}
	}
}

impl MailSiftService {
	pub async fn email(&self, email_id: i64) -> Result<EmailRecord> {
		let Some(email) = self.store.get_email(email_id).await? else {
			return Err(Error::NotFound { message: format!("Email {email_id} does not exist.") });
		};

		Ok(email.into())
	}
}
