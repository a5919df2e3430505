use serde_json::Value;
use time::OffsetDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredEmail {
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
	pub created_at: OffsetDateTime,
	pub updated_at: Option<OffsetDateTime>,
}

/// The slice of a stored email that duplicate detection compares against.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct EmailDigest {
	pub email_id: i64,
	pub body: Option<String>,
	pub has_attachment: bool,
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct NewEmail {
	pub sender: Option<String>,
	pub recipient: Option<String>,
	pub subject: Option<String>,
	pub body: Option<String>,
	pub has_attachment: bool,
	pub attachment_metadata: Option<Value>,
}
