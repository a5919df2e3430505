use crate::{
	Error, Result,
	db::Db,
	models::{EmailDigest, NewEmail, StoredEmail},
};

pub async fn insert_email(db: &Db, email: &NewEmail) -> Result<i64> {
	let email_id: i64 = sqlx::query_scalar(
		"\
INSERT INTO emails (
	sender,
	recipient,
	subject,
	body,
	has_attachment,
	attachment_metadata,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, now())
RETURNING email_id",
	)
	.bind(email.sender.as_deref())
	.bind(email.recipient.as_deref())
	.bind(email.subject.as_deref())
	.bind(email.body.as_deref())
	.bind(email.has_attachment)
	.bind(email.attachment_metadata.as_ref())
	.fetch_one(&db.pool)
	.await?;

	Ok(email_id)
}

pub async fn get_email(db: &Db, email_id: i64) -> Result<Option<StoredEmail>> {
	let email = sqlx::query_as::<_, StoredEmail>(
		"\
SELECT
	email_id,
	sender,
	recipient,
	subject,
	body,
	message_path,
	request_type,
	sub_request_type,
	processing_status,
	has_attachment,
	attachment_metadata,
	category_type,
	category,
	created_at,
	updated_at
FROM emails
WHERE email_id = $1",
	)
	.bind(email_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(email)
}

/// Every stored email's body and attachment flag, oldest first.
pub async fn list_email_digests(db: &Db) -> Result<Vec<EmailDigest>> {
	let digests = sqlx::query_as::<_, EmailDigest>(
		"\
SELECT email_id, body, has_attachment
FROM emails
ORDER BY created_at ASC, email_id ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(digests)
}

pub async fn update_email_category(
	db: &Db,
	email_id: i64,
	category_type: Option<&str>,
	category: &str,
) -> Result<()> {
	let result = sqlx::query(
		"\
UPDATE emails
SET
	category_type = $1,
	category = $2,
	updated_at = now()
WHERE email_id = $3",
	)
	.bind(category_type)
	.bind(category)
	.bind(email_id)
	.execute(&db.pool)
	.await?;

	if result.rows_affected() == 0 {
		return Err(Error::NotFound(format!("Email {email_id} does not exist.")));
	}

	Ok(())
}
