pub mod classify;
pub mod dedup;
pub mod emails;
pub mod extraction;
pub mod ingest;
pub mod prefilter;
pub mod time_serde;

mod error;
mod prompts;

pub use classify::{
	AttachmentText, CATEGORY_FALLBACK, ClassificationResult, ClassifyRequest, ExtractionOutput,
	NamedEntity,
};
pub use dedup::DuplicateMatch;
pub use emails::EmailRecord;
pub use error::{Error, Result};
pub use extraction::{SUMMARY_FALLBACK, Stage};
pub use ingest::{IngestOutcome, ParsedAttachment, ParsedEmail};
pub use prefilter::DuplicateCandidate;

use std::{future::Future, pin::Pin, sync::Arc};

use mailsift_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use mailsift_providers::{embedding, generator};
use mailsift_storage::{
	db::Db,
	models::{EmailDigest, NewEmail, StoredEmail},
	queries,
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait GenerativeProvider
where
	Self: Send + Sync,
{
	/// Returns the reply text. A reply without text content is an [`Error::Provider`].
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt: &'a str,
		temperature: f32,
	) -> BoxFuture<'a, Result<String>>;
}

/// Read and write access to stored emails. Nothing here deletes an email.
pub trait EmailStore
where
	Self: Send + Sync,
{
	/// Every stored email's body and attachment flag, in insertion order.
	fn list_email_digests(&self) -> BoxFuture<'_, Result<Vec<EmailDigest>>>;

	fn get_email(&self, email_id: i64) -> BoxFuture<'_, Result<Option<StoredEmail>>>;

	fn update_email_category<'a>(
		&'a self,
		email_id: i64,
		category_type: Option<&'a str>,
		category: &'a str,
	) -> BoxFuture<'a, Result<()>>;

	fn insert_email<'a>(&'a self, email: &'a NewEmail) -> BoxFuture<'a, Result<i64>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub generator: Arc<dyn GenerativeProvider>,
}

pub struct MailSiftService {
	pub cfg: Config,
	pub store: Arc<dyn EmailStore>,
	pub providers: Providers,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { embedding::embed(cfg, texts).await.map_err(Error::from) })
	}
}

impl GenerativeProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		prompt: &'a str,
		temperature: f32,
	) -> BoxFuture<'a, Result<String>> {
		Box::pin(
			async move { generator::generate(cfg, prompt, temperature).await.map_err(Error::from) },
		)
	}
}

impl EmailStore for Db {
	fn list_email_digests(&self) -> BoxFuture<'_, Result<Vec<EmailDigest>>> {
		Box::pin(async move { queries::list_email_digests(self).await.map_err(Error::from) })
	}

	fn get_email(&self, email_id: i64) -> BoxFuture<'_, Result<Option<StoredEmail>>> {
		Box::pin(async move { queries::get_email(self, email_id).await.map_err(Error::from) })
	}

	fn update_email_category<'a>(
		&'a self,
		email_id: i64,
		category_type: Option<&'a str>,
		category: &'a str,
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			queries::update_email_category(self, email_id, category_type, category)
				.await
				.map_err(Error::from)
		})
	}

	fn insert_email<'a>(&'a self, email: &'a NewEmail) -> BoxFuture<'a, Result<i64>> {
		Box::pin(async move { queries::insert_email(self, email).await.map_err(Error::from) })
	}
}

impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		generator: Arc<dyn GenerativeProvider>,
	) -> Self {
		Self { embedding, generator }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), generator: provider }
	}
}

impl MailSiftService {
	pub fn new(cfg: Config, store: Arc<dyn EmailStore>) -> Self {
		Self { cfg, store, providers: Providers::default() }
	}

	pub fn with_providers(cfg: Config, store: Arc<dyn EmailStore>, providers: Providers) -> Self {
		Self { cfg, store, providers }
	}
}
