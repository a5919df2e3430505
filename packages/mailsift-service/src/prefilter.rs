use serde::Serialize;

use mailsift_config::EmbeddingProviderConfig;
use mailsift_domain::similarity;
use mailsift_storage::models::EmailDigest;

use crate::{EmbeddingProvider, Error, MailSiftService, Result};

/// A stored email whose embedding is close enough to the candidate to need LLM confirmation.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateCandidate {
	pub email_id: i64,
	pub body: String,
	pub has_attachment: bool,
	pub similarity: f32,
}

impl MailSiftService {
	/// Stored emails at or above `dedup.similarity_threshold`, in insertion order.
	pub async fn find_candidates(&self, body: &str) -> Result<Vec<DuplicateCandidate>> {
		let stored = self.store.list_email_digests().await?;

		prefilter(
			self.providers.embedding.as_ref(),
			&self.cfg.providers.embedding,
			body,
			stored,
			self.cfg.dedup.similarity_threshold,
		)
		.await
	}
}

/// Embeds the stored bodies as one batch and the candidate on its own, then keeps every stored
/// email whose cosine similarity reaches `threshold`.
///
/// No provider call is made when nothing comparable is stored. Stored emails with a blank body
/// are never candidates.
pub async fn prefilter(
	embedding: &dyn EmbeddingProvider,
	cfg: &EmbeddingProviderConfig,
	body: &str,
	stored: Vec<EmailDigest>,
	threshold: f32,
) -> Result<Vec<DuplicateCandidate>> {
	let stored: Vec<(EmailDigest, String)> = stored
		.into_iter()
		.filter_map(|digest| {
			let text = digest.body.as_deref().map(str::trim).filter(|text| !text.is_empty())?;
			let text = text.to_string();

			Some((digest, text))
		})
		.collect();

	if stored.is_empty() {
		return Ok(Vec::new());
	}

	let bodies: Vec<String> = stored.iter().map(|(_, text)| text.clone()).collect();
	let stored_vecs = embedding.embed(cfg, &bodies).await?;

	if stored_vecs.len() != bodies.len() {
		return Err(Error::Provider {
			message: "Embedding provider returned the wrong number of vectors for stored emails."
				.to_string(),
		});
	}

	let Some(query_vec) = embedding.embed(cfg, &[body.to_string()]).await?.into_iter().next()
	else {
		return Err(Error::Provider {
			message: "Embedding provider returned no vector for the candidate email.".to_string(),
		});
	};
	let hits = similarity::above_threshold(&query_vec, &stored_vecs, threshold);

	tracing::debug!(stored = stored.len(), candidates = hits.len(), threshold, "Pre-filter done.");

	Ok(hits
		.into_iter()
		.map(|(index, score)| {
			let (digest, text) = &stored[index];

			DuplicateCandidate {
				email_id: digest.email_id,
				body: text.clone(),
				has_attachment: digest.has_attachment,
				similarity: score,
			}
		})
		.collect())
}
