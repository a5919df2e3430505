use serde::Serialize;

use mailsift_domain::duplicate::{self, AttachmentRelation};

use crate::{MailSiftService, prefilter::DuplicateCandidate, prompts};

/// The stored email a candidate was confirmed to duplicate.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateMatch {
	pub email_id: i64,
	pub similarity: f32,
	pub llm_score: f64,
	pub attachment: AttachmentRelation,
}

impl MailSiftService {
	pub async fn is_duplicate(&self, body: &str, has_attachment: bool) -> bool {
		self.find_duplicate(body, has_attachment).await.is_some()
	}

	/// Pre-filters stored emails by embedding similarity, then asks the generator to confirm
	/// each candidate. Failures degrade to "not a duplicate".
	pub async fn find_duplicate(&self, body: &str, has_attachment: bool) -> Option<DuplicateMatch> {
		if body.trim().is_empty() {
			tracing::info!("Candidate body is blank; skipping duplicate check.");

			return None;
		}

		let candidates = match self.find_candidates(body).await {
			Ok(candidates) => candidates,
			Err(err) => {
				tracing::error!(error = %err, "Duplicate pre-filter failed.");

				return None;
			},
		};

		if candidates.is_empty() {
			tracing::debug!("No stored email passed the similarity pre-filter.");

			return None;
		}

		self.confirm_duplicate(body, has_attachment, &candidates).await
	}

	/// Returns the first candidate, in pre-filter order, whose LLM similarity percentage reaches
	/// `dedup.llm_threshold`. A failed call or a non-numeric reply moves on to the next candidate.
	pub async fn confirm_duplicate(
		&self,
		body: &str,
		has_attachment: bool,
		candidates: &[DuplicateCandidate],
	) -> Option<DuplicateMatch> {
		let generator_cfg = &self.cfg.providers.generator;
		let llm_threshold = self.cfg.dedup.llm_threshold;

		for candidate in candidates {
			let prompt = prompts::duplicate_comparison(&candidate.body, body);
			let reply = match self
				.providers
				.generator
				.generate(generator_cfg, &prompt, generator_cfg.temperature)
				.await
			{
				Ok(reply) => reply,
				Err(err) => {
					tracing::warn!(
						error = %err,
						email_id = candidate.email_id,
						"Duplicate confirmation call failed."
					);

					continue;
				},
			};
			let Some(llm_score) = duplicate::parse_similarity_percentage(&reply) else {
				tracing::warn!(
					email_id = candidate.email_id,
					reply = reply.as_str(),
					"Generator declined to score the pair."
				);

				continue;
			};

			tracing::debug!(
				email_id = candidate.email_id,
				similarity = candidate.similarity,
				llm_score,
				llm_threshold,
				"Scored duplicate candidate."
			);

			if !duplicate::confirms_duplicate(llm_score, llm_threshold) {
				continue;
			}

			let attachment = AttachmentRelation::between(candidate.has_attachment, has_attachment);

			match attachment {
				AttachmentRelation::Same => tracing::info!(
					email_id = candidate.email_id,
					"Duplicate found with the same attachment state."
				),
				AttachmentRelation::Dropped => tracing::info!(
					email_id = candidate.email_id,
					"Duplicate found: the same email was sent earlier with an attachment."
				),
				AttachmentRelation::Added => tracing::info!(
					email_id = candidate.email_id,
					"Duplicate found: the same email was sent earlier, now with an attachment."
				),
			}

			return Some(DuplicateMatch {
				email_id: candidate.email_id,
				similarity: candidate.similarity,
				llm_score,
				attachment,
			});
		}

		None
	}
}
