use serde::Serialize;

/// How the attachment state of a confirmed duplicate relates to the stored email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentRelation {
	/// Both have an attachment, or neither does.
	Same,
	/// The stored email had an attachment and the candidate does not.
	Dropped,
	/// The candidate arrives with an attachment the stored email lacked.
	Added,
}
impl AttachmentRelation {
	pub fn between(stored_has_attachment: bool, candidate_has_attachment: bool) -> Self {
		match (stored_has_attachment, candidate_has_attachment) {
			(true, false) => Self::Dropped,
			(false, true) => Self::Added,
			_ => Self::Same,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Same => "same",
			Self::Dropped => "dropped",
			Self::Added => "added",
		}
	}
}

/// Parses a bare numeric similarity percentage. Anything else means the provider declined.
pub fn parse_similarity_percentage(response_text: &str) -> Option<f64> {
	let score: f64 = response_text.trim().parse().ok()?;

	score.is_finite().then_some(score)
}

/// Every attachment relation confirms once the LLM score reaches the threshold.
pub fn confirms_duplicate(llm_score: f64, llm_threshold: f64) -> bool {
	llm_score >= llm_threshold
}
