/// Cosine similarity in [-1, 1]. `None` when the vectors differ in length or either is zero.
pub fn cosine_similarity(lhs: &[f32], rhs: &[f32]) -> Option<f32> {
	if lhs.is_empty() || lhs.len() != rhs.len() {
		return None;
	}

	let mut dot = 0.0_f32;
	let mut lhs_norm = 0.0_f32;
	let mut rhs_norm = 0.0_f32;

	for (l, r) in lhs.iter().zip(rhs.iter()) {
		dot += l * r;
		lhs_norm += l * l;
		rhs_norm += r * r;
	}

	if lhs_norm <= f32::EPSILON || rhs_norm <= f32::EPSILON {
		return None;
	}

	Some((dot / (lhs_norm.sqrt() * rhs_norm.sqrt())).clamp(-1.0, 1.0))
}

/// Indices and scores of every corpus vector at or above `threshold`, in corpus order.
///
/// Vectors that cannot be compared (dimension mismatch, zero norm) are skipped.
pub fn above_threshold(query: &[f32], corpus: &[Vec<f32>], threshold: f32) -> Vec<(usize, f32)> {
	corpus
		.iter()
		.enumerate()
		.filter_map(|(index, vec)| {
			let score = cosine_similarity(query, vec)?;

			(score >= threshold).then_some((index, score))
		})
		.collect()
}
