#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid input: Text must be a non-empty string.")]
pub struct InvalidInput;

/// Returns the trimmed text, or [`InvalidInput`] when nothing but whitespace is left.
pub fn validate_text(text: Option<&str>) -> Result<&str, InvalidInput> {
	let trimmed = text.map(str::trim).unwrap_or_default();

	if trimmed.is_empty() {
		tracing::error!("Invalid input: text must be a non-empty string.");

		return Err(InvalidInput);
	}

	Ok(trimmed)
}
