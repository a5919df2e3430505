use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.8;

// The entity value may itself contain commas ("Acme, Inc."), so it runs up to the last comma
// that is followed by `Type:`.
static ENTITY_LINE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(concat!(
		r"(?i)Entity:\s*([^,]+(?:,[^,]+)*)\s*,\s*",
		r"Type:\s*([^,]+?)\s*,\s*Confidence Score:\s*([\d.]+)",
	))
	.expect("entity line pattern must compile")
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedEntity {
	pub entity: String,
	pub label: String,
	pub confidence: f32,
}

/// Parses `Entity: <value>, Type: <label>, Confidence Score: <0-1>` lines.
///
/// Markdown emphasis is stripped and boilerplate lines are skipped. Entities below
/// `min_confidence` are dropped. Unrecognized lines and scores that are malformed or outside
/// `0..=1` are logged and skipped.
pub fn parse_entities(response_text: &str, min_confidence: f32) -> Vec<ExtractedEntity> {
	let mut entities = Vec::new();

	if response_text.trim().is_empty() {
		tracing::warn!("Received empty entity response.");

		return entities;
	}

	for raw_line in response_text.lines() {
		let line = raw_line.replace("**", "");
		let line = line.trim();

		if is_boilerplate(line) {
			continue;
		}

		let Some(captures) = ENTITY_LINE.captures(line) else {
			tracing::warn!(line, "Skipping unrecognized entity line.");

			continue;
		};
		let (entity, label, confidence) = (&captures[1], &captures[2], &captures[3]);
		let Ok(confidence) = confidence.parse::<f32>() else {
			tracing::warn!(line, "Skipping entity line with invalid confidence score.");

			continue;
		};

		if !(0.0..=1.0).contains(&confidence) {
			tracing::warn!(
				line,
				confidence,
				"Skipping entity line with out-of-range confidence score."
			);

			continue;
		}
		if confidence >= min_confidence {
			entities.push(ExtractedEntity {
				entity: entity.trim().to_string(),
				label: label.trim().to_string(),
				confidence,
			});
		}
	}

	entities
}

fn is_boilerplate(line: &str) -> bool {
	if line.is_empty() {
		return true;
	}

	let lower = line.to_lowercase();

	lower.contains("extraction of financial entities") || lower.contains("note")
}
