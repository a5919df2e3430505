pub(crate) fn duplicate_comparison(stored_body: &str, candidate_body: &str) -> String {
	format!(
		"\
Compare the following two emails and determine if they are duplicates.
- Consider minor wording differences.
- Check if one email has an attachment while the other does not.
- If they are duplicates, return a similarity percentage (0-100).

Email 1: {stored_body}
Email 2: {candidate_body}

Return only a numeric value."
	)
}

pub(crate) fn named_entities(text: &str) -> String {
	format!(
		"\
Extract financial entities from the following text and label them.
Return one entity per line in the format:
Entity: <value>, Type: <label>, Confidence Score: <0-1 range>
Do not include explanations or notes, only structured data.

Text:
{text}"
	)
}

pub(crate) fn key_phrases(merged_text: &str) -> String {
	format!(
		"\
Extract key phrases from the following text and return them as a comma-separated list.
Do not include explanations or notes.

Text:
{merged_text}"
	)
}

pub(crate) fn summary(text: &str) -> String {
	format!(
		"\
Summarize the following financial document in 4-5 concise, professional sentences.
Focus on the key financial actions and requests made.

Text:
{text}"
	)
}

pub(crate) fn categorization(extraction_json: &str) -> String {
	format!(
		"\
Categorize the following financial result, built from named entities, key phrases and a summary,
into request type, request sub type, deal name and confidence score.
Focus on the key financial actions and requests made.

Result:
{extraction_json}"
	)
}
