use std::sync::LazyLock;

use regex::Regex;

/// Organizational, currency and regulatory tokens that attach to the preceding word.
pub const MERGE_TERMS: &[&str] = &[
	"NA", "N.A.", "INC", "LTD", "LTD.", "LLC", "PLC", "GMBH", "CORP", "CORP.", "S.A.", "S.P.A.",
	"B.V.", "AG", "CO.", "U.S.", "USA", "U.K.", "UK", "E.U.", "EUR", "GBP", "USD", "INR", "JPY",
	"CNY", "AUD", "CHF", "CAD", "AUS$", "FBI", "CIA", "IRS", "FDA", "SEC", "S&P", "NASDAQ", "BANK",
	"GROUP", "INVESTMENTS", "PARTNERS", "ASSOCIATES", "PTY", "BHD", "ATF", "SYND.", "AGENCY",
	"FIRM",
];

// Words, keeping dotted or ampersand abbreviations ("U.S.", "S&P") and a trailing `$` together.
static WORD: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\w+(?:[.&]\w+)*[.$]?").expect("word pattern must compile")
});

static DIGIT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\d").expect("digit pattern must compile"));

/// A merge vocabulary matched against upper-cased words.
#[derive(Debug, Clone)]
pub struct MergeVocabulary {
	terms: Vec<String>,
}
impl MergeVocabulary {
	pub fn new<I, S>(terms: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self { terms: terms.into_iter().map(|term| term.as_ref().to_uppercase()).collect() }
	}

	pub fn contains(&self, word: &str) -> bool {
		self.terms.iter().any(|term| term == word)
	}

	/// Splits `text` into upper-cased words.
	///
	/// A trailing period is kept only when the dotted form is a vocabulary term, so sentence
	/// punctuation does not leak into words.
	pub fn tokenize(&self, text: &str) -> Vec<String> {
		let upper = text.to_uppercase();

		WORD.find_iter(&upper)
			.map(|m| {
				let word = m.as_str();

				match word.strip_suffix('.') {
					Some(stripped) if !self.contains(word) => stripped.to_string(),
					_ => word.to_string(),
				}
			})
			.collect()
	}

	/// Attaches each vocabulary term to the phrase before it.
	///
	/// A term with no preceding word opens a phrase of its own, which following terms extend.
	pub fn merge(&self, words: &[String]) -> Vec<String> {
		let mut phrases: Vec<String> = Vec::with_capacity(words.len());

		for word in words {
			match phrases.last_mut() {
				Some(last) if self.contains(word) => {
					last.push(' ');
					last.push_str(word);
				},
				_ => phrases.push(word.clone()),
			}
		}

		phrases
	}

	/// The text sent to the key-phrase prompt: merged phrases joined by single spaces.
	pub fn merge_text(&self, text: &str) -> String {
		self.merge(&self.tokenize(text)).join(" ")
	}
}
impl Default for MergeVocabulary {
	fn default() -> Self {
		Self::new(MERGE_TERMS)
	}
}

/// Splits a comma-separated provider response, dropping blanks and phrases containing digits.
pub fn filter_key_phrases(response_text: &str) -> Vec<String> {
	response_text
		.split(',')
		.map(str::trim)
		.filter(|phrase| !phrase.is_empty() && !DIGIT.is_match(phrase))
		.map(str::to_string)
		.collect()
}
