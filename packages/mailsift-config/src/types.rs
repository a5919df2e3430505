use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub dedup: Dedup,
	#[serde(default)]
	pub extraction: Extraction,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub generator: LlmProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	/// Sampling temperature for duplicate confirmation prompts. Extraction stages use
	/// `extraction.temperature` instead.
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Dedup {
	/// Minimum cosine similarity for a stored email to reach LLM confirmation.
	#[serde(default = "default_similarity_threshold")]
	pub similarity_threshold: f32,
	/// Minimum LLM similarity percentage (0-100) for a confirmed duplicate.
	#[serde(default = "default_llm_threshold")]
	pub llm_threshold: f64,
}
impl Default for Dedup {
	fn default() -> Self {
		Self {
			similarity_threshold: default_similarity_threshold(),
			llm_threshold: default_llm_threshold(),
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Extraction {
	#[serde(default = "default_extraction_temperature")]
	pub temperature: f32,
	#[serde(default = "default_retries")]
	pub retries: u32,
	/// Delay after failed attempt `n` (0-based) is `backoff_base_ms * 2^n`.
	#[serde(default = "default_backoff_base_ms")]
	pub backoff_base_ms: u64,
	#[serde(default = "default_min_entity_confidence")]
	pub min_entity_confidence: f32,
	/// Optional. Replaces the built-in merge vocabulary used by the key-phrase pre-pass.
	#[serde(default)]
	pub merge_terms: Option<Vec<String>>,
}
impl Default for Extraction {
	fn default() -> Self {
		Self {
			temperature: default_extraction_temperature(),
			retries: default_retries(),
			backoff_base_ms: default_backoff_base_ms(),
			min_entity_confidence: default_min_entity_confidence(),
			merge_terms: None,
		}
	}
}

fn default_similarity_threshold() -> f32 {
	0.85
}

fn default_llm_threshold() -> f64 {
	90.0
}

fn default_extraction_temperature() -> f32 {
	0.2
}

fn default_retries() -> u32 {
	3
}

fn default_backoff_base_ms() -> u64 {
	1_000
}

fn default_min_entity_confidence() -> f32 {
	0.8
}
