mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, Dedup, EmbeddingProviderConfig, Extraction, LlmProviderConfig, Postgres, Providers,
	Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}

	for (label, api_base, api_key, model) in [
		(
			"embedding",
			&cfg.providers.embedding.api_base,
			&cfg.providers.embedding.api_key,
			&cfg.providers.embedding.model,
		),
		(
			"generator",
			&cfg.providers.generator.api_base,
			&cfg.providers.generator.api_key,
			&cfg.providers.generator.model,
		),
	] {
		for (field, value) in [("api_base", api_base), ("api_key", api_key), ("model", model)] {
			if value.trim().is_empty() {
				return Err(Error::Validation {
					message: format!("Provider {label} {field} must be non-empty."),
				});
			}
		}
	}

	if !cfg.providers.generator.temperature.is_finite()
		|| cfg.providers.generator.temperature < 0.0
	{
		return Err(Error::Validation {
			message: "providers.generator.temperature must be a finite number, zero or greater."
				.to_string(),
		});
	}

	let similarity = cfg.dedup.similarity_threshold;

	if !similarity.is_finite() {
		return Err(Error::Validation {
			message: "dedup.similarity_threshold must be a finite number.".to_string(),
		});
	}
	if !(-1.0..=1.0).contains(&similarity) {
		return Err(Error::Validation {
			message: "dedup.similarity_threshold must be in the range -1.0-1.0.".to_string(),
		});
	}

	let llm = cfg.dedup.llm_threshold;

	if !llm.is_finite() {
		return Err(Error::Validation {
			message: "dedup.llm_threshold must be a finite number.".to_string(),
		});
	}
	if !(0.0..=100.0).contains(&llm) {
		return Err(Error::Validation {
			message: "dedup.llm_threshold must be in the range 0-100.".to_string(),
		});
	}

	let extraction = &cfg.extraction;

	if !extraction.temperature.is_finite() || extraction.temperature < 0.0 {
		return Err(Error::Validation {
			message: "extraction.temperature must be a finite number, zero or greater."
				.to_string(),
		});
	}
	if extraction.retries == 0 {
		return Err(Error::Validation {
			message: "extraction.retries must be greater than zero.".to_string(),
		});
	}
	if !(0.0..=1.0).contains(&extraction.min_entity_confidence) {
		return Err(Error::Validation {
			message: "extraction.min_entity_confidence must be in the range 0.0-1.0."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if let Some(terms) = cfg.extraction.merge_terms.take() {
		let terms: Vec<String> = terms
			.into_iter()
			.map(|term| term.trim().to_uppercase())
			.filter(|term| !term.is_empty())
			.collect();

		if !terms.is_empty() {
			cfg.extraction.merge_terms = Some(terms);
		}
	}
}
