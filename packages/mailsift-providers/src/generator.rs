use serde_json::Value;

use mailsift_config::LlmProviderConfig;

use crate::{Error, Result};

/// Sends one user prompt to an OpenAI-compatible chat completion endpoint and returns the
/// trimmed reply text.
pub async fn generate(cfg: &LlmProviderConfig, prompt: &str, temperature: f32) -> Result<String> {
	let client = crate::client(cfg.timeout_ms)?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": temperature,
		"messages": [{ "role": "user", "content": prompt }],
	});
	let res = client
		.post(&url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_generation_text(&json)
}

fn parse_generation_text(json: &Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::invalid_response("Generator response is missing text content."))?;

	Ok(content.trim().to_string())
}
