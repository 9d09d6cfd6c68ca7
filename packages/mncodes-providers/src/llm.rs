use std::time::Duration;

use color_eyre::{Result, eyre};
use reqwest::Client;
use serde_json::Value;

/// Single-turn prompt completion. One user message, a max-token budget, and
/// the text content back. The client timeout comes from config; expiry is an
/// ordinary call failure, which callers treat as a fallback trigger.
pub async fn complete(
	cfg: &mncodes_config::LlmProviderConfig,
	max_tokens: u32,
	prompt: &str,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"max_tokens": max_tokens,
		"messages": [
			{ "role": "user", "content": prompt }
		],
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_completion_response(json)
}

// Accepts both messages-API responses (content[0].text) and
// chat-completions responses (choices[0].message.content).
fn parse_completion_response(json: Value) -> Result<String> {
	if let Some(text) = json
		.get("content")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|block| block.get("text"))
		.and_then(|t| t.as_str())
	{
		return Ok(text.to_string());
	}

	if let Some(text) = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
	{
		return Ok(text.to_string());
	}

	Err(eyre::eyre!("Completion response is missing text content."))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_messages_api_content() {
		let json = serde_json::json!({
			"content": [
				{ "type": "text", "text": "• Guards are required above 30 inches." }
			]
		});
		let parsed = parse_completion_response(json).expect("parse failed");

		assert!(parsed.starts_with("• Guards"));
	}

	#[test]
	fn parses_chat_completions_content() {
		let json = serde_json::json!({
			"choices": [
				{ "message": { "content": "general" } }
			]
		});
		let parsed = parse_completion_response(json).expect("parse failed");

		assert_eq!(parsed, "general");
	}

	#[test]
	fn rejects_response_without_text() {
		let json = serde_json::json!({ "content": [ { "type": "tool_use" } ] });

		assert!(parse_completion_response(json).is_err());
	}
}
