// Copyright 2025 Muvon Un Limited
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

// Google Gemini (Generative Language API) provider implementation

use super::{AiProvider, GenerationSettings, ProviderResponse, TokenUsage};
use crate::credentials::ApiKey;
use crate::log_debug;
use crate::session::{Part, Role, Turn};
use anyhow::{Context, Result};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini provider talking to `models/{model}:generateContent`
pub struct GeminiProvider {
	client: Client,
	api_key: HeaderValue,
	api_base: String,
}

impl GeminiProvider {
	/// Build the HTTP client. Fails on a blank key or one that cannot be sent as a header.
	pub fn new(api_key: &ApiKey, api_base: &str) -> Result<Self> {
		if api_key.expose().trim().is_empty() {
			return Err(anyhow::anyhow!("API key is empty"));
		}

		let mut api_key = HeaderValue::from_str(api_key.expose())
			.context("API key contains characters that are not allowed in an HTTP header")?;
		api_key.set_sensitive(true);

		let client = Client::builder()
			.build()
			.context("Failed to build HTTP client")?;

		Ok(Self {
			client,
			api_key,
			api_base: api_base.trim_end_matches('/').to_string(),
		})
	}

	fn endpoint(&self, model: &str) -> String {
		format!("{}/models/{}:generateContent", self.api_base, model)
	}
}

#[async_trait::async_trait]
impl AiProvider for GeminiProvider {
	fn name(&self) -> &str {
		"google"
	}

	async fn chat_completion(
		&self,
		contents: &[Turn],
		settings: &GenerationSettings,
	) -> Result<ProviderResponse> {
		let api_url = self.endpoint(&settings.model);
		let request_body = build_request_body(contents, settings);

		log_debug!(
			"POST {} ({} turns, temperature {})",
			api_url,
			contents.len(),
			settings.temperature
		);

		let response = self
			.client
			.post(&api_url)
			.header(API_KEY_HEADER, self.api_key.clone())
			.header(CONTENT_TYPE, "application/json")
			.json(&request_body)
			.send()
			.await
			.context("Request to Gemini API failed")?;

		let status = response.status();
		let response_text = response
			.text()
			.await
			.context("Failed to read Gemini API response")?;

		parse_response(status, &response_text)
	}
}

/// Create the `generateContent` request body
pub fn build_request_body(contents: &[Turn], settings: &GenerationSettings) -> serde_json::Value {
	serde_json::json!({
		"systemInstruction": {
			"parts": [{ "text": settings.system_instruction }]
		},
		"contents": contents,
		"generationConfig": {
			"temperature": settings.temperature,
			"candidateCount": 1
		}
	})
}

/// Turn a raw HTTP response into the model turn, or an error describing what went wrong
pub fn parse_response(status: StatusCode, response_text: &str) -> Result<ProviderResponse> {
	let response_json: serde_json::Value = match serde_json::from_str(response_text) {
		Ok(json) => json,
		Err(e) if status.is_success() => {
			return Err(anyhow::anyhow!(
				"Failed to parse response JSON: {}. Response: {}",
				e,
				response_text
			));
		}
		Err(_) => serde_json::Value::Null,
	};

	// Handle error responses
	if !status.is_success() {
		let mut error_details = vec![format!("HTTP {}", status)];

		if let Some(error_obj) = response_json.get("error") {
			if let Some(msg) = error_obj.get("message").and_then(|m| m.as_str()) {
				error_details.push(format!("Message: {}", msg));
			}
			if let Some(code) = error_obj.get("status").and_then(|c| c.as_str()) {
				error_details.push(format!("Status: {}", code));
			}
		}

		if error_details.len() == 1 && !response_text.trim().is_empty() {
			error_details.push(format!("Raw response: {}", response_text));
		}

		return Err(anyhow::anyhow!(
			"Gemini API error: {}",
			error_details.join(" | ")
		));
	}

	let candidate = match response_json
		.get("candidates")
		.and_then(|c| c.as_array())
		.and_then(|candidates| candidates.first())
	{
		Some(candidate) => candidate,
		None => {
			let block_reason = response_json
				.get("promptFeedback")
				.and_then(|f| f.get("blockReason"))
				.and_then(|r| r.as_str());
			return Err(match block_reason {
				Some(reason) => anyhow::anyhow!("Prompt was blocked: {}", reason),
				None => anyhow::anyhow!("Gemini API returned no candidates"),
			});
		}
	};

	let finish_reason = candidate
		.get("finishReason")
		.and_then(|fr| fr.as_str())
		.map(|s| s.to_string());

	if let Some(ref reason) = finish_reason {
		log_debug!("Finish reason: {}", reason);
	}

	let parts: Vec<Part> = match candidate.get("content").and_then(|c| c.get("parts")) {
		Some(parts) => serde_json::from_value(parts.clone())
			.context("Failed to parse response content parts")?,
		None => Vec::new(),
	};

	if parts.is_empty() {
		return Err(anyhow::anyhow!(
			"Gemini API returned an empty candidate (finish reason: {})",
			finish_reason.as_deref().unwrap_or("unknown")
		));
	}

	let role = Role::from_api(
		candidate
			.get("content")
			.and_then(|c| c.get("role"))
			.and_then(|r| r.as_str()),
	);

	let usage = response_json.get("usageMetadata").map(|usage_obj| {
		let prompt_tokens = usage_obj
			.get("promptTokenCount")
			.and_then(|v| v.as_u64())
			.unwrap_or(0);
		let output_tokens = usage_obj
			.get("candidatesTokenCount")
			.and_then(|v| v.as_u64())
			.unwrap_or(0);
		let total_tokens = usage_obj
			.get("totalTokenCount")
			.and_then(|v| v.as_u64())
			.unwrap_or(prompt_tokens + output_tokens);

		TokenUsage {
			prompt_tokens,
			output_tokens,
			total_tokens,
		}
	});

	Ok(ProviderResponse {
		content: Turn { role, parts },
		usage,
		finish_reason,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn settings() -> GenerationSettings {
		GenerationSettings {
			model: "gemini-2.5-flash".to_string(),
			temperature: 0.7,
			system_instruction: "Be Sage.".to_string(),
		}
	}

	#[test]
	fn test_new_rejects_unusable_keys() {
		let base = "https://example.invalid/v1beta";
		assert!(GeminiProvider::new(&ApiKey::new(""), base).is_err());
		assert!(GeminiProvider::new(&ApiKey::new("   "), base).is_err());
		assert!(GeminiProvider::new(&ApiKey::new("bad\nkey"), base).is_err());
		assert!(GeminiProvider::new(&ApiKey::new("AIza-test-key"), base).is_ok());
	}

	#[test]
	fn test_endpoint() {
		let provider =
			GeminiProvider::new(&ApiKey::new("key"), "http://localhost:9000/v1beta/").unwrap();
		assert_eq!(
			provider.endpoint("gemini-2.5-flash"),
			"http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
		);
	}

	#[test]
	fn test_request_body_carries_persona_temperature_and_history() {
		let contents = vec![
			Turn::user("What is climate change?"),
			Turn::model("Long-term shifts."),
			Turn::user("Why?"),
		];
		let body = build_request_body(&contents, &settings());

		assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be Sage.");
		let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
		assert!((temperature - 0.7).abs() < 1e-6);
		assert_eq!(body["contents"].as_array().unwrap().len(), 3);
		assert_eq!(body["contents"][1]["role"], "model");
		assert_eq!(body["contents"][2]["parts"][0]["text"], "Why?");
	}

	#[test]
	fn test_parse_success() {
		let body = r#"{
			"candidates": [{
				"content": {"role": "model", "parts": [{"text": "Climate "}, {"text": "change."}]},
				"finishReason": "STOP"
			}],
			"usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5, "totalTokenCount": 17}
		}"#;
		let response = parse_response(StatusCode::OK, body).unwrap();

		assert_eq!(response.content.role, Role::Model);
		assert_eq!(response.content.text(), "Climate change.");
		assert_eq!(response.finish_reason.as_deref(), Some("STOP"));
		assert_eq!(
			response.usage,
			Some(TokenUsage {
				prompt_tokens: 12,
				output_tokens: 5,
				total_tokens: 17,
			})
		);
	}

	#[test]
	fn test_parse_keeps_non_text_parts() {
		let body = r#"{
			"candidates": [{
				"content": {"role": "model", "parts": [{"functionCall": {"name": "lookup", "args": {}}}]}
			}]
		}"#;
		let response = parse_response(StatusCode::OK, body).unwrap();

		assert_eq!(response.content.parts.len(), 1);
		assert_eq!(response.content.first_text(), None);
		assert_eq!(response.content.text(), "");
		assert!(response.usage.is_none());
	}

	#[test]
	fn test_parse_http_error() {
		let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}}"#;
		let err = parse_response(StatusCode::BAD_REQUEST, body).unwrap_err();
		let message = err.to_string();

		assert!(message.contains("HTTP 400"));
		assert!(message.contains("API key not valid."));
		assert!(message.contains("INVALID_ARGUMENT"));
	}

	#[test]
	fn test_parse_http_error_with_plain_body() {
		let err = parse_response(StatusCode::BAD_GATEWAY, "upstream timeout").unwrap_err();
		assert!(err.to_string().contains("Raw response: upstream timeout"));
	}

	#[test]
	fn test_parse_blocked_prompt() {
		let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
		let err = parse_response(StatusCode::OK, body).unwrap_err();
		assert!(err.to_string().contains("Prompt was blocked: SAFETY"));
	}

	#[test]
	fn test_parse_empty_candidate_and_bad_json() {
		let body = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
		let err = parse_response(StatusCode::OK, body).unwrap_err();
		assert!(err.to_string().contains("MAX_TOKENS"));

		let err = parse_response(StatusCode::OK, "not json").unwrap_err();
		assert!(err.to_string().contains("Failed to parse response JSON"));
	}
}
