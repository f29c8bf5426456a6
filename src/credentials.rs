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

// Credential loading: .env support and the Gemini API key presence check

use std::fmt;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Populate the process environment from a `.env` file in the working directory (or a parent).
/// Variables already set in the environment win over the file.
pub fn load_dotenv() -> Option<PathBuf> {
	match dotenvy::dotenv() {
		Ok(path) => {
			crate::log_debug!("Loaded environment from {}", path.display());
			Some(path)
		}
		Err(e) if e.not_found() => None,
		Err(e) => {
			crate::log_error!("Failed to load .env file: {}", e);
			None
		}
	}
}

/// Look a variable up in the process environment
pub fn env_lookup(name: &str) -> Option<String> {
	std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
}

/// Fetch the API key, or explain how to set it. `None` means the program should stop.
pub fn require_api_key<F, W>(lookup: F, out: &mut W) -> Result<Option<ApiKey>>
where
	F: Fn(&str) -> Option<String>,
	W: Write,
{
	if let Some(key) = ApiKey::from_lookup(lookup) {
		return Ok(Some(key));
	}

	writeln!(
		out,
		"CRITICAL: Please set the '{}' environment variable.",
		GEMINI_API_KEY_ENV
	)?;
	writeln!(out, "You can get a key from Google AI Studio.")?;
	Ok(None)
}

/// The Gemini API key. Presence is all that is checked here; the provider decides if it is usable.
#[derive(Clone, PartialEq)]
pub struct ApiKey(String);

impl ApiKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	/// Read the key through an arbitrary variable lookup
	pub fn from_lookup<F>(lookup: F) -> Option<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		lookup(GEMINI_API_KEY_ENV).map(Self)
	}

	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for ApiKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("ApiKey(***)")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_missing_key() {
		assert_eq!(ApiKey::from_lookup(|_| None), None);
	}

	#[test]
	fn test_present_key_is_kept_verbatim() {
		let key = ApiKey::from_lookup(|name| {
			(name == GEMINI_API_KEY_ENV).then(|| " abc ".to_string())
		})
		.unwrap();
		assert_eq!(key.expose(), " abc ");
	}

	#[test]
	fn test_empty_key_counts_as_present() {
		let key = ApiKey::from_lookup(|_| Some(String::new()));
		assert!(key.is_some());
	}

	#[test]
	fn test_require_api_key_reports_missing_key() {
		let mut out = Vec::new();
		let key = require_api_key(|_| None, &mut out).unwrap();

		assert!(key.is_none());
		assert_eq!(
			String::from_utf8(out).unwrap(),
			"CRITICAL: Please set the 'GEMINI_API_KEY' environment variable.\n\
			 You can get a key from Google AI Studio.\n"
		);
	}

	#[test]
	fn test_require_api_key_is_silent_when_present() {
		let mut out = Vec::new();
		let key = require_api_key(|_| Some("AIza-test-key".to_string()), &mut out).unwrap();

		assert_eq!(key, Some(ApiKey::new("AIza-test-key")));
		assert!(out.is_empty());
	}

	#[test]
	fn test_debug_redacts_secret() {
		let key = ApiKey::new("secret-value");
		assert!(!format!("{:?}", key).contains("secret-value"));
	}
}
