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

// Provider abstraction layer for the remote chat API

use crate::config::Config;
use crate::session::Turn;
use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod google;

pub use google::GeminiProvider;

/// Fixed per-session generation settings: persona, temperature, and model
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
	pub model: String,
	pub temperature: f32,
	pub system_instruction: String,
}

impl GenerationSettings {
	pub fn from_config(config: &Config) -> Self {
		Self {
			model: config.model.clone(),
			temperature: config.temperature,
			system_instruction: config.persona.instruction.clone(),
		}
	}
}

/// Token usage reported with a reply
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct TokenUsage {
	pub prompt_tokens: u64,
	pub output_tokens: u64,
	pub total_tokens: u64,
}

/// Provider response containing the model turn
#[derive(Debug, Clone)]
pub struct ProviderResponse {
	pub content: Turn,
	pub usage: Option<TokenUsage>,
	pub finish_reason: Option<String>,
}

/// Trait that chat providers implement
#[async_trait::async_trait]
pub trait AiProvider: Send + Sync {
	/// Get the provider name (e.g., "google")
	fn name(&self) -> &str;

	/// Send the whole conversation, ending with the new user turn, and return the model turn
	async fn chat_completion(
		&self,
		contents: &[Turn],
		settings: &GenerationSettings,
	) -> Result<ProviderResponse>;
}
