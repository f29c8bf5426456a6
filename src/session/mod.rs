// Chat session: the ordered turn log and the provider it is relayed through

pub mod agent;
pub mod chat;
pub mod chat_helper;
pub mod history;
pub mod providers;

pub use agent::{Agent, RelayOutcome};
pub use providers::{AiProvider, GenerationSettings, ProviderResponse, TokenUsage};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Model,
}

impl Role {
	/// Map a role string from the API. Anything that is not "user" is treated as the model.
	pub fn from_api(role: Option<&str>) -> Self {
		match role {
			Some("user") => Role::User,
			Some("model") | None => Role::Model,
			Some(other) => {
				crate::log_debug!("Unexpected turn role '{}', treating it as model", other);
				Role::Model
			}
		}
	}
}

/// One content part of a turn. Fields next to `text` (such as `thoughtSignature`)
/// and parts without a `text` field are kept verbatim, so the part is sent back unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Part {
	Text {
		text: String,
		#[serde(flatten)]
		extra: Map<String, Value>,
	},
	Other(Value),
}

impl Part {
	pub fn plain(text: impl Into<String>) -> Self {
		Part::Text {
			text: text.into(),
			extra: Map::new(),
		}
	}

	pub fn text(&self) -> Option<&str> {
		match self {
			Part::Text { text, .. } => Some(text),
			Part::Other(_) => None,
		}
	}

	/// Model reasoning marked with `"thought": true`
	pub fn is_thought(&self) -> bool {
		match self {
			Part::Text { extra, .. } => extra.get("thought").and_then(Value::as_bool) == Some(true),
			Part::Other(_) => false,
		}
	}
}

/// A role-tagged message in the conversation log (Gemini `Content`)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Turn {
	pub role: Role,
	#[serde(default)]
	pub parts: Vec<Part>,
}

impl Turn {
	pub fn user(text: impl Into<String>) -> Self {
		Self {
			role: Role::User,
			parts: vec![Part::plain(text)],
		}
	}

	pub fn model(text: impl Into<String>) -> Self {
		Self {
			role: Role::Model,
			parts: vec![Part::plain(text)],
		}
	}

	/// Text of the first part, if that part is text
	pub fn first_text(&self) -> Option<&str> {
		self.parts.first().and_then(Part::text)
	}

	/// All text parts joined together, without thought parts
	pub fn text(&self) -> String {
		self.parts
			.iter()
			.filter(|part| !part.is_thought())
			.filter_map(Part::text)
			.collect()
	}
}

/// An open chat session. The turn log only grows, one user and one model turn per successful exchange.
pub struct ChatSession {
	provider: Box<dyn AiProvider>,
	settings: GenerationSettings,
	history: Vec<Turn>,
}

impl ChatSession {
	pub fn new(provider: Box<dyn AiProvider>, settings: GenerationSettings) -> Self {
		Self {
			provider,
			settings,
			history: Vec::new(),
		}
	}

	pub fn model(&self) -> &str {
		&self.settings.model
	}

	pub fn provider_name(&self) -> &str {
		self.provider.name()
	}

	pub fn history(&self) -> &[Turn] {
		&self.history
	}

	/// Send a user message with the full history and return the reply text.
	/// On failure the history is left exactly as it was.
	pub async fn send_message(&mut self, message: &str) -> Result<String> {
		self.history.push(Turn::user(message));

		let result = self
			.provider
			.chat_completion(&self.history, &self.settings)
			.await;

		match result {
			Ok(response) => {
				if let Some(usage) = &response.usage {
					crate::log_info!(
						"Tokens: {} prompt, {} output, {} total",
						usage.prompt_tokens,
						usage.output_tokens,
						usage.total_tokens
					);
				}
				let text = response.content.text();
				self.history.push(response.content);
				Ok(text)
			}
			Err(e) => {
				self.history.pop();
				Err(e)
			}
		}
	}
}
