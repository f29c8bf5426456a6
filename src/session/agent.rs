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

// Session factory and message relay

use std::fmt;
use std::io::{self, Write};

use super::providers::{AiProvider, GeminiProvider, GenerationSettings};
use super::{ChatSession, Turn};
use crate::config::{Config, PersonaConfig};
use crate::credentials::ApiKey;

pub const DEGRADED_REPLY: &str = "Agent failed to initialize. Please check your API key setup.";

/// Result of relaying one message
#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
	Reply(String),
	/// The session was never opened; nothing was sent
	Degraded,
	RemoteError(String),
}

impl fmt::Display for RelayOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			RelayOutcome::Reply(text) => write!(f, "{}", text),
			RelayOutcome::Degraded => write!(f, "{}", DEGRADED_REPLY),
			RelayOutcome::RemoteError(detail) => {
				write!(f, "An error occurred during message processing: {}", detail)
			}
		}
	}
}

enum AgentState {
	Ready(ChatSession),
	Disabled { reason: String },
}

/// The chat agent: a persona plus either an open session or the reason it could not be opened
pub struct Agent {
	persona: PersonaConfig,
	state: AgentState,
}

impl Agent {
	/// Open the Gemini session. Never fails: on error the agent is left disabled and the reason is reported.
	pub fn initialize(config: &Config, api_key: &ApiKey) -> Self {
		Self::initialize_to(config, api_key, &mut io::stdout())
	}

	/// Same as `initialize`, reporting the outcome to `out`
	pub fn initialize_to<W: Write>(config: &Config, api_key: &ApiKey, out: &mut W) -> Self {
		let result = config.validate().and_then(|_| {
			GeminiProvider::new(api_key, &config.api_base)
				.map(|provider| Box::new(provider) as Box<dyn AiProvider>)
		});

		match result {
			Ok(provider) => {
				let agent = Self::with_provider(config, provider);
				let _ = writeln!(
					out,
					"Agent '{}' initialized using model: {}",
					agent.persona.name, config.model
				);
				agent
			}
			Err(e) => {
				let _ = writeln!(
					out,
					"Error initializing Gemini client. Make sure the {} environment variable is set.",
					crate::credentials::GEMINI_API_KEY_ENV
				);
				let _ = writeln!(out, "Details: {:#}", e);
				crate::log_debug!("Agent disabled: {:?}", e);
				Self::disabled(config, format!("{:#}", e))
			}
		}
	}

	pub fn with_provider(config: &Config, provider: Box<dyn AiProvider>) -> Self {
		Self {
			persona: config.persona.clone(),
			state: AgentState::Ready(ChatSession::new(
				provider,
				GenerationSettings::from_config(config),
			)),
		}
	}

	pub fn disabled(config: &Config, reason: impl Into<String>) -> Self {
		Self {
			persona: config.persona.clone(),
			state: AgentState::Disabled {
				reason: reason.into(),
			},
		}
	}

	pub fn persona(&self) -> &PersonaConfig {
		&self.persona
	}

	pub fn is_ready(&self) -> bool {
		matches!(self.state, AgentState::Ready(_))
	}

	pub fn disabled_reason(&self) -> Option<&str> {
		match &self.state {
			AgentState::Ready(_) => None,
			AgentState::Disabled { reason } => Some(reason),
		}
	}

	/// Relay a message. Failures come back as outcomes, never as errors.
	pub async fn send_message(&mut self, prompt: &str) -> RelayOutcome {
		let session = match &mut self.state {
			AgentState::Ready(session) => session,
			AgentState::Disabled { .. } => return RelayOutcome::Degraded,
		};

		match session.send_message(prompt).await {
			Ok(text) => RelayOutcome::Reply(text),
			Err(e) => {
				crate::log_debug!("Relay through {} failed: {:?}", session.provider_name(), e);
				RelayOutcome::RemoteError(format!("{:#}", e))
			}
		}
	}

	/// Turns exchanged so far; empty when the session was never opened
	pub fn history(&self) -> &[Turn] {
		match &self.state {
			AgentState::Ready(session) => session.history(),
			AgentState::Disabled { .. } => &[],
		}
	}

	/// Rendered history dump, one line per entry
	pub fn history_lines(&self) -> Vec<String> {
		super::history::format_history(self.history(), &self.persona.history_label())
	}

	pub fn model(&self) -> Option<&str> {
		match &self.state {
			AgentState::Ready(session) => Some(session.model()),
			AgentState::Disabled { .. } => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::session::testing::StubProvider;
	use crate::session::Role;
	use std::sync::atomic::Ordering;

	#[test]
	fn test_initialize_with_blank_key_is_disabled() {
		let agent = Agent::initialize(&Config::default(), &ApiKey::new(""));
		assert!(!agent.is_ready());
		assert!(agent.disabled_reason().unwrap().contains("empty"));
		assert!(agent.history().is_empty());
		assert_eq!(agent.model(), None);
	}

	#[test]
	fn test_initialize_with_invalid_config_is_disabled() {
		let mut config = Config::default();
		config.temperature = 3.0;
		let mut out = Vec::new();
		let agent = Agent::initialize_to(&config, &ApiKey::new("AIza-test-key"), &mut out);
		assert!(agent
			.disabled_reason()
			.unwrap()
			.contains("Temperature"));

		let printed = String::from_utf8(out).unwrap();
		let lines: Vec<&str> = printed.lines().collect();
		assert_eq!(
			lines[0],
			"Error initializing Gemini client. Make sure the GEMINI_API_KEY environment variable is set."
		);
		assert!(lines[1].starts_with("Details: "));
		assert!(lines[1].contains("Temperature"));
	}

	#[test]
	fn test_initialize_with_key_is_ready() {
		let mut out = Vec::new();
		let agent =
			Agent::initialize_to(&Config::default(), &ApiKey::new("AIza-test-key"), &mut out);
		assert!(agent.is_ready());
		assert_eq!(agent.model(), Some("gemini-2.5-flash"));
		assert_eq!(
			String::from_utf8(out).unwrap(),
			"Agent 'Sage' initialized using model: gemini-2.5-flash\n"
		);
	}

	#[tokio::test]
	async fn test_disabled_agent_never_calls_out() {
		let mut agent = Agent::disabled(&Config::default(), "no client");
		for prompt in ["hello", "What is climate change?", "  history please "] {
			let outcome = agent.send_message(prompt).await;
			assert_eq!(outcome, RelayOutcome::Degraded);
			assert_eq!(outcome.to_string(), DEGRADED_REPLY);
		}
		assert!(agent.history().is_empty());
	}

	#[tokio::test]
	async fn test_remote_failure_becomes_outcome() {
		let provider = StubProvider::new(vec![Err("HTTP 503 Service Unavailable".to_string())]);
		let mut agent = Agent::with_provider(&Config::default(), Box::new(provider));

		let outcome = agent.send_message("hi").await;
		assert_eq!(
			outcome,
			RelayOutcome::RemoteError("HTTP 503 Service Unavailable".to_string())
		);
		assert_eq!(
			outcome.to_string(),
			"An error occurred during message processing: HTTP 503 Service Unavailable"
		);
		assert!(agent.history().is_empty());
	}

	#[tokio::test]
	async fn test_history_alternates_after_n_relays() {
		let provider = StubProvider::echo();
		let calls = provider.calls.clone();
		let mut agent = Agent::with_provider(&Config::default(), Box::new(provider));

		let n = 4;
		for i in 0..n {
			let outcome = agent.send_message(&format!("question {}", i)).await;
			assert_eq!(outcome, RelayOutcome::Reply(format!("answer {}", i + 1)));
		}

		assert_eq!(calls.load(Ordering::SeqCst), n);
		let history = agent.history();
		assert_eq!(history.len(), 2 * n);
		for (i, turn) in history.iter().enumerate() {
			let expected = if i % 2 == 0 { Role::User } else { Role::Model };
			assert_eq!(turn.role, expected);
		}
		assert_eq!(history[0].first_text(), Some("question 0"));
		assert_eq!(history[7].first_text(), Some("answer 4"));
	}
}
