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

use serde::{Deserialize, Serialize};

fn default_persona_name() -> String {
	"Sage".to_string()
}

fn default_persona_title() -> String {
	"the Climate Tutor".to_string()
}

fn default_persona_farewell() -> String {
	"Goodbye! Stay curious about our planet!".to_string()
}

fn default_persona_instruction() -> String {
	concat!(
		"You are a friendly and encouraging AI tutor named 'Sage'. ",
		"Your goal is to help users learn about climate change. ",
		"Keep your answers concise, educational, and positive. ",
		"Always try to provide educational and verified scientific information. ",
	)
	.to_string()
}

// Persona shaping the assistant: display name plus the system instruction sent with every request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PersonaConfig {
	#[serde(default = "default_persona_name")]
	pub name: String,
	// Shown in the welcome banner after the name
	#[serde(default = "default_persona_title")]
	pub title: String,
	#[serde(default = "default_persona_farewell")]
	pub farewell: String,
	#[serde(default = "default_persona_instruction")]
	pub instruction: String,
}

impl Default for PersonaConfig {
	fn default() -> Self {
		Self {
			name: default_persona_name(),
			title: default_persona_title(),
			farewell: default_persona_farewell(),
			instruction: default_persona_instruction(),
		}
	}
}

impl PersonaConfig {
	/// Label used for model turns in the history dump
	pub fn history_label(&self) -> String {
		self.name.to_uppercase()
	}
}
