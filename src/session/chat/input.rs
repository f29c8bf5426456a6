// User input handling module

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{CompletionType, Config as RustylineConfig, EditMode, Editor};

use crate::session::chat_helper::KeywordHelper;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserInput {
	Line(String),
	// Ctrl+C
	Interrupted,
	// Ctrl+D or closed stdin
	Eof,
}

/// Source of user lines for the chat loop
pub trait InputSource {
	fn read_input(&mut self, prompt: &str) -> Result<UserInput>;
}

/// Line editor on the controlling terminal with keyword completion and in-memory history
pub struct TerminalInput {
	editor: Editor<KeywordHelper, DefaultHistory>,
}

impl TerminalInput {
	pub fn new() -> Result<Self> {
		let config = RustylineConfig::builder()
			.completion_type(CompletionType::List)
			.edit_mode(EditMode::Emacs)
			.auto_add_history(true) // Automatically add lines to history
			.bell_style(rustyline::config::BellStyle::None) // No bell
			.build();

		let mut editor = Editor::with_config(config)?;
		editor.set_helper(Some(KeywordHelper::new()));

		Ok(Self { editor })
	}
}

impl InputSource for TerminalInput {
	fn read_input(&mut self, prompt: &str) -> Result<UserInput> {
		match self.editor.readline(prompt) {
			Ok(line) => Ok(UserInput::Line(line)),
			Err(ReadlineError::Interrupted) => Ok(UserInput::Interrupted),
			Err(ReadlineError::Eof) => Ok(UserInput::Eof),
			Err(err) => Err(err.into()),
		}
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use super::*;
	use std::collections::VecDeque;

	/// Replays a fixed script; an exhausted script reads as end of input
	pub struct ScriptedInput {
		events: VecDeque<Result<UserInput, String>>,
		pub prompts: Vec<String>,
	}

	impl ScriptedInput {
		pub fn lines(lines: &[&str]) -> Self {
			Self::events(
				lines
					.iter()
					.map(|line| Ok(UserInput::Line(line.to_string())))
					.collect(),
			)
		}

		pub fn events(events: Vec<Result<UserInput, String>>) -> Self {
			Self {
				events: events.into(),
				prompts: Vec::new(),
			}
		}
	}

	impl InputSource for ScriptedInput {
		fn read_input(&mut self, prompt: &str) -> Result<UserInput> {
			self.prompts.push(prompt.to_string());
			match self.events.pop_front() {
				Some(Ok(event)) => Ok(event),
				Some(Err(e)) => Err(anyhow::anyhow!(e)),
				None => Ok(UserInput::Eof),
			}
		}
	}
}
