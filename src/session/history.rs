// Conversation history rendering

use std::io::{self, Write};

use super::{Role, Turn};

pub const HISTORY_HEADER: &str = "--- Conversation History ---";
pub const HISTORY_FOOTER: &str = "----------------------------";
pub const NON_TEXT_PLACEHOLDER: &str = "[Non-Text Content]";

pub const USER_LABEL: &str = "USER";

/// Render one turn as `[LABEL]: text`
pub fn format_turn(turn: &Turn, model_label: &str) -> String {
	let label = match turn.role {
		Role::User => USER_LABEL,
		Role::Model => model_label,
	};
	let text = turn.first_text().unwrap_or(NON_TEXT_PLACEHOLDER);
	format!("[{}]: {}", label, text)
}

/// Render the full history dump, banners included
pub fn format_history(turns: &[Turn], model_label: &str) -> Vec<String> {
	let mut lines = Vec::with_capacity(turns.len() + 4);
	lines.push(String::new());
	lines.push(HISTORY_HEADER.to_string());
	lines.extend(turns.iter().map(|turn| format_turn(turn, model_label)));
	lines.push(HISTORY_FOOTER.to_string());
	lines.push(String::new());
	lines
}

pub fn print_history<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
	for line in lines {
		writeln!(out, "{}", line)?;
	}
	out.flush()
}
