// Chat keywords

pub const HISTORY_COMMAND: &str = "history";
pub const EXIT_COMMAND: &str = "exit";
pub const QUIT_COMMAND: &str = "quit";

// List of all keywords for autocomplete
pub const COMMANDS: [&str; 3] = [HISTORY_COMMAND, QUIT_COMMAND, EXIT_COMMAND];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
	Exit,
	History,
	Empty,
	Message(&'a str),
}

/// Classify a line of input. Keywords must be the whole line, in any case; a keyword with
/// surrounding spaces is an ordinary message. Messages are passed through as typed.
pub fn parse_input(input: &str) -> Command<'_> {
	if input.trim().is_empty() {
		Command::Empty
	} else if input.eq_ignore_ascii_case(QUIT_COMMAND) || input.eq_ignore_ascii_case(EXIT_COMMAND) {
		Command::Exit
	} else if input.eq_ignore_ascii_case(HISTORY_COMMAND) {
		Command::History
	} else {
		Command::Message(input)
	}
}
