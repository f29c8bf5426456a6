// Keyword completer for rustyline
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hinter, HistoryHinter};
use rustyline::validate::Validator;
use rustyline::Helper;
use std::borrow::Cow::{self, Borrowed, Owned};
use colored::*;

struct KeywordCompleter {
	keywords: Vec<String>,
}

impl KeywordCompleter {
	fn new() -> Self {
		let keywords = crate::session::chat::COMMANDS.iter().map(|&s| s.to_string()).collect();
		Self { keywords }
	}

	// Keywords the typed line is a (case-insensitive) prefix of
	fn matching<'a>(&'a self, line: &'a str) -> impl Iterator<Item = &'a String> + 'a {
		let typed = line.to_lowercase();
		self.keywords
			.iter()
			.filter(move |keyword| !typed.is_empty() && keyword.starts_with(&typed))
	}

	fn is_keyword(&self, line: &str) -> bool {
		self.keywords.iter().any(|keyword| keyword.eq_ignore_ascii_case(line.trim()))
	}
}

impl Completer for KeywordCompleter {
	type Candidate = Pair;

	fn complete(
		&self,
		line: &str,
		_pos: usize,
		_ctx: &rustyline::Context<'_>,
	) -> Result<(usize, Vec<Self::Candidate>), ReadlineError> {
		let candidates: Vec<Pair> = self
			.matching(line)
			.map(|keyword| Pair {
				display: keyword.clone(),
				replacement: keyword.clone(),
			})
			.collect();

		Ok((0, candidates))
	}
}

impl Hinter for KeywordCompleter {
	type Hint = String;

	fn hint(&self, line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
		self.matching(line)
			.find_map(|keyword| keyword.get(line.len()..))
			.filter(|rest| !rest.is_empty())
			.map(str::to_string)
	}
}

impl Highlighter for KeywordCompleter {
	fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
		if self.is_keyword(line) {
			Owned(line.green().to_string())
		} else {
			Borrowed(line)
		}
	}

	fn highlight_char(&self, _line: &str, _pos: usize) -> bool {
		false
	}

	fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
		// Make hints appear in dim gray color - like bash autocomplete
		Owned(hint.bright_black().to_string())
	}
}

impl Validator for KeywordCompleter {}

// Helper for rustyline
pub struct KeywordHelper {
	completer: KeywordCompleter,
	hinter: HistoryHinter,
}

impl Default for KeywordHelper {
	fn default() -> Self {
		Self::new()
	}
}

impl KeywordHelper {
	pub fn new() -> Self {
		Self {
			completer: KeywordCompleter::new(),
			hinter: HistoryHinter {},
		}
	}
}

impl Helper for KeywordHelper {}

impl Completer for KeywordHelper {
	type Candidate = Pair;

	fn complete(
		&self,
		line: &str,
		pos: usize,
		ctx: &rustyline::Context<'_>,
	) -> Result<(usize, Vec<Self::Candidate>), ReadlineError> {
		self.completer.complete(line, pos, ctx)
	}
}

impl Hinter for KeywordHelper {
	type Hint = String;

	fn hint(&self, line: &str, pos: usize, ctx: &rustyline::Context<'_>) -> Option<Self::Hint> {
		self.completer
			.hint(line, pos, ctx)
			.or_else(|| self.hinter.hint(line, pos, ctx))
	}
}

impl Highlighter for KeywordHelper {
	fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
		self.completer.highlight(line, pos)
	}

	fn highlight_char(&self, line: &str, pos: usize) -> bool {
		self.completer.highlight_char(line, pos)
	}

	fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
		self.completer.highlight_hint(hint)
	}
}

impl Validator for KeywordHelper {}
