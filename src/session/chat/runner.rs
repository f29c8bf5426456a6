// Interactive session runner

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};

use super::animation::show_loading_animation;
use super::commands::{parse_input, Command, EXIT_COMMAND, HISTORY_COMMAND, QUIT_COMMAND};
use super::input::{InputSource, TerminalInput, UserInput};
use crate::config::{Config, PersonaConfig};
use crate::credentials::ApiKey;
use crate::session::history::print_history;
use crate::session::{Agent, RelayOutcome};
use crate::{log_debug, log_info};

pub const USER_PROMPT: &str = "You: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
	Running,
	Terminated,
}

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
	// Spinner while a request is in flight (terminal only)
	pub show_animation: bool,
}

fn farewell(persona: &PersonaConfig) -> String {
	format!("\n{}: {}", persona.name, persona.farewell)
}

pub fn write_welcome<W: Write>(out: &mut W, persona: &PersonaConfig) -> io::Result<()> {
	let rule = "-".repeat(54);
	writeln!(out)?;
	writeln!(out, "{}", rule)?;
	writeln!(
		out,
		"Welcome! You are chatting with {}, {}.",
		persona.name, persona.title
	)?;
	writeln!(out, "Type '{}' to see the conversation history.", HISTORY_COMMAND)?;
	writeln!(
		out,
		"Type '{}' or '{}' to end the session.",
		QUIT_COMMAND, EXIT_COMMAND
	)?;
	writeln!(out, "{}", rule)?;
	writeln!(out)?;
	out.flush()
}

/// Run the chat session on the terminal until the user leaves.
/// Expects the config to be installed with `set_thread_config` already.
pub async fn run_interactive_session(config: &Config, api_key: &ApiKey) -> Result<()> {
	let mut agent = Agent::initialize(config, api_key);
	install_interrupt_handler(agent.persona())?;

	let mut stdout = io::stdout();
	write_welcome(&mut stdout, agent.persona())?;

	let mut input = match TerminalInput::new() {
		Ok(input) => input,
		Err(e) => {
			println!("An unexpected error occurred: {:#}", e);
			return Ok(());
		}
	};

	let options = SessionOptions {
		show_animation: stdout.is_terminal(),
	};

	let state = run_chat_loop(&mut agent, &mut input, &mut stdout, &options).await;
	log_info!(
		"Session ended ({:?}) with {} turns",
		state,
		agent.history().len()
	);

	Ok(())
}

// Ctrl+C while a request is in flight ends the session. During input the line editor reports it instead.
fn install_interrupt_handler(persona: &PersonaConfig) -> Result<()> {
	let message = farewell(persona);
	ctrlc::set_handler(move || {
		println!("{}", message);
		std::process::exit(0);
	})
	.context("Error setting Ctrl+C handler")
}

/// Read-dispatch loop. Always ends in `Terminated`.
pub async fn run_chat_loop<I, W>(
	agent: &mut Agent,
	input: &mut I,
	out: &mut W,
	options: &SessionOptions,
) -> LoopState
where
	I: InputSource,
	W: Write,
{
	let mut state = LoopState::Running;

	while state == LoopState::Running {
		state = match step(agent, input, out, options).await {
			Ok(next) => next,
			Err(e) => {
				// Nothing sensible left to do if the output itself is gone
				let _ = writeln!(out, "An unexpected error occurred: {:#}", e);
				LoopState::Terminated
			}
		};
	}

	state
}

async fn step<I, W>(
	agent: &mut Agent,
	input: &mut I,
	out: &mut W,
	options: &SessionOptions,
) -> Result<LoopState>
where
	I: InputSource,
	W: Write,
{
	let line = match input.read_input(USER_PROMPT)? {
		UserInput::Line(line) => line,
		UserInput::Interrupted | UserInput::Eof => {
			writeln!(out, "{}", farewell(agent.persona()))?;
			return Ok(LoopState::Terminated);
		}
	};

	match parse_input(&line) {
		Command::Exit => {
			writeln!(out, "{}", farewell(agent.persona()))?;
			Ok(LoopState::Terminated)
		}
		Command::History => {
			print_history(out, &agent.history_lines())?;
			Ok(LoopState::Running)
		}
		Command::Empty => Ok(LoopState::Running),
		Command::Message(text) => {
			let outcome = relay(agent, text, options).await;
			writeln!(out, "{}: {}", agent.persona().name, outcome)?;
			out.flush()?;
			Ok(LoopState::Running)
		}
	}
}

async fn relay(agent: &mut Agent, text: &str, options: &SessionOptions) -> RelayOutcome {
	if !options.show_animation || !agent.is_ready() {
		return agent.send_message(text).await;
	}

	let cancel_flag = Arc::new(AtomicBool::new(false));
	let animation = tokio::spawn(show_loading_animation(
		cancel_flag.clone(),
		agent.persona().name.clone(),
	));

	let outcome = agent.send_message(text).await;

	cancel_flag.store(true, Ordering::SeqCst);
	if let Ok(Err(e)) = animation.await {
		log_debug!("Loading animation failed: {}", e);
	}

	outcome
}
