// Interactive chat module
mod animation;
pub mod commands;
mod input;
mod runner;

pub use commands::COMMANDS;
pub use runner::run_interactive_session;
