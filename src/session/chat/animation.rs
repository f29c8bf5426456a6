// Animation module for loading indicators

use std::io::{stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use crossterm::{cursor, execute};
use anyhow::Result;
use colored::*;

// Animation frames for loading indicator
const LOADING_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Show a spinner with `label` until `cancel_flag` is set, then erase it
pub async fn show_loading_animation(cancel_flag: Arc<AtomicBool>, label: String) -> Result<()> {
	let mut stdout = stdout();
	let mut frame_idx = 0;
	let line = format!("{} is thinking...", label);

	// Save cursor position
	execute!(stdout, cursor::SavePosition)?;

	while !cancel_flag.load(Ordering::SeqCst) {
		execute!(stdout, cursor::RestorePosition)?;

		print!(" {} {}", LOADING_FRAMES[frame_idx].cyan(), line.bright_blue());

		stdout.flush()?;

		frame_idx = (frame_idx + 1) % LOADING_FRAMES.len();

		tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
	}

	// Overwrite the spinner line with spaces, leaving the cursor where it started
	execute!(stdout, cursor::RestorePosition)?;
	print!("{}", " ".repeat(line.chars().count() + 3));
	execute!(stdout, cursor::RestorePosition)?;
	stdout.flush()?;

	Ok(())
}
