use std::io;

use anyhow::Result;
use clap::Parser;

use sage::config::Config;
use sage::credentials;
use sage::session::chat::run_interactive_session;

#[derive(Parser)]
#[command(name = "sage")]
#[command(version)]
#[command(about = "Chat with Sage, a friendly climate tutor backed by the Gemini API")]
struct SageArgs {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
	let _args = SageArgs::parse();

	credentials::load_dotenv();

	let Some(api_key) = credentials::require_api_key(credentials::env_lookup, &mut io::stdout())?
	else {
		return Ok(());
	};

	let config = Config::load()?;
	sage::config::set_thread_config(&config);

	if let Some(path) = config.config_path() {
		sage::log_debug!("Using config file {}", path.display());
	}

	run_interactive_session(&config, &api_key).await
}
