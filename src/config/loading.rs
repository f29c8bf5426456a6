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

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

impl Config {
	/// Load configuration from the system-wide config file, falling back to defaults
	pub fn load() -> Result<Self> {
		Self::load_or_default(crate::directories::get_config_file_path()?)
	}

	/// Read an optional config file. A missing file yields defaults and touches nothing on disk.
	pub fn load_or_default(config_path: PathBuf) -> Result<Self> {
		if config_path.exists() {
			let mut config = Self::parse_file(&config_path)?;

			// A config that fails validation is reported but still used
			if let Err(e) = config.validate() {
				eprintln!("Configuration validation warning: {}", e);
				eprintln!("The application will continue, but you may want to fix these issues.");
			}

			config.config_path = Some(config_path);
			Ok(config)
		} else {
			Ok(Self {
				config_path: Some(config_path),
				..Default::default()
			})
		}
	}

	/// Load configuration from a specific file path
	pub fn load_from_path(path: &Path) -> Result<Self> {
		let mut config = Self::parse_file(path)?;
		config.config_path = Some(path.to_path_buf());

		config.validate()?;

		Ok(config)
	}

	fn parse_file(path: &Path) -> Result<Self> {
		let config_str = fs::read_to_string(path)
			.context(format!("Failed to read config from {}", path.display()))?;
		toml::from_str(&config_str).context("Failed to parse TOML configuration")
	}
}
