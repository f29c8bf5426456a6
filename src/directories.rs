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

// Directory utilities for cross-platform data directory management.
// Paths are only resolved here; nothing is created on disk.

use anyhow::Result;
use std::path::PathBuf;

/// Get the system-wide data directory for sage
///
/// This function returns the appropriate data directory based on the OS:
/// - macOS: ~/.local/share/sage
/// - Linux: ~/.local/share/sage (following XDG Base Directory specification)
/// - Windows: %LOCALAPPDATA%/sage
pub fn get_sage_data_dir() -> Result<PathBuf> {
	let Some(home) = dirs::home_dir() else {
		return Err(anyhow::anyhow!("Unable to determine home directory"));
	};

	#[cfg(target_os = "windows")]
	let path = match dirs::data_local_dir() {
		Some(dir) => dir.join("sage"),
		None => home.join("AppData").join("Local").join("sage"),
	};

	#[cfg(not(target_os = "windows"))]
	let path = home.join(".local").join("share").join("sage");

	Ok(path)
}

/// Get the configuration directory path
pub fn get_config_dir() -> Result<PathBuf> {
	Ok(get_sage_data_dir()?.join("config"))
}

/// Get the default configuration file path
pub fn get_config_file_path() -> Result<PathBuf> {
	Ok(get_config_dir()?.join("config.toml"))
}
