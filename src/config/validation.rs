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

use anyhow::{anyhow, Result};

use super::Config;

impl Config {
	/// Validate the configuration for common issues
	pub fn validate(&self) -> Result<()> {
		self.validate_temperature()?;

		if self.model.trim().is_empty() {
			return Err(anyhow!("Model name must not be empty"));
		}

		if self.persona.name.trim().is_empty() {
			return Err(anyhow!("Persona name must not be empty"));
		}

		if !(self.api_base.starts_with("https://") || self.api_base.starts_with("http://")) {
			return Err(anyhow!(
				"Invalid api_base '{}'. Must start with http:// or https://",
				self.api_base
			));
		}

		Ok(())
	}

	pub fn validate_temperature(&self) -> Result<()> {
		// NaN fails the range check as well
		if !(0.0..=1.0).contains(&self.temperature) {
			return Err(anyhow!(
				"Temperature must be between 0.0 and 1.0, got {}",
				self.temperature
			));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_config_is_valid() {
		assert!(Config::default().validate().is_ok());
	}

	#[test]
	fn test_temperature_bounds() {
		for temperature in [0.0, 0.5, 1.0] {
			let config = Config {
				temperature,
				..Default::default()
			};
			assert!(
				config.validate_temperature().is_ok(),
				"{} should be accepted",
				temperature
			);
		}

		for temperature in [-0.1, 1.01, f32::NAN] {
			let config = Config {
				temperature,
				..Default::default()
			};
			assert!(
				config.validate().is_err(),
				"{} should be rejected",
				temperature
			);
		}
	}

	#[test]
	fn test_empty_model_and_persona() {
		let config = Config {
			model: "  ".to_string(),
			..Default::default()
		};
		assert!(config.validate().is_err());

		let mut config = Config::default();
		config.persona.name = String::new();
		assert!(config.validate().is_err());
	}

	#[test]
	fn test_api_base_scheme() {
		let config = Config {
			api_base: "generativelanguage.googleapis.com".to_string(),
			..Default::default()
		};
		assert!(config.validate().is_err());

		let config = Config {
			api_base: "http://127.0.0.1:8080/v1beta".to_string(),
			..Default::default()
		};
		assert!(config.validate().is_ok());
	}
}
