use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

pub const DEFAULT_APP_NAME: &str = "cachefetch";

const CONFIG_FILE: &str = "config.toml";

pub const ENV_APP_NAME: &str = "CACHEFETCH_APP_NAME";
pub const ENV_CACHE_DIR: &str = "CACHEFETCH_CACHE_DIR";
pub const ENV_TIMEOUT_SECS: &str = "CACHEFETCH_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
	/// Directory name used under the platform cache root.
	pub app_name: String,
	/// Explicit cache directory, bypassing platform resolution.
	pub cache_dir: Option<PathBuf>,
	/// Request timeout. Requests never time out when unset.
	pub timeout_secs: Option<u64>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			app_name: DEFAULT_APP_NAME.to_string(),
			cache_dir: None,
			timeout_secs: None,
		}
	}
}

impl Config {
	/// Reads the config file from the platform config directory, or returns the
	/// defaults when there is none.
	pub fn new() -> Result<Self> {
		match Self::default_path() {
			Some(path) if path.is_file() => Self::load(&path),
			_ => Ok(Self::default()),
		}
	}

	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.map_err(|e| Error::ConfigError(format!("Could not read {}: {}", path.display(), e)))?;
		let config: Config = toml::from_str(&content)?;
		tracing::debug!("Loaded config from {}", path.display());
		Ok(config)
	}

	pub fn from_env() -> Result<Self> {
		Self::new()?.apply_env(|key| std::env::var(key).ok())
	}

	/// Overrides fields from `CACHEFETCH_*` variables. Empty values are ignored.
	pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

		if let Some(app_name) = lookup(ENV_APP_NAME) {
			self.app_name = app_name;
		}
		if let Some(cache_dir) = lookup(ENV_CACHE_DIR) {
			self.cache_dir = Some(PathBuf::from(cache_dir));
		}
		if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
			let secs = timeout.parse::<u64>().map_err(|_| {
				Error::ConfigError(format!("{} must be a number of seconds, got '{}'", ENV_TIMEOUT_SECS, timeout))
			})?;
			self.timeout_secs = Some(secs);
		}

		Ok(self)
	}

	pub fn timeout(&self) -> Option<Duration> {
		self.timeout_secs.map(Duration::from_secs)
	}

	pub fn default_path() -> Option<PathBuf> {
		ProjectDirs::from("", "", DEFAULT_APP_NAME).map(|dirs| dirs.config_dir().join(CONFIG_FILE))
	}
}
