use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("Environment error: {0}")]
	EnvironmentError(String),

	#[error("Failed to {action} {}: {source}", .path.display())]
	FilesystemError {
		action: &'static str,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to fetch {url}: {source}")]
	NetworkError {
		url: String,
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},

	#[error("Fetch of {url} failed: HTTP {status}")]
	HttpStatusError { url: String, status: u16 },

	#[error("Failed to parse JSON from {url}: {source}")]
	ParseError {
		url: String,
		#[source]
		source: serde_json::Error,
	},

	#[error("Serialization error: {0}")]
	SerializationError(String),

	#[error("Invalid cache path: {0}")]
	InvalidPath(String),

	#[error("Configuration error: {0}")]
	ConfigError(String),
}

impl Error {
	pub(crate) fn filesystem(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		Error::FilesystemError {
			action,
			path: path.into(),
			source,
		}
	}

	pub(crate) fn network(url: &str, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
		Error::NetworkError {
			url: url.to_string(),
			source: source.into(),
		}
	}

	/// HTTP status carried by an `HttpStatusError`.
	pub fn status(&self) -> Option<u16> {
		match self {
			Error::HttpStatusError { status, .. } => Some(*status),
			_ => None,
		}
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::SerializationError(err.to_string())
	}
}

impl From<toml::de::Error> for Error {
	fn from(err: toml::de::Error) -> Self {
		Error::ConfigError(err.to_string())
	}
}

pub type Result<T> = std::result::Result<T, Error>;
