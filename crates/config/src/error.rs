//! Error types for configuration parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when parsing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or an unexpected key.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A configuration file that does not deserialize.
	#[error("invalid configuration in {path}: {error}")]
	Invalid {
		/// Path to the offending file.
		path: PathBuf,
		/// The underlying TOML error.
		error: toml::de::Error,
	},

	/// A test timeout that `go test -timeout` would not accept.
	#[error("invalid timeout {0:?} (expected a Go duration such as 10s, 1.5s or 1m30s)")]
	InvalidTimeout(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
