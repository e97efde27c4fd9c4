//! Error types for descriptor parsing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading a descriptor or grammar file.
#[derive(Debug, Error)]
pub enum DescriptorError {
	/// Error reading a file from disk.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The descriptor is not well-formed XML.
	#[error("malformed descriptor {path}: {error}")]
	Xml {
		/// Path to the offending descriptor.
		path: PathBuf,
		/// The underlying XML error.
		error: roxmltree::Error,
	},

	/// Neither an `artifactId` nor a usable directory name was found.
	#[error("cannot derive a project name for {0}")]
	MissingName(PathBuf),

	/// A `.g4` file without a `grammar Name;` declaration.
	#[error("no grammar declaration found in {0}")]
	MissingGrammarDeclaration(PathBuf),
}

/// Result type for descriptor operations.
pub type Result<T> = std::result::Result<T, DescriptorError>;

pub(crate) fn read_file(path: &std::path::Path) -> Result<String> {
	std::fs::read_to_string(path).map_err(|error| DescriptorError::Io {
		path: path.to_path_buf(),
		error,
	})
}
