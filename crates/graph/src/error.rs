//! Error types for aggregation, rendering and output.

use std::path::PathBuf;

use grammake_descriptor::DescriptorError;
use thiserror::Error;

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum GraphError {
	/// A descriptor or grammar could not be read or parsed.
	#[error(transparent)]
	Descriptor(#[from] DescriptorError),

	/// The directory walk failed.
	#[error("failed to walk {path}: {error}")]
	Walk {
		/// Root of the walk.
		path: PathBuf,
		/// The underlying walk error.
		error: walkdir::Error,
	},

	/// Two descriptors derive the same project name.
	#[error("duplicate project name {name:?}: {first} and {second}")]
	DuplicateName {
		/// Derived project name.
		name: String,
		/// Descriptor seen first.
		first: PathBuf,
		/// Descriptor seen second.
		second: PathBuf,
	},

	/// A split lexer/parser pair cannot be folded into one project.
	#[error("cannot merge grammars into {name:?}: {reason}")]
	MergeConflict {
		/// Project name the merge targets.
		name: String,
		/// What is in the way.
		reason: String,
	},

	/// A retained project would generate fewer than a lexer and a parser.
	#[error("expected at least two generated files for {name:?}, only got {files:?}")]
	TooFewGeneratedFiles {
		/// Offending project.
		name: String,
		/// Files derived for it.
		files: Vec<String>,
	},

	/// A project reached the renderer without a generated-file set.
	#[error("no generated files recorded for project {0:?}")]
	MissingGeneratedFiles(String),

	/// Reading an existing output for comparison failed.
	#[error("I/O error reading {path}: {error}")]
	Read {
		/// Existing output path.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Writing the rendered output failed.
	#[error("I/O error writing {path}: {error}")]
	Write {
		/// Destination path.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// Check mode found an output that differs from a fresh render.
	#[error("{0} is out of date, regenerate it")]
	Stale(PathBuf),
}

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;
