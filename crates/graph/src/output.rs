//! Writing the rendered Makefile.
//!
//! Output is produced once, after rendering succeeded. Files are replaced
//! atomically: the text goes to a temporary file in the destination
//! directory, which is then renamed over the destination.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{GraphError, Result};

/// Output path that selects standard output.
pub const STDOUT: &str = "-";

/// Whether `path` selects standard output.
pub fn is_stdout(path: &Path) -> bool {
	path == Path::new(STDOUT)
}

/// Writes `text` to `path`, or to stdout for [`STDOUT`].
pub fn emit(path: &Path, text: &str) -> Result<()> {
	if is_stdout(path) {
		let mut stdout = io::stdout().lock();
		return stdout
			.write_all(text.as_bytes())
			.and_then(|()| stdout.flush())
			.map_err(|error| GraphError::Write {
				path: path.to_path_buf(),
				error,
			});
	}
	write_atomic(path, text)
}

/// Replaces `path` with `text`, leaving any previous file intact on failure.
///
/// Permissions of an existing destination carry over to the new file.
pub fn write_atomic(path: &Path, text: &str) -> Result<()> {
	let write_error = |error: io::Error| GraphError::Write {
		path: path.to_path_buf(),
		error,
	};

	let mut file = NamedTempFile::new_in(parent_dir(path)).map_err(write_error)?;
	file.write_all(text.as_bytes()).map_err(write_error)?;
	file.flush().map_err(write_error)?;
	if let Ok(existing) = fs::metadata(path) {
		file.as_file().set_permissions(existing.permissions()).map_err(write_error)?;
	}
	file.persist(path).map_err(|err| write_error(err.error))?;

	debug!(path = %path.display(), bytes = text.len(), "wrote output");
	Ok(())
}

/// Whether `path` already holds exactly `text`. A missing file is stale.
pub fn is_up_to_date(path: &Path, text: &str) -> Result<bool> {
	match fs::read_to_string(path) {
		Ok(existing) => Ok(existing == text),
		Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(false),
		Err(error) => Err(GraphError::Read {
			path: path.to_path_buf(),
			error,
		}),
	}
}

/// Fails with [`GraphError::Stale`] unless `path` already holds `text`.
pub fn check(path: &Path, text: &str) -> Result<()> {
	if is_up_to_date(path, text)? {
		Ok(())
	} else {
		Err(GraphError::Stale(path.to_path_buf()))
	}
}

fn parent_dir(path: &Path) -> PathBuf {
	match path.parent() {
		Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
		_ => PathBuf::from("."),
	}
}
