//! Configuration for grammake.
//!
//! Settings come from an optional TOML file (`grammake.toml` by default);
//! every key is optional and falls back to the defaults below:
//!
//! ```toml
//! root = "grammars-v4"
//! output = "Makefile"
//! layout = "descriptors"      # or "grammars"
//! on-duplicate = "error"      # or "overwrite"
//! ignore = ["objc/pom.xml", "swift-fin/pom.xml"]
//! # ignore-containing defaults to GRAMMAR_SCAN_EXCLUDES for the grammars
//! # layout and to nothing for the descriptors layout; [] disables it
//! ignore-containing = ["/Python/"]
//!
//! [antlr]
//! version = "4.7"
//! # url defaults to http://www.antlr.org/download/antlr-<version>-complete.jar
//! listener = true
//! visitor = true
//!
//! [test]
//! generator = "go run maketest.go"
//! timeout = "10s"           # Go duration, e.g. 1m30s or 1.5s
//! count = 1
//! ```
//!
//! Unknown keys are rejected so that typos surface instead of silently
//! falling back to a default.

pub mod error;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use serde::Deserialize;

pub use error::{ConfigError, Result};

/// Default location of the configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "grammake.toml";

/// Path substrings skipped by the grammars layout unless `ignore-containing`
/// is set. They cover target-specific copies and example trees of grammars-v4
/// whose grammar names clash with the canonical grammar.
pub const GRAMMAR_SCAN_EXCLUDES: &[&str] = &[
	"/antlr4/examples/",
	"/CSharpSharwell/",
	"/Python/",
	"/CSharp/",
	"/JavaScript/",
	"/two-step-processing/",
	"/python3-js/",
	"/python3-py/",
	"/python3-ts/",
	".TypeScriptTarget.",
	".JavaScriptTarget.",
	".PythonTarget.",
	"ecmascript/ECMAScript.g4",
];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
	/// Directory scanned for projects.
	pub root: PathBuf,
	/// Destination of the rendered Makefile; `-` writes to stdout.
	pub output: PathBuf,
	/// Which files drive project discovery.
	pub layout: Layout,
	/// What to do when two descriptors derive the same project name.
	pub on_duplicate: DuplicatePolicy,
	/// Path suffixes, compared component-wise, excluded before parsing.
	pub ignore: Vec<String>,
	/// Substrings of paths excluded before parsing; see [`Config::excluded_substrings`].
	pub ignore_containing: Option<Vec<String>>,
	/// Code generator settings.
	pub antlr: AntlrConfig,
	/// Test orchestration settings.
	pub test: TestConfig,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			root: PathBuf::from("grammars-v4"),
			output: PathBuf::from("Makefile"),
			layout: Layout::default(),
			on_duplicate: DuplicatePolicy::default(),
			ignore: vec!["objc/pom.xml".to_string(), "swift-fin/pom.xml".to_string()],
			ignore_containing: None,
			antlr: AntlrConfig::default(),
			test: TestConfig::default(),
		}
	}
}

impl Config {
	/// Parse a TOML string into a [`Config`].
	pub fn parse(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Load configuration from `path`.
	pub fn load(path: &Path) -> Result<Self> {
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		toml::from_str(&input).map_err(|error| ConfigError::Invalid {
			path: path.to_path_buf(),
			error,
		})
	}

	/// Load `path` if it exists, otherwise return the defaults.
	pub fn load_or_default(path: &Path) -> Result<Self> {
		if path.exists() { Self::load(path) } else { Ok(Self::default()) }
	}

	/// Substring exclusions in effect: the configured list, else
	/// [`GRAMMAR_SCAN_EXCLUDES`] for [`Layout::Grammars`].
	pub fn excluded_substrings(&self) -> Vec<String> {
		match (&self.ignore_containing, self.layout) {
			(Some(patterns), _) => patterns.clone(),
			(None, Layout::Grammars) => GRAMMAR_SCAN_EXCLUDES.iter().map(|p| p.to_string()).collect(),
			(None, Layout::Descriptors) => Vec::new(),
		}
	}
}

/// Project discovery strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
	/// One project per `pom.xml` configuring the ANTLR plugin.
	#[default]
	Descriptors,
	/// One project per `.g4` grammar, merging split lexer/parser pairs.
	Grammars,
}

/// Handling of two projects that derive the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
	/// Abort the run, naming both descriptors.
	#[default]
	Error,
	/// Keep the descriptor visited last.
	Overwrite,
}

/// Code generator settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct AntlrConfig {
	/// ANTLR release used to build the jar name.
	pub version: String,
	/// Download location of the complete jar.
	pub url: Option<String>,
	/// Generate parse tree listeners.
	pub listener: bool,
	/// Generate parse tree visitors.
	pub visitor: bool,
}

impl Default for AntlrConfig {
	fn default() -> Self {
		Self {
			version: "4.7".to_string(),
			url: None,
			listener: true,
			visitor: true,
		}
	}
}

impl AntlrConfig {
	/// File name of the complete jar.
	pub fn jar_name(&self) -> String {
		format!("antlr-{}-complete.jar", self.version)
	}

	/// Configured download URL, or the official one for [`Self::version`].
	pub fn jar_url(&self) -> String {
		self.url
			.clone()
			.unwrap_or_else(|| format!("http://www.antlr.org/download/{}", self.jar_name()))
	}
}

/// Test orchestration settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct TestConfig {
	/// Command regenerating a project's test file; receives the project name.
	pub generator: String,
	/// Bound on each `go test` run.
	pub timeout: Timeout,
	/// `go test -count`.
	pub count: u32,
}

impl Default for TestConfig {
	fn default() -> Self {
		Self {
			generator: "go run maketest.go".to_string(),
			timeout: Timeout("10s".to_string()),
			count: 1,
		}
	}
}

/// Go duration syntax: `0`, or one or more `<number><unit>` pairs.
static GO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(?:0|(?:(?:\d+(?:\.\d*)?|\.\d+)(?:ns|us|µs|ms|s|m|h))+)$").expect("valid duration regex")
});

/// A `go test -timeout` duration such as `10s`, `500ms` or `1m30s`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Timeout(String);

impl Timeout {
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl TryFrom<String> for Timeout {
	type Error = ConfigError;

	fn try_from(value: String) -> Result<Self> {
		if !GO_DURATION.is_match(&value) {
			return Err(ConfigError::InvalidTimeout(value));
		}
		Ok(Self(value))
	}
}

impl fmt::Display for Timeout {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests;
