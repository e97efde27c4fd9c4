//! Path exclusion applied before any descriptor is parsed.

use std::path::{Path, PathBuf};

use grammake_config::Config;

/// Patterns excluding descriptor or grammar paths from a walk.
///
/// Suffixes are compared component-wise, so `swift-fin/pom.xml` excludes
/// `grammars-v4/swift-fin/pom.xml` but not `grammars-v4/not-swift-fin/pom.xml`.
/// Substrings are matched against the `/`-separated path text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList {
	suffixes: Vec<PathBuf>,
	substrings: Vec<String>,
}

impl IgnoreList {
	/// An empty list that excludes nothing.
	pub fn new() -> Self {
		Self::default()
	}

	/// Both pattern kinds taken from the configuration, with the layout's
	/// default substrings when none are configured.
	pub fn from_config(config: &Config) -> Self {
		config
			.ignore
			.iter()
			.fold(Self::new(), |list, suffix| list.suffix(suffix))
			.containing_all(&config.excluded_substrings())
	}

	/// Adds a path suffix pattern.
	pub fn suffix(mut self, suffix: impl Into<PathBuf>) -> Self {
		self.suffixes.push(suffix.into());
		self
	}

	/// Adds a substring pattern.
	pub fn containing(mut self, pattern: impl Into<String>) -> Self {
		self.substrings.push(pattern.into());
		self
	}

	fn containing_all(self, patterns: &[String]) -> Self {
		patterns.iter().fold(self, |list, pattern| list.containing(pattern.as_str()))
	}

	/// Whether `path` is excluded.
	pub fn matches(&self, path: &Path) -> bool {
		if self.suffixes.iter().any(|suffix| path.ends_with(suffix)) {
			return true;
		}
		if self.substrings.is_empty() {
			return false;
		}
		let text = path.to_string_lossy().replace('\\', "/");
		self.substrings.iter().any(|pattern| text.contains(pattern.as_str()))
	}

	pub fn is_empty(&self) -> bool {
		self.suffixes.is_empty() && self.substrings.is_empty()
	}
}
