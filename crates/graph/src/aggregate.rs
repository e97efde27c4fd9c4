//! Descriptor-driven project discovery.
//!
//! Every `pom.xml` under the root that configures the ANTLR plugin becomes
//! one project. The walk is strictly sequential and aborts on the first
//! error; nothing is written.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::{Path, PathBuf};

use grammake_config::DuplicatePolicy;
use grammake_descriptor::{GeneratorOptions, Project, pom};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{GraphError, Result};
use crate::ignore::IgnoreList;

/// File name of a project descriptor.
pub const DESCRIPTOR_FILE: &str = "pom.xml";

/// Minimum generated files per project: one lexer and one parser.
pub const MIN_GENERATED_FILES: usize = 2;

/// Walks a tree of descriptors and builds an [`AggregateIndex`].
#[derive(Debug, Clone)]
pub struct Aggregator {
	ignore: IgnoreList,
	on_duplicate: DuplicatePolicy,
	options: GeneratorOptions,
}

impl Aggregator {
	pub fn new(ignore: IgnoreList) -> Self {
		Self {
			ignore,
			on_duplicate: DuplicatePolicy::default(),
			options: GeneratorOptions::default(),
		}
	}

	pub fn on_duplicate(mut self, policy: DuplicatePolicy) -> Self {
		self.on_duplicate = policy;
		self
	}

	pub fn generator_options(mut self, options: GeneratorOptions) -> Self {
		self.options = options;
		self
	}

	/// Parses every non-ignored descriptor under `root`.
	pub fn aggregate(&self, root: &Path) -> Result<AggregateIndex> {
		self.aggregate_with(root, pom::parse)
	}

	/// Like [`Self::aggregate`], with a custom descriptor parser.
	pub fn aggregate_with<F>(&self, root: &Path, mut parse: F) -> Result<AggregateIndex>
	where
		F: FnMut(&Path) -> grammake_descriptor::Result<Project>,
	{
		let mut projects = Vec::new();
		for path in descriptor_paths(root, DESCRIPTOR_FILE)? {
			if self.ignore.matches(&path) {
				debug!(path = %path.display(), "ignored");
				continue;
			}

			let project = parse(&path)?;

			if !project.generation_enabled {
				debug!(path = %path.display(), "no ANTLR plugin, skipping");
				continue;
			}
			if project.includes.is_empty() {
				info!(path = %path.display(), "no grammars, skipping");
				continue;
			}
			if let Some(test) = &project.test {
				debug!(
					name = %project.name,
					grammar = ?test.grammar_name,
					entry_point = ?test.entry_point,
					example_root = ?test.example_root,
					case_insensitive = test.case_insensitive,
					"test plugin"
				);
			}
			projects.push(project);
		}
		AggregateIndex::from_projects(projects, self.on_duplicate, self.options)
	}
}

/// Projects of one run keyed by name, with their generated-file sets.
#[derive(Debug, Clone, Default)]
pub struct AggregateIndex {
	projects: HashMap<String, Project>,
	generated: HashMap<String, Vec<String>>,
}

impl AggregateIndex {
	/// Builds an index from already filtered projects, in visiting order.
	///
	/// Fails on a duplicate name under [`DuplicatePolicy::Error`] and on any
	/// project deriving fewer than [`MIN_GENERATED_FILES`] files.
	pub fn from_projects(
		projects: impl IntoIterator<Item = Project>,
		on_duplicate: DuplicatePolicy,
		options: GeneratorOptions,
	) -> Result<Self> {
		let mut by_name: HashMap<String, Project> = HashMap::new();
		for project in projects {
			match by_name.entry(project.name.clone()) {
				Entry::Vacant(slot) => {
					slot.insert(project);
				}
				Entry::Occupied(mut slot) => match on_duplicate {
					DuplicatePolicy::Error => {
						return Err(GraphError::DuplicateName {
							name: project.name,
							first: slot.get().descriptor.clone(),
							second: project.descriptor,
						});
					}
					DuplicatePolicy::Overwrite => {
						warn!(
							name = %project.name,
							replaced = %slot.get().descriptor.display(),
							by = %project.descriptor.display(),
							"duplicate project name, keeping the later descriptor"
						);
						slot.insert(project);
					}
				},
			}
		}

		let mut names: Vec<&String> = by_name.keys().collect();
		names.sort();

		let mut generated = HashMap::with_capacity(by_name.len());
		for name in names {
			let files = by_name[name].generated_filenames(options);
			check_generated(name, &files)?;
			generated.insert(name.clone(), files);
		}

		Ok(Self {
			projects: by_name,
			generated,
		})
	}

	/// Project names in lexicographic order.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.projects.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	pub fn get(&self, name: &str) -> Option<&Project> {
		self.projects.get(name)
	}

	pub fn generated_files(&self, name: &str) -> Option<&[String]> {
		self.generated.get(name).map(Vec::as_slice)
	}

	pub fn len(&self) -> usize {
		self.projects.len()
	}

	pub fn is_empty(&self) -> bool {
		self.projects.is_empty()
	}
}

/// Rejects a generated-file set too small to hold a lexer and a parser.
pub(crate) fn check_generated(name: &str, files: &[String]) -> Result<()> {
	if files.len() < MIN_GENERATED_FILES {
		return Err(GraphError::TooFewGeneratedFiles {
			name: name.to_string(),
			files: files.to_vec(),
		});
	}
	Ok(())
}

/// Files under `root` named `file_name`, in walk order sorted by name.
pub(crate) fn descriptor_paths(root: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
	walk(root, |path| path.file_name().is_some_and(|name| name == file_name))
}

/// Files under `root` accepted by `keep`, in walk order sorted by name.
pub(crate) fn walk(root: &Path, mut keep: impl FnMut(&Path) -> bool) -> Result<Vec<PathBuf>> {
	let mut paths = Vec::new();
	for entry in WalkDir::new(root).sort_by_file_name() {
		let entry = entry.map_err(|error| GraphError::Walk {
			path: root.to_path_buf(),
			error,
		})?;
		if entry.file_type().is_file() && keep(entry.path()) {
			paths.push(entry.into_path());
		}
	}
	Ok(paths)
}

#[cfg(test)]
mod tests;
