//! Grammar-driven project discovery.
//!
//! Instead of reading descriptors, every `.g4` file becomes a grammar and
//! grammars are grouped by their lower-cased name. Split grammars are then
//! folded into one project by [`merge_split_grammars`]: `FooParser` and
//! `FooLexer` become `foo`, a lone `BarParser` becomes `bar`. Grammars pulled
//! in by another grammar's `import` are compiled into the importer and do not
//! form projects of their own.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use grammake_descriptor::grammar::GRAMMAR_EXTENSION;
use grammake_descriptor::{GeneratorOptions, Grammar, grammar};
use tracing::debug;

use crate::aggregate::{DESCRIPTOR_FILE, check_generated, walk};
use crate::error::{GraphError, Result};
use crate::ignore::IgnoreList;

/// One output package built from one or more grammars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarProject {
	/// Package name and output directory.
	pub name: String,
	/// Grammars in generation order (parser before lexer for split pairs).
	pub grammars: Vec<Grammar>,
}

impl GrammarProject {
	/// Descriptor holding the test settings: `pom.xml` next to the first
	/// grammar, or one level up for grammars kept under a `Go/` directory.
	pub fn descriptor(&self) -> PathBuf {
		let dir = self
			.grammars
			.first()
			.and_then(|g| g.path.parent())
			.unwrap_or(Path::new(""));
		let dir = match dir.parent() {
			Some(parent) if dir.file_name().is_some_and(|name| name == "Go") => parent,
			_ => dir,
		};
		dir.join(DESCRIPTOR_FILE)
	}

	/// Generated Go sources of every grammar, each under `<name>/`.
	pub fn generated_filenames(&self, options: GeneratorOptions) -> Vec<String> {
		let mut files: Vec<String> = Vec::new();
		for file in self.grammars.iter().flat_map(|g| g.generated_filenames(options)) {
			let file = format!("{}/{file}", self.name);
			if !files.contains(&file) {
				files.push(file);
			}
		}
		files
	}

	/// Path of the generated test file, relative to the build root.
	pub fn test_file(&self) -> String {
		format!("{0}/{0}_test.go", self.name)
	}
}

/// Grammar projects of one run keyed by name, with their generated-file sets.
#[derive(Debug, Clone, Default)]
pub struct GrammarIndex {
	projects: HashMap<String, GrammarProject>,
	generated: HashMap<String, Vec<String>>,
}

impl GrammarIndex {
	/// Walks `root` for `.g4` files not excluded by `ignore` and builds the index.
	pub fn aggregate(root: &Path, ignore: &IgnoreList, options: GeneratorOptions) -> Result<Self> {
		let mut grammars = Vec::new();
		let is_grammar = |path: &Path| path.extension().is_some_and(|ext| ext == GRAMMAR_EXTENSION);
		for path in walk(root, is_grammar)? {
			if ignore.matches(&path) {
				debug!(path = %path.display(), "ignored");
				continue;
			}
			grammars.push(grammar::parse(&path)?);
		}
		Self::from_grammars(grammars, options)
	}

	/// Groups, merges and validates already parsed grammars.
	pub fn from_grammars(grammars: impl IntoIterator<Item = Grammar>, options: GeneratorOptions) -> Result<Self> {
		let grammars = without_imported(grammars.into_iter().collect());
		let projects: HashMap<String, GrammarProject> = merge_split_grammars(group_by_name(grammars)?)?
			.into_iter()
			.map(|(name, grammars)| (name.clone(), GrammarProject { name, grammars }))
			.collect();

		let mut names: Vec<&String> = projects.keys().collect();
		names.sort();
		let mut generated = HashMap::with_capacity(projects.len());
		for name in names {
			let files = projects[name].generated_filenames(options);
			check_generated(name, &files)?;
			generated.insert(name.clone(), files);
		}

		Ok(Self { projects, generated })
	}

	/// Project names in lexicographic order.
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.projects.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}

	pub fn get(&self, name: &str) -> Option<&GrammarProject> {
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

/// Drops grammars that another grammar imports.
fn without_imported(grammars: Vec<Grammar>) -> Vec<Grammar> {
	let imported: HashSet<String> = grammars
		.iter()
		.flat_map(|g| {
			g.imports
				.iter()
				.filter(|import| !import.eq_ignore_ascii_case(&g.name))
				.map(|import| import.to_ascii_lowercase())
		})
		.collect();
	if imported.is_empty() {
		return grammars;
	}
	grammars
		.into_iter()
		.filter(|g| {
			let is_imported = imported.contains(&g.name.to_ascii_lowercase());
			if is_imported {
				debug!(path = %g.path.display(), "imported by another grammar, not a project");
			}
			!is_imported
		})
		.collect()
}

/// Groups grammars by lower-cased name; two files declaring the same name are fatal.
fn group_by_name(grammars: impl IntoIterator<Item = Grammar>) -> Result<HashMap<String, Vec<Grammar>>> {
	let mut groups: HashMap<String, Vec<Grammar>> = HashMap::new();
	for grammar in grammars {
		let name = grammar.name.to_ascii_lowercase();
		if let Some(existing) = groups.get(&name).and_then(|g| g.first()) {
			return Err(GraphError::DuplicateName {
				name,
				first: existing.path.clone(),
				second: grammar.path,
			});
		}
		groups.entry(name).or_default().push(grammar);
	}
	Ok(groups)
}

/// Folds split lexer/parser grammars into one project per language.
///
/// Parsers are handled first: `xparser` and `xlexer` become `x` (parser
/// first), a parser without a lexer is renamed to `x`. Remaining lexers join
/// an existing single-grammar `x`, or keep their own name. Any step that would
/// overwrite an existing project is a [`GraphError::MergeConflict`].
/// Names are visited in sorted order, so the result is deterministic.
pub fn merge_split_grammars(mut groups: HashMap<String, Vec<Grammar>>) -> Result<HashMap<String, Vec<Grammar>>> {
	for name in sorted_with_role(&groups, "parser") {
		let Some(base) = role_base(&name, "parser") else {
			continue;
		};
		if groups.contains_key(base) {
			return Err(GraphError::MergeConflict {
				name: base.to_string(),
				reason: format!("both {base:?} and {name:?} exist"),
			});
		}

		let mut merged = groups.remove(&name).unwrap_or_default();
		if let Some(lexer) = groups.remove(&format!("{base}lexer")) {
			merged.extend(lexer);
		}
		groups.insert(base.to_string(), merged);
	}

	for name in sorted_with_role(&groups, "lexer") {
		let Some(base) = role_base(&name, "lexer") else {
			continue;
		};
		match groups.get(base).map(Vec::len) {
			None => {}
			Some(1) => {
				let lexer = groups.remove(&name).unwrap_or_default();
				groups.entry(base.to_string()).or_default().extend(lexer);
			}
			Some(count) => {
				return Err(GraphError::MergeConflict {
					name: base.to_string(),
					reason: format!("{base:?} already combines {count} grammars, cannot add {name:?}"),
				});
			}
		}
	}

	Ok(groups)
}

fn sorted_with_role(groups: &HashMap<String, Vec<Grammar>>, role: &str) -> Vec<String> {
	let mut names: Vec<String> = groups.keys().filter(|name| name.ends_with(role)).cloned().collect();
	names.sort();
	names
}

fn role_base<'a>(name: &'a str, role: &str) -> Option<&'a str> {
	name.strip_suffix(role).filter(|base| !base.is_empty())
}
