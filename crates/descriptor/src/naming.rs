//! File names produced by the ANTLR Go target.
//!
//! The Go target lower-cases the grammar name and strips a trailing
//! `Lexer`/`Parser` for the lexer and parser sources, but keeps the full
//! grammar name for listener and visitor sources:
//!
//! | grammar              | files                                                   |
//! |----------------------|---------------------------------------------------------|
//! | `JSON` (combined)    | `json_lexer.go`, `json_parser.go`, `json_listener.go`…  |
//! | `JavaLexer`          | `java_lexer.go`                                         |
//! | `JavaParser`         | `java_parser.go`, `javaparser_listener.go`…             |

use std::collections::HashSet;
use std::path::Path;

/// Role a grammar plays in code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarKind {
	/// `grammar X;`, producing both a lexer and a parser.
	Combined,
	/// `lexer grammar X;`
	Lexer,
	/// `parser grammar X;`
	Parser,
}

impl GrammarKind {
	/// Guesses the kind from a `Lexer`/`Parser` suffix on the grammar name.
	///
	/// Used for descriptor includes, whose headers are never read.
	pub fn from_name(name: &str) -> Self {
		let lower = name.to_ascii_lowercase();
		if lower.ends_with("lexer") {
			Self::Lexer
		} else if lower.ends_with("parser") {
			Self::Parser
		} else {
			Self::Combined
		}
	}

	/// Whether ANTLR writes a `.tokens` file for this grammar.
	pub fn emits_tokens(self) -> bool {
		matches!(self, Self::Combined | Self::Lexer)
	}
}

/// Code generator switches that change the set of emitted files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
	/// `-listener`: emit `_listener.go` and `_base_listener.go`.
	pub listener: bool,
	/// `-visitor`: emit `_visitor.go` and `_base_visitor.go`.
	pub visitor: bool,
}

impl Default for GeneratorOptions {
	fn default() -> Self {
		Self {
			listener: true,
			visitor: true,
		}
	}
}

impl GeneratorOptions {
	/// ANTLR command line switches matching these options.
	pub fn antlr_args(&self) -> Vec<&'static str> {
		vec![
			if self.listener { "-listener" } else { "-no-listener" },
			if self.visitor { "-visitor" } else { "-no-visitor" },
		]
	}
}

/// Go source files ANTLR generates for one grammar, in generation order.
pub fn generated_filenames(name: &str, kind: GrammarKind, options: GeneratorOptions) -> Vec<String> {
	let lower = name.to_ascii_lowercase();
	let mut files = Vec::new();

	match kind {
		GrammarKind::Lexer => {
			files.push(format!("{}_lexer.go", strip_role(&lower, "lexer")));
			return files;
		}
		GrammarKind::Parser => {
			files.push(format!("{}_parser.go", strip_role(&lower, "parser")));
		}
		GrammarKind::Combined => {
			files.push(format!("{lower}_lexer.go"));
			files.push(format!("{lower}_parser.go"));
		}
	}

	if options.listener {
		files.push(format!("{lower}_listener.go"));
		files.push(format!("{lower}_base_listener.go"));
	}
	if options.visitor {
		files.push(format!("{lower}_visitor.go"));
		files.push(format!("{lower}_base_visitor.go"));
	}
	files
}

/// Name of the token vocabulary file ANTLR writes for `name`.
pub fn tokens_filename(name: &str) -> String {
	format!("{name}.tokens")
}

/// Grammar name implied by an include path (`grammars/JSON.g4` → `JSON`).
pub fn include_grammar_name(include: &Path) -> Option<&str> {
	include.file_stem().and_then(|stem| stem.to_str())
}

/// Generated files for every include of a project, prefixed with the
/// project directory and de-duplicated in first-seen order.
pub fn project_generated_files<P: AsRef<Path>>(project: &str, includes: &[P], options: GeneratorOptions) -> Vec<String> {
	let mut seen = HashSet::new();
	includes
		.iter()
		.filter_map(|include| include_grammar_name(include.as_ref()))
		.flat_map(|name| generated_filenames(name, GrammarKind::from_name(name), options))
		.map(|file| format!("{project}/{file}"))
		.filter(|file| seen.insert(file.clone()))
		.collect()
}

fn strip_role<'a>(lower: &'a str, role: &str) -> &'a str {
	match lower.strip_suffix(role) {
		Some(base) if !base.is_empty() => base,
		_ => lower,
	}
}

#[cfg(test)]
mod tests;
