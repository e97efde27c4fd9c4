//! ANTLR grammar headers.
//!
//! Only the prequel of a `.g4` file is read: the `grammar` declaration and the
//! `options`, `import`, `tokens`, `channels` and `@action` sections that may
//! follow it. Rules are never parsed.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::{DescriptorError, Result, read_file};
use crate::naming::{self, GeneratorOptions, GrammarKind};

/// Extension of grammar files.
pub const GRAMMAR_EXTENSION: &str = "g4";

static COMMENT_OR_LITERAL: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?s)'(?:\\.|[^'\\])*'|/\*.*?\*/|//[^\n]*").expect("valid comment regex"));

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"\b(?:(lexer|parser)\s+)?grammar\s+([A-Za-z_][A-Za-z0-9_]*)\s*;").expect("valid declaration regex")
});

static TOKEN_VOCAB: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\btokenVocab\s*=\s*([A-Za-z_][A-Za-z0-9_]*)\s*;").expect("valid option regex"));

/// Header information of one `.g4` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
	/// Path of the grammar file.
	pub path: PathBuf,
	/// Declared kind.
	pub kind: GrammarKind,
	/// Declared name, with original casing.
	pub name: String,
	/// `options { tokenVocab = X; }`
	pub token_vocab: Option<String>,
	/// Grammars named by `import` statements.
	pub imports: Vec<String>,
}

impl Grammar {
	/// Go sources ANTLR writes for this grammar.
	pub fn generated_filenames(&self, options: GeneratorOptions) -> Vec<String> {
		naming::generated_filenames(&self.name, self.kind, options)
	}

	/// Every file written into the output directory, including the token
	/// vocabulary consumed by dependent parsers.
	pub fn outputs(&self, options: GeneratorOptions) -> Vec<String> {
		let mut files = self.generated_filenames(options);
		if self.kind.emits_tokens() {
			files.push(naming::tokens_filename(&self.name));
		}
		files
	}

	/// Files in the output directory that must exist before this grammar
	/// can be generated.
	pub fn dependent_filenames(&self) -> Vec<String> {
		self.token_vocab.iter().map(|vocab| naming::tokens_filename(vocab)).collect()
	}

	/// Imported grammar files, which ANTLR resolves next to the importer.
	pub fn imported_paths(&self) -> Vec<PathBuf> {
		let dir = self.path.parent().unwrap_or(Path::new(""));
		self.imports.iter().map(|name| dir.join(format!("{name}.{GRAMMAR_EXTENSION}"))).collect()
	}
}

/// Reads and parses the grammar header at `path`.
pub fn parse(path: &Path) -> Result<Grammar> {
	let text = read_file(path)?;
	parse_str(path, &text)
}

/// Parses grammar `text` as if it had been read from `path`.
pub fn parse_str(path: &Path, text: &str) -> Result<Grammar> {
	let stripped = strip_comments(text);
	let declaration = DECLARATION
		.captures(&stripped)
		.ok_or_else(|| DescriptorError::MissingGrammarDeclaration(path.to_path_buf()))?;

	let kind = match declaration.get(1).map(|m| m.as_str()) {
		Some("lexer") => GrammarKind::Lexer,
		Some("parser") => GrammarKind::Parser,
		_ => GrammarKind::Combined,
	};
	let name = declaration[2].to_string();
	let end = declaration.get(0).map_or(0, |m| m.end());

	let mut grammar = Grammar {
		path: path.to_path_buf(),
		kind,
		name,
		token_vocab: None,
		imports: Vec::new(),
	};
	read_prequel(&stripped[end..], &mut grammar);
	Ok(grammar)
}

/// Blanks out comments while leaving quoted literals intact, so that a
/// `'//'` token does not swallow the rest of its line.
fn strip_comments(text: &str) -> String {
	COMMENT_OR_LITERAL
		.replace_all(text, |caps: &Captures<'_>| {
			let matched = &caps[0];
			if matched.starts_with('\'') { matched.to_string() } else { " ".to_string() }
		})
		.into_owned()
}

fn read_prequel(mut rest: &str, grammar: &mut Grammar) {
	loop {
		rest = rest.trim_start();
		if let Some(after) = keyword(rest, "options") {
			let (body, tail) = braced(after);
			if let Some(caps) = TOKEN_VOCAB.captures(body) {
				grammar.token_vocab = Some(caps[1].to_string());
			}
			rest = tail;
		} else if let Some(after) = keyword(rest, "import") {
			let (list, tail) = after.split_once(';').unwrap_or((after, ""));
			grammar.imports.extend(
				list.split(',')
					.map(|item| item.rsplit('=').next().unwrap_or(item).trim())
					.filter(|item| !item.is_empty())
					.map(str::to_string),
			);
			rest = tail;
		} else if let Some(after) = keyword(rest, "tokens").or_else(|| keyword(rest, "channels")) {
			rest = braced(after).1;
		} else if let Some(after) = rest.strip_prefix('@') {
			rest = braced(after).1;
		} else {
			break;
		}
	}
}

/// Strips `word` from the front of `text` if it is followed by a non-identifier character.
fn keyword<'a>(text: &'a str, word: &str) -> Option<&'a str> {
	let after = text.strip_prefix(word)?;
	match after.chars().next() {
		Some(c) if c.is_ascii_alphanumeric() || c == '_' => None,
		_ => Some(after),
	}
}

/// Splits at the end of the first balanced `{ ... }` block, returning its
/// contents and the remainder.
fn braced(text: &str) -> (&str, &str) {
	let Some(open) = text.find('{') else {
		return ("", "");
	};
	let mut depth = 0usize;
	for (i, c) in text[open..].char_indices() {
		match c {
			'{' => depth += 1,
			'}' => {
				depth -= 1;
				if depth == 0 {
					let close = open + i;
					return (&text[open + 1..close], &text[close + 1..]);
				}
			}
			_ => {}
		}
	}
	(&text[open + 1..], "")
}
