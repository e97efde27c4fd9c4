use pretty_assertions::assert_eq;

use super::*;

const ONLY_LISTENER: GeneratorOptions = GeneratorOptions {
	listener: true,
	visitor: false,
};

const BARE: GeneratorOptions = GeneratorOptions {
	listener: false,
	visitor: false,
};

#[test]
fn kind_from_name_uses_suffix() {
	assert_eq!(GrammarKind::from_name("JavaLexer"), GrammarKind::Lexer);
	assert_eq!(GrammarKind::from_name("JavaParser"), GrammarKind::Parser);
	assert_eq!(GrammarKind::from_name("JSON"), GrammarKind::Combined);
	assert_eq!(GrammarKind::from_name("sqlparser"), GrammarKind::Parser);
}

#[test]
fn combined_grammar_emits_both_roles() {
	assert_eq!(
		generated_filenames("JSON", GrammarKind::Combined, ONLY_LISTENER),
		["json_lexer.go", "json_parser.go", "json_listener.go", "json_base_listener.go"]
	);
}

#[test]
fn lexer_grammar_emits_only_the_lexer() {
	assert_eq!(
		generated_filenames("JavaLexer", GrammarKind::Lexer, GeneratorOptions::default()),
		["java_lexer.go"]
	);
}

#[test]
fn parser_grammar_keeps_full_name_for_listeners() {
	assert_eq!(
		generated_filenames("JavaParser", GrammarKind::Parser, GeneratorOptions::default()),
		[
			"java_parser.go",
			"javaparser_listener.go",
			"javaparser_base_listener.go",
			"javaparser_visitor.go",
			"javaparser_base_visitor.go",
		]
	);
}

#[test]
fn role_named_grammar_is_not_stripped_to_nothing() {
	assert_eq!(generated_filenames("Lexer", GrammarKind::Lexer, BARE), ["lexer_lexer.go"]);
}

#[test]
fn declared_kind_wins_over_suffix() {
	assert_eq!(generated_filenames("Tokens", GrammarKind::Lexer, BARE), ["tokens_lexer.go"]);
}

#[test]
fn project_files_are_prefixed_and_deduplicated() {
	let files = project_generated_files("proj", &["grammars/proj/A.g4", "grammars/proj/ALexer.g4"], BARE);
	assert_eq!(files, ["proj/a_lexer.go", "proj/a_parser.go"]);
}

#[test]
fn split_project_gets_lexer_and_parser() {
	let files = project_generated_files("sql", &["SqlLexer.g4", "SqlParser.g4"], ONLY_LISTENER);
	assert_eq!(
		files,
		[
			"sql/sql_lexer.go",
			"sql/sql_parser.go",
			"sql/sqlparser_listener.go",
			"sql/sqlparser_base_listener.go",
		]
	);
}

#[test]
fn antlr_args_follow_options() {
	assert_eq!(GeneratorOptions::default().antlr_args(), ["-listener", "-visitor"]);
	assert_eq!(BARE.antlr_args(), ["-no-listener", "-no-visitor"]);
}

#[test]
fn tokens_only_for_lexing_grammars() {
	assert!(GrammarKind::Combined.emits_tokens());
	assert!(GrammarKind::Lexer.emits_tokens());
	assert!(!GrammarKind::Parser.emits_tokens());
	assert_eq!(tokens_filename("JavaLexer"), "JavaLexer.tokens");
}
