use std::fs;
use std::path::Path;

use grammake_config::{Config, Layout};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use super::*;

fn tree(files: &[(&str, &str)]) -> TempDir {
	let temp = tempfile::tempdir().expect("temp dir should exist");
	for (path, contents) in files {
		let path = temp.path().join(path);
		fs::create_dir_all(path.parent().expect("fixture has parent")).expect("create fixture dir");
		fs::write(&path, contents).expect("write fixture");
	}
	temp
}

fn config(root: &Path, layout: Layout) -> Config {
	Config {
		root: root.join("grammars-v4"),
		output: root.join("Makefile"),
		layout,
		..Config::default()
	}
}

const JSON_POM: &str = r#"<project>
	<artifactId>json</artifactId>
	<build><plugins><plugin>
		<artifactId>antlr4-maven-plugin</artifactId>
		<configuration><includes><include>JSON.g4</include></includes></configuration>
	</plugin></plugins></build>
</project>"#;

const LEXER_ONLY_POM: &str = r#"<project>
	<artifactId>lex</artifactId>
	<build><plugins><plugin>
		<artifactId>antlr4-maven-plugin</artifactId>
		<configuration><includes><include>OnlyLexer.g4</include></includes></configuration>
	</plugin></plugins></build>
</project>"#;

#[test]
fn descriptor_layout_end_to_end() {
	let temp = tree(&[
		("grammars-v4/json/pom.xml", JSON_POM),
		("grammars-v4/json/JSON.g4", "grammar JSON;"),
		("grammars-v4/objc/pom.xml", "<project><broken>"),
	]);
	let config = config(temp.path(), Layout::Descriptors);

	let generated = generate(&config).unwrap();
	assert_eq!(generated.projects, 1);
	assert!(generated.text.contains("\njson: json/json_test.go\n"));

	output::emit(&config.output, &generated.text).unwrap();
	output::check(&config.output, &generate(&config).unwrap().text).unwrap();
}

#[test]
fn grammar_layout_end_to_end() {
	let temp = tree(&[
		("grammars-v4/calc/CalcLexer.g4", "lexer grammar CalcLexer;"),
		(
			"grammars-v4/calc/CalcParser.g4",
			"parser grammar CalcParser;\noptions { tokenVocab = CalcLexer; }\n",
		),
	]);
	let generated = generate(&config(temp.path(), Layout::Grammars)).unwrap();
	assert_eq!(generated.projects, 1);
	assert!(generated.text.contains("\ncalc: calc/calc_test.go\n"));
}

#[test]
fn grammar_layout_skips_target_copies_by_default() {
	let temp = tree(&[
		("grammars-v4/python/python3/Python3.g4", "grammar Python3;"),
		("grammars-v4/python/python3-py/Python3.g4", "grammar Python3;"),
		("grammars-v4/python/python3-ts/Python3.g4", "grammar Python3;"),
	]);
	let generated = generate(&config(temp.path(), Layout::Grammars)).unwrap();
	assert_eq!(generated.projects, 1);
	assert!(generated.text.contains("
python3: python3/python3_test.go
"));
	assert!(!generated.text.contains("python3-py"));

	let config = Config {
		ignore_containing: Some(Vec::new()),
		..config(temp.path(), Layout::Grammars)
	};
	assert!(matches!(generate(&config), Err(GraphError::DuplicateName { .. })));
}

#[test]
fn failed_render_leaves_existing_output_unchanged() {
	let temp = tree(&[
		("grammars-v4/lex/pom.xml", LEXER_ONLY_POM),
		("Makefile", "previous contents\n"),
	]);
	let config = config(temp.path(), Layout::Descriptors);

	let err = generate(&config)
		.and_then(|generated| output::emit(&config.output, &generated.text))
		.unwrap_err();
	assert!(matches!(err, GraphError::TooFewGeneratedFiles { .. }));
	assert_eq!(fs::read_to_string(&config.output).unwrap(), "previous contents\n");
}

#[test]
fn check_reports_stale_output() {
	let temp = tree(&[
		("grammars-v4/json/pom.xml", JSON_POM),
		("Makefile", "previous contents\n"),
	]);
	let config = config(temp.path(), Layout::Descriptors);
	let generated = generate(&config).unwrap();

	let err = output::check(&config.output, &generated.text).unwrap_err();
	assert!(matches!(err, GraphError::Stale(_)));
	assert_eq!(fs::read_to_string(&config.output).unwrap(), "previous contents\n");
}
