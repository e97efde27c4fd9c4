use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use super::*;

fn pom(artifact: &str, includes: &[&str]) -> String {
	let includes: String = includes.iter().map(|i| format!("<include>{i}</include>")).collect();
	format!(
		r#"<project xmlns="http://maven.apache.org/POM/4.0.0">
	<artifactId>{artifact}</artifactId>
	<build><plugins><plugin>
		<groupId>org.antlr</groupId>
		<artifactId>antlr4-maven-plugin</artifactId>
		<configuration><includes>{includes}</includes></configuration>
	</plugin></plugins></build>
</project>"#
	)
}

fn tree(files: &[(&str, &str)]) -> TempDir {
	let temp = tempfile::tempdir().expect("temp dir should exist");
	for (path, contents) in files {
		let path = temp.path().join(path);
		fs::create_dir_all(path.parent().expect("fixture has parent")).expect("create fixture dir");
		fs::write(&path, contents).expect("write fixture");
	}
	temp
}

fn aggregator() -> Aggregator {
	Aggregator::new(IgnoreList::new().suffix("swift-fin/pom.xml"))
}

#[test]
fn project_is_keyed_by_name() {
	let temp = tree(&[("proj/pom.xml", pom("proj", &["A.g4", "ALexer.g4"]).as_str())]);
	let index = aggregator().aggregate(temp.path()).unwrap();

	assert_eq!(index.names(), ["proj"]);
	let project = index.get("proj").unwrap();
	assert_eq!(
		project.includes,
		[temp.path().join("proj/A.g4"), temp.path().join("proj/ALexer.g4")]
	);
	let files = index.generated_files("proj").unwrap();
	assert_eq!(files[..2], ["proj/a_lexer.go", "proj/a_parser.go"]);
	assert!(files.len() >= MIN_GENERATED_FILES);
}

#[test]
fn test_plugin_metadata_is_carried() {
	let descriptor = r#"<project>
	<artifactId>json</artifactId>
	<build><plugins>
		<plugin>
			<artifactId>antlr4-maven-plugin</artifactId>
			<configuration><includes><include>JSON.g4</include></includes></configuration>
		</plugin>
		<plugin>
			<artifactId>antlr4test-maven-plugin</artifactId>
			<configuration>
				<grammarName>JSON</grammarName>
				<entryPoint>json</entryPoint>
				<exampleFiles>examples/</exampleFiles>
			</configuration>
		</plugin>
	</plugins></build>
</project>"#;
	let temp = tree(&[("json/pom.xml", descriptor)]);
	let index = aggregator().aggregate(temp.path()).unwrap();

	let test = index.get("json").unwrap().test.as_ref().unwrap();
	assert_eq!(test.grammar_name.as_deref(), Some("JSON"));
	assert_eq!(test.entry_point.as_deref(), Some("json"));
	assert_eq!(test.example_root.as_deref(), Some("examples/"));
	assert!(!test.case_insensitive);
}

#[test]
fn skippable_descriptors_are_left_out() {
	let temp = tree(&[
		("empty/pom.xml", pom("empty", &[]).as_str()),
		("docs/pom.xml", "<project><artifactId>docs</artifactId></project>"),
		("json/pom.xml", pom("json", &["JSON.g4"]).as_str()),
		("json/README.md", "not a descriptor"),
	]);
	let index = aggregator().aggregate(temp.path()).unwrap();
	assert_eq!(index.names(), ["json"]);
	assert!(index.get("empty").is_none());
	assert!(index.get("docs").is_none());
}

#[test]
fn ignored_descriptor_is_never_parsed() {
	let temp = tree(&[
		("grammars/swift-fin/pom.xml", "<project><unclosed>"),
		("grammars/json/pom.xml", pom("json", &["JSON.g4"]).as_str()),
	]);

	let parsed = RefCell::new(Vec::<PathBuf>::new());
	let index = aggregator()
		.aggregate_with(temp.path(), |path| {
			parsed.borrow_mut().push(path.to_path_buf());
			pom::parse(path)
		})
		.unwrap();

	assert_eq!(index.names(), ["json"]);
	assert_eq!(*parsed.borrow(), [temp.path().join("grammars/json/pom.xml")]);
}

#[test]
fn first_parse_error_aborts() {
	let temp = tree(&[
		("a/pom.xml", pom("a", &["A.g4"]).as_str()),
		("b/pom.xml", "<project><artifactId>b</artifactId>"),
	]);
	let err = aggregator().aggregate(temp.path()).unwrap_err();
	assert!(matches!(err, GraphError::Descriptor(_)));
	assert!(err.to_string().contains("pom.xml"));
}

#[test]
fn duplicate_name_is_fatal_by_default() {
	let temp = tree(&[
		("one/pom.xml", pom("shared", &["One.g4"]).as_str()),
		("two/pom.xml", pom("shared", &["Two.g4"]).as_str()),
	]);
	let err = aggregator().aggregate(temp.path()).unwrap_err();
	match err {
		GraphError::DuplicateName { name, first, second } => {
			assert_eq!(name, "shared");
			assert_eq!(first, temp.path().join("one/pom.xml"));
			assert_eq!(second, temp.path().join("two/pom.xml"));
		}
		other => panic!("expected duplicate name error, got {other}"),
	}
}

#[test]
fn duplicate_name_overwrites_when_allowed() {
	let temp = tree(&[
		("one/pom.xml", pom("shared", &["One.g4"]).as_str()),
		("two/pom.xml", pom("shared", &["Two.g4"]).as_str()),
	]);
	let index = aggregator()
		.on_duplicate(DuplicatePolicy::Overwrite)
		.aggregate(temp.path())
		.unwrap();
	assert_eq!(index.len(), 1);
	assert_eq!(index.get("shared").unwrap().includes, [temp.path().join("two/Two.g4")]);
}

#[test]
fn lexer_only_project_is_fatal() {
	let temp = tree(&[("lex/pom.xml", pom("lex", &["OnlyLexer.g4"]).as_str())]);
	let err = aggregator().aggregate(temp.path()).unwrap_err();
	match err {
		GraphError::TooFewGeneratedFiles { name, files } => {
			assert_eq!(name, "lex");
			assert_eq!(files, ["lex/only_lexer.go"]);
		}
		other => panic!("expected too few generated files, got {other}"),
	}
}

#[test]
fn generator_options_shape_the_file_set() {
	let temp = tree(&[("json/pom.xml", pom("json", &["JSON.g4"]).as_str())]);
	let index = aggregator()
		.generator_options(GeneratorOptions {
			listener: false,
			visitor: false,
		})
		.aggregate(temp.path())
		.unwrap();
	assert_eq!(index.generated_files("json").unwrap(), ["json/json_lexer.go", "json/json_parser.go"]);
}

#[test]
fn missing_root_is_a_walk_error() {
	let err = aggregator().aggregate(Path::new("/definitely/not/here")).unwrap_err();
	assert!(matches!(err, GraphError::Walk { .. }));
}

#[test]
fn from_projects_without_filesystem() {
	let project = pom::parse_str(Path::new("proj/pom.xml"), pom("proj", &["A.g4"]).as_str()).unwrap();
	let index = AggregateIndex::from_projects([project], DuplicatePolicy::Error, GeneratorOptions::default()).unwrap();
	assert_eq!(
		index.generated_files("proj").unwrap(),
		[
			"proj/a_lexer.go",
			"proj/a_parser.go",
			"proj/a_listener.go",
			"proj/a_base_listener.go",
			"proj/a_visitor.go",
			"proj/a_base_visitor.go",
		]
	);
}
