use std::fs;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn empty_input_yields_defaults() {
	let config = Config::parse("").unwrap();
	assert_eq!(config, Config::default());
	assert_eq!(config.root, PathBuf::from("grammars-v4"));
	assert_eq!(config.layout, Layout::Descriptors);
	assert_eq!(config.on_duplicate, DuplicatePolicy::Error);
	assert_eq!(config.ignore, ["objc/pom.xml", "swift-fin/pom.xml"]);
}

#[test]
fn parses_every_section() {
	let config = Config::parse(
		r#"
root = "vendor/grammars"
output = "build/Makefile"
layout = "grammars"
on-duplicate = "overwrite"
ignore = []
ignore-containing = ["/Python/", ".TypeScriptTarget."]

[antlr]
version = "4.13.1"
visitor = false

[test]
generator = "go run internal/tools/make.go test"
timeout = "30s"
count = 3
"#,
	)
	.unwrap();

	assert_eq!(config.root, PathBuf::from("vendor/grammars"));
	assert_eq!(config.output, PathBuf::from("build/Makefile"));
	assert_eq!(config.layout, Layout::Grammars);
	assert_eq!(config.on_duplicate, DuplicatePolicy::Overwrite);
	assert!(config.ignore.is_empty());
	assert_eq!(config.excluded_substrings(), ["/Python/", ".TypeScriptTarget."]);
	assert_eq!(config.antlr.jar_name(), "antlr-4.13.1-complete.jar");
	assert_eq!(config.antlr.jar_url(), "http://www.antlr.org/download/antlr-4.13.1-complete.jar");
	assert!(config.antlr.listener);
	assert!(!config.antlr.visitor);
	assert_eq!(config.test.timeout.as_str(), "30s");
	assert_eq!(config.test.count, 3);
}

#[test]
fn grammar_layout_defaults_to_scan_excludes() {
	let config = Config::parse("layout = \"grammars\"").unwrap();
	let excluded = config.excluded_substrings();
	assert_eq!(excluded.len(), GRAMMAR_SCAN_EXCLUDES.len());
	assert!(excluded.iter().any(|p| p == "/python3-py/"));

	assert!(Config::default().excluded_substrings().is_empty());

	let config = Config::parse("layout = \"grammars\"\nignore-containing = []").unwrap();
	assert!(config.excluded_substrings().is_empty());
}

#[test]
fn explicit_url_wins() {
	let config = Config::parse("[antlr]\nurl = \"https://mirror.example/antlr.jar\"\n").unwrap();
	assert_eq!(config.antlr.jar_url(), "https://mirror.example/antlr.jar");
	assert_eq!(config.antlr.jar_name(), "antlr-4.7-complete.jar");
}

#[test]
fn unknown_keys_are_rejected() {
	assert!(matches!(Config::parse("rooot = \"x\""), Err(ConfigError::Toml(_))));
	assert!(matches!(Config::parse("[antlr]\nlisteners = true"), Err(ConfigError::Toml(_))));
}

#[test]
fn unknown_layout_is_rejected() {
	assert!(Config::parse("layout = \"flat\"").is_err());
}

#[test]
fn timeout_is_validated() {
	for valid in ["10s", "500ms", "2m", "1h", "1m30s", "1.5s", "2h45m", ".5s", "250us", "0"] {
		assert!(Timeout::try_from(valid.to_string()).is_ok(), "{valid}");
	}
	for invalid in ["", "s", "10", "10 s", "ten", "10s; rm -rf /", "1m30", "1..5s", ".s", "-1s", "1d"] {
		assert!(Timeout::try_from(invalid.to_string()).is_err(), "{invalid}");
	}
	assert!(Config::parse("[test]\ntimeout = \"forever\"").is_err());
}

#[test]
fn load_reports_the_path() {
	let temp = tempfile::tempdir().expect("temp dir should exist");
	let path = temp.path().join("grammake.toml");
	fs::write(&path, "layout = 3").expect("write config");

	let err = Config::load(&path).unwrap_err();
	assert!(matches!(err, ConfigError::Invalid { .. }));
	assert!(err.to_string().contains("grammake.toml"));
}

#[test]
fn load_or_default_tolerates_missing_file() {
	let temp = tempfile::tempdir().expect("temp dir should exist");
	let config = Config::load_or_default(&temp.path().join("absent.toml")).unwrap();
	assert_eq!(config, Config::default());

	let err = Config::load(&temp.path().join("absent.toml")).unwrap_err();
	assert!(matches!(err, ConfigError::Io { .. }));
}
