//! Build-graph rendering.
//!
//! [`render_descriptors`] and [`render_grammars`] turn an index into a
//! [`Makefile`] value; nothing touches the filesystem here. Project names are
//! visited in sorted order, so an unchanged index always renders the same
//! text.
//!
//! Both layouts share a preamble: special targets, the ANTLR jar download,
//! the `GRAMMARS` list and the status line helpers used by recipes.

use std::path::{Path, PathBuf};

use grammake_config::Config;
use grammake_descriptor::GeneratorOptions;

use crate::aggregate::AggregateIndex;
use crate::error::{GraphError, Result};
use crate::grammars::GrammarIndex;
use crate::makefile::{Assign, Makefile, Rule};

/// Command the `all` target runs to regenerate the Makefile.
pub const REGENERATE_COMMAND: &str = "grammake";

/// Makefile name used in the self-regeneration rule when output goes to stdout.
pub const DEFAULT_MAKEFILE: &str = "Makefile";

const HEADER: &str = "Do not edit this file, it is generated by grammake";

const STATUS: &str = r#"printf "| %s  | $(LANG_COLOR)%-15s$(NO_COLOR) | %-75s |\n""#;

/// Generates the Go sources of one descriptor project. `$^` holds the
/// project's includes, all relative to the directory of the first one.
const GENERATE_RECIPE: &[&str] = &[
	"lang=$$(dirname $@); \\",
	"errors=$$lang/$$(basename $*).errors; \\",
	"mkdir -p $$lang; \\",
	"(cd $$(dirname $(firstword $^)) && $(ANTLR) -package $$lang $(notdir $^) -o $(CURDIR)/$$lang) > $$errors 2>&1; \\",
	"RET=$$?; \\",
	"if [ $$RET -ne 0 ]; then \\",
	"\t$(XLOG) \"$$lang\" \"antlr: $$(tail -n 1 $$errors)\"; \\",
	"\trm -f $$lang/*.go; \\",
	"\texit $$RET; \\",
	"fi; \\",
	"go build ./$$lang >> $$errors 2>&1; \\",
	"RET=$$?; \\",
	"if [ $$RET -ne 0 ]; then \\",
	"\t$(XLOG) \"$$lang\" \"build: $$(tail -n 1 $$errors)\"; \\",
	"\texit $$RET; \\",
	"fi",
];

/// Writes and runs the test file of one descriptor project.
const TEST_RECIPE: &[&str] = &[
	"lang=$$(dirname $@); \\",
	"errors=$$lang/$$(basename $*).errors; \\",
	"$(TEST_GEN) $$lang >> $$errors 2>&1; \\",
	"RET=$$?; \\",
	"if [ $$RET -ne 0 ]; then \\",
	"\t$(XLOG) \"$$lang\" \"maketest: $$(tail -n 1 $$errors)\"; \\",
	"\texit $$RET; \\",
	"fi; \\",
	"go test -timeout $(TEST_TIMEOUT) -count $(TEST_COUNT) ./$$lang >> $$errors 2>&1; \\",
	"RET=$$?; \\",
	"if [ $$RET -ne 0 ]; then \\",
	"\t$(XLOG) \"$$lang\" \"test: $$(tail -n 1 $$errors)\"; \\",
	"\texit $$RET; \\",
	"fi; \\",
	"rm -f $$errors; \\",
	"$(LOG) \"$$lang\" \"\"",
];

/// `$(BUILD) <name> <grammar>`: generates one grammar into `<name>/`.
const BUILD_FUNCTION: &[&str] = &[
	"basedir=$$PWD;",
	"errors=$$0/$$(basename $$1).log;",
	"mkdir -p $$0;",
	"(cd $$(dirname $$1) && $(ANTLR) -package $$0 $$(basename $$1) -o $$basedir/$$0) > $$errors 2>&1;",
	"RET=$$?;",
	"if [ $$RET -ne 0 ]; then",
	"\t$(XLOG) \"$$0\" \"antlr: $$(tail -n 1 $$errors)\";",
	"\texit $$RET;",
	"fi;",
	"go build ./$$0 >> $$errors 2>&1;",
	"RET=$$?;",
	"if [ $$RET -ne 0 ]; then",
	"\t$(XLOG) \"$$0\" \"build: $$(tail -n 1 $$errors)\";",
	"\texit $$RET;",
	"fi;",
];

/// `$(TEST) <name> <descriptor> <grammars>...`: writes and runs one test file.
const TEST_FUNCTION: &[&str] = &[
	"errors=$$0/$$0.log;",
	"$(TEST_GEN) $$0 \"$$@\" >> $$errors 2>&1;",
	"RET=$$?;",
	"if [ $$RET -ne 0 ]; then",
	"\t$(XLOG) \"$$0\" \"maketest: $$(tail -n 1 $$errors)\";",
	"\texit $$RET;",
	"fi;",
	"go test -timeout $(TEST_TIMEOUT) -count $(TEST_COUNT) ./$$0 >> $$errors 2>&1;",
	"RET=$$?;",
	"if [ $$RET -ne 0 ]; then",
	"\t$(XLOG) \"$$0\" \"test: $$(tail -n 1 $$errors)\";",
	"\texit $$RET;",
	"fi;",
];

/// Everything besides the index that shapes the rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
	/// Grammar tree root; the grammar layout regenerates when it changes.
	pub root: PathBuf,
	/// Makefile name used by the self-regeneration rule.
	pub makefile: String,
	/// File name of the ANTLR jar under `.bin/`.
	pub antlr_jar: String,
	pub antlr_url: String,
	pub options: GeneratorOptions,
	/// Command regenerating the Makefile.
	pub regenerate: String,
	pub test_generator: String,
	pub test_timeout: String,
	pub test_count: u32,
}

impl RenderSettings {
	pub fn from_config(config: &Config) -> Self {
		let makefile = match config.output.to_str() {
			Some("-") | None => DEFAULT_MAKEFILE.to_string(),
			Some(path) => path.to_string(),
		};
		Self {
			root: config.root.clone(),
			makefile,
			antlr_jar: config.antlr.jar_name(),
			antlr_url: config.antlr.jar_url(),
			options: GeneratorOptions {
				listener: config.antlr.listener,
				visitor: config.antlr.visitor,
			},
			regenerate: REGENERATE_COMMAND.to_string(),
			test_generator: config.test.generator.clone(),
			test_timeout: config.test.timeout.to_string(),
			test_count: config.test.count,
		}
	}
}

impl Default for RenderSettings {
	fn default() -> Self {
		Self::from_config(&Config::default())
	}
}

/// Renders the descriptor layout: one project per `pom.xml`.
pub fn render_descriptors(index: &AggregateIndex, settings: &RenderSettings) -> Result<Makefile> {
	let names = index.names();
	let mut makefile = Makefile::new();
	preamble(&mut makefile, settings, "rebuild", &names);

	let mut tests = Vec::with_capacity(names.len());
	for name in &names {
		if let Some(project) = index.get(name) {
			tests.push(project.test_file());
		}
	}

	makefile
		.comment("This is the default target")
		.rule(Rule::new(["rebuild"]).prerequisites(["antlr", "test"]))
		.blank()
		.rule(Rule::new(["all"]).recipe([
			"$(GRAMMAKE)",
			"$(MAKE) clean",
			"$(MAKE) -k -j2 rebuild 2> /dev/null",
		]))
		.blank()
		.rule(clean_rule())
		.blank()
		.rule(Rule::new(["antlr"]).prerequisites(["$(ANTLR_BIN)"]))
		.rule(download_rule())
		.blank()
		.rule(Rule::new(["test"]).prerequisites(tests))
		.blank();

	for name in names {
		let Some(project) = index.get(name) else {
			continue;
		};
		let generated = index
			.generated_files(name)
			.ok_or_else(|| GraphError::MissingGeneratedFiles(name.to_string()))?;
		let test_file = project.test_file();

		makefile
			.rule(Rule::new([name]).prerequisites([test_file.as_str()]))
			.rule(Rule::new(generated).prerequisites(project.includes.iter().map(|path| make_path(path))))
			.rule(Rule::new([test_file]).prerequisites(generated))
			.blank();
	}

	makefile
		.rule(Rule::new(["%_lexer.go", "%_parser.go"]).recipe(GENERATE_RECIPE.iter().copied()))
		.blank()
		.rule(Rule::new(["%_test.go"]).recipe(TEST_RECIPE.iter().copied()));

	Ok(makefile)
}

/// Renders the grammar layout: one project per merged grammar group.
pub fn render_grammars(index: &GrammarIndex, settings: &RenderSettings) -> Result<Makefile> {
	let names = index.names();
	let mut makefile = Makefile::new();
	preamble(&mut makefile, settings, "all", &names);

	let tests: Vec<String> = names
		.iter()
		.filter_map(|name| index.get(name))
		.map(|project| project.test_file())
		.collect();
	let root = make_path(&settings.root);

	makefile
		.comment("This is the default target, it rebuilds every grammar")
		.rule(Rule::new(["all"]).prerequisites([settings.makefile.as_str()]).recipe(["$(MAKE) -k -j2 rebuild 2> /dev/null"]))
		.blank()
		.rule(clean_rule())
		.blank()
		.rule(Rule::new(["rebuild"]).prerequisites(["$(GRAMMARS)"]))
		.blank()
		.rule(Rule::new(["test"]).prerequisites(tests))
		.blank()
		.rule(Rule::new(["$(GRAMMARS)"]).prerequisites(["$(ANTLR_BIN)"]).recipe(["$(LOG) \"$@\" \"\""]))
		.blank()
		.rule(download_rule())
		.blank()
		.rule(Rule::new([settings.makefile.as_str()]).prerequisites([root.as_str()]).recipe(["$(GRAMMAKE)"]))
		.blank()
		.rule(Rule::new([root.as_str()]).recipe(["git submodule update --init"]))
		.blank()
		.comment("Shell functions, each grammar generates a different set of files")
		.variable("BUILD", Assign::Recursive, shell_function(BUILD_FUNCTION))
		.blank()
		.variable("TEST", Assign::Recursive, shell_function(TEST_FUNCTION))
		.blank();

	for name in names {
		let Some(project) = index.get(name) else {
			continue;
		};
		let generated = index
			.generated_files(name)
			.ok_or_else(|| GraphError::MissingGeneratedFiles(name.to_string()))?;
		let test_file = project.test_file();

		makefile.rule(Rule::new([name]).prerequisites([test_file]));
		for grammar in &project.grammars {
			let grammar_path = make_path(&grammar.path);
			let imports = grammar.imported_paths().into_iter().map(|path| make_path(&path));
			let dependencies = grammar.dependent_filenames().into_iter().map(|file| format!("{name}/{file}"));
			makefile.rule(
				Rule::new(grammar.outputs(settings.options).into_iter().map(|file| format!("%/{file}")))
					.prerequisites(std::iter::once(grammar_path.clone()).chain(imports).chain(dependencies))
					.recipe([format!("$(BUILD) {name} {grammar_path}")]),
			);
		}

		let mut test_args = vec![name.to_string(), make_path(&project.descriptor())];
		test_args.extend(project.grammars.iter().map(|grammar| make_path(&grammar.path)));
		makefile
			.rule(
				Rule::new([format!("%/{name}_test.go")])
					.prerequisites(generated)
					.recipe([format!("$(TEST) {}", test_args.join(" "))]),
			)
			.blank();
	}

	Ok(makefile)
}

fn preamble(makefile: &mut Makefile, settings: &RenderSettings, default_goal: &str, names: &[&str]) {
	let mut antlr = String::from("java -jar $(ANTLR_BIN) -Dlanguage=Go");
	for arg in settings.options.antlr_args() {
		antlr.push(' ');
		antlr.push_str(arg);
	}

	makefile
		.comment("")
		.comment(HEADER)
		.comment("")
		.variable("MAKEFLAGS", Assign::Append, "--no-builtin-rules")
		.blank()
		.rule(Rule::new([".PHONY"]).prerequisites(["all", "antlr", "clean", "rebuild", "test"]))
		.variable(".DEFAULT_GOAL", Assign::Simple, default_goal)
		.rule(Rule::new([".SILENT"]))
		.rule(Rule::new([".DELETE_ON_ERROR"]))
		.rule(Rule::new([".SUFFIXES"]))
		.blank()
		.variable("ANTLR_BIN", Assign::Simple, format!("$(CURDIR)/.bin/{}", settings.antlr_jar))
		.variable("ANTLR_URL", Assign::Simple, settings.antlr_url.as_str())
		.variable("ANTLR", Assign::Simple, antlr)
		.blank()
		.variable("GRAMMAKE", Assign::Simple, settings.regenerate.as_str())
		.variable("TEST_GEN", Assign::Simple, settings.test_generator.as_str())
		.variable("TEST_TIMEOUT", Assign::Simple, settings.test_timeout.as_str())
		.variable("TEST_COUNT", Assign::Simple, settings.test_count.to_string())
		.blank()
		.variable("GRAMMARS", Assign::Simple, names.join(" "))
		.blank()
		.variable("LANG_COLOR", Assign::Recursive, "\\033[0;36m")
		.variable("NO_COLOR", Assign::Recursive, "\\033[m")
		.blank()
		.variable("LOG", Assign::Recursive, format!("{STATUS} \"✅\""))
		.variable("XLOG", Assign::Recursive, format!("{STATUS} \"❌\""))
		.blank();
}

fn clean_rule() -> Rule {
	Rule::new(["clean"]).recipe(["rm -rf $(GRAMMARS)"])
}

fn download_rule() -> Rule {
	Rule::new(["$(ANTLR_BIN)"]).recipe(["mkdir -p $(@D)", "curl -o $@ $(ANTLR_URL)"])
}

/// `sh -c '...'` over continuation lines, so make passes one argument.
fn shell_function(lines: &[&str]) -> String {
	let body: Vec<String> = lines.iter().map(|line| format!("\t{line}")).collect();
	format!("sh -c '\\\n{}'", body.join(" \\\n"))
}

/// Path text as make expects it, with `/` separators.
fn make_path(path: &Path) -> String {
	path.to_string_lossy().replace('\\', "/")
}
