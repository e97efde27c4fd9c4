//! Maven `pom.xml` descriptors.
//!
//! Only a handful of fields matter to the build graph:
//!
//! ```xml
//! <project>
//!   <artifactId>json</artifactId>
//!   <build>
//!     <plugins>
//!       <plugin>
//!         <groupId>org.antlr</groupId>
//!         <artifactId>antlr4-maven-plugin</artifactId>
//!         <configuration>
//!           <sourceDirectory>${basedir}</sourceDirectory>
//!           <includes>
//!             <include>JSON.g4</include>
//!           </includes>
//!         </configuration>
//!       </plugin>
//!       <plugin>
//!         <groupId>com.khubla.antlr</groupId>
//!         <artifactId>antlr4test-maven-plugin</artifactId>
//!         <configuration>
//!           <grammarName>JSON</grammarName>
//!           <entryPoint>json</entryPoint>
//!           <exampleFiles>examples/</exampleFiles>
//!         </configuration>
//!       </plugin>
//!     </plugins>
//!   </build>
//! </project>
//! ```
//!
//! Element names are matched on their local name, so the default Maven
//! namespace does not need to be declared.

use std::path::{Path, PathBuf};

use roxmltree::{Document, Node};

use crate::error::{DescriptorError, Result, read_file};
use crate::naming::{self, GeneratorOptions};

const ANTLR_PLUGIN: &str = "antlr4-maven-plugin";
const TEST_PLUGIN: &str = "antlr4test-maven-plugin";

/// A grammar project described by one `pom.xml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
	/// Path of the descriptor this project was read from.
	pub descriptor: PathBuf,
	/// Package name, used as the output directory and aggregate key.
	pub name: String,
	/// Grammar files, resolved against the plugin's source directory.
	pub includes: Vec<PathBuf>,
	/// Whether `antlr4-maven-plugin` is configured at all.
	pub generation_enabled: bool,
	/// Stem of the generated test file (`<prefix>_test.go`).
	pub file_prefix: String,
	/// Settings of `antlr4test-maven-plugin`, when present.
	pub test: Option<TestPlugin>,
}

/// Configuration of the grammar test plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestPlugin {
	/// `grammarName`, the grammar under test; also the test file prefix.
	pub grammar_name: Option<String>,
	/// `entryPoint`, the start rule parsed for every example.
	pub entry_point: Option<String>,
	/// `exampleFiles`, the directory of inputs, relative to the descriptor.
	pub example_root: Option<String>,
	/// `caseInsensitiveType` set to anything but `NONE`.
	pub case_insensitive: bool,
}

impl Project {
	/// Generated files for this project, each under `<name>/`.
	pub fn generated_filenames(&self, options: GeneratorOptions) -> Vec<String> {
		naming::project_generated_files(&self.name, &self.includes, options)
	}

	/// Path of the generated test file, relative to the build root.
	pub fn test_file(&self) -> String {
		format!("{}/{}_test.go", self.name, self.file_prefix)
	}
}

/// Reads and parses the descriptor at `path`.
pub fn parse(path: &Path) -> Result<Project> {
	let text = read_file(path)?;
	parse_str(path, &text)
}

/// Parses descriptor `text` as if it had been read from `path`.
///
/// `path` anchors relative include paths and provides the fallback name.
pub fn parse_str(path: &Path, text: &str) -> Result<Project> {
	let doc = Document::parse(text).map_err(|error| DescriptorError::Xml {
		path: path.to_path_buf(),
		error,
	})?;
	let root = doc.root_element();
	let base_dir = path.parent().unwrap_or(Path::new(""));

	let name = child_text(root, "artifactId")
		.map(package_name)
		.filter(|name| !name.is_empty())
		.or_else(|| {
			base_dir
				.file_name()
				.and_then(|dir| dir.to_str())
				.map(package_name)
				.filter(|name| !name.is_empty())
		})
		.ok_or_else(|| DescriptorError::MissingName(path.to_path_buf()))?;

	let antlr = find_plugin(root, ANTLR_PLUGIN);
	let includes: Vec<PathBuf> = antlr
		.and_then(|plugin| child(plugin, "configuration"))
		.map(|config| {
			let source_dir = source_directory(base_dir, child_text(config, "sourceDirectory"));
			child(config, "includes")
				.into_iter()
				.flat_map(|includes| includes.children().filter(|n| n.has_tag_name("include")))
				.filter_map(|n| n.text().map(str::trim))
				.filter(|include| !include.is_empty())
				.map(|include| source_dir.join(include))
				.collect()
		})
		.unwrap_or_default();

	let test = find_plugin(root, TEST_PLUGIN).map(|plugin| {
		let config = child(plugin, "configuration");
		let field = |name: &str| config.and_then(|c| child_text(c, name)).map(str::to_string);
		TestPlugin {
			grammar_name: field("grammarName"),
			entry_point: field("entryPoint"),
			example_root: field("exampleFiles"),
			case_insensitive: field("caseInsensitiveType").is_some_and(|kind| !kind.eq_ignore_ascii_case("none")),
		}
	});

	let file_prefix = test
		.as_ref()
		.and_then(|t| t.grammar_name.as_deref())
		.map(package_name)
		.filter(|prefix| !prefix.is_empty())
		.unwrap_or_else(|| name.clone());

	Ok(Project {
		descriptor: path.to_path_buf(),
		name,
		includes,
		generation_enabled: antlr.is_some(),
		file_prefix,
		test,
	})
}

/// Lower-cases `raw` and replaces anything that is not ASCII alphanumeric
/// with `_`, yielding a valid Go package name.
pub fn package_name(raw: &str) -> String {
	raw.trim()
		.chars()
		.map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
		.collect()
}

/// Resolves the plugin's `sourceDirectory` against the descriptor directory.
fn source_directory(base_dir: &Path, configured: Option<&str>) -> PathBuf {
	let Some(raw) = configured.filter(|raw| !raw.is_empty()) else {
		return base_dir.to_path_buf();
	};
	for variable in ["${project.basedir}", "${basedir}"] {
		if let Some(rest) = raw.strip_prefix(variable) {
			let rest = rest.trim_start_matches(['/', '\\']);
			return if rest.is_empty() { base_dir.to_path_buf() } else { base_dir.join(rest) };
		}
	}
	base_dir.join(raw)
}

fn find_plugin<'a, 'input>(root: Node<'a, 'input>, artifact: &str) -> Option<Node<'a, 'input>> {
	root.descendants()
		.filter(|n| n.has_tag_name("plugin"))
		.find(|plugin| child_text(*plugin, "artifactId") == Some(artifact))
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
	node.children().find(|n| n.has_tag_name(name))
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
	child(node, name).and_then(|n| n.text()).map(str::trim)
}
