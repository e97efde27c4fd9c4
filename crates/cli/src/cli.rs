use std::path::PathBuf;

use clap::Parser;
use grammake_config::{Config, DuplicatePolicy, Layout};

#[derive(Parser, Debug)]
#[command(name = "grammake")]
#[command(about = "Generate a Makefile that builds and tests ANTLR grammars with the Go target")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Configuration file (grammake.toml is used when present)
	#[arg(long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Directory scanned for projects
	#[arg(long, value_name = "DIR")]
	pub root: Option<PathBuf>,

	/// Makefile to write, or `-` for stdout
	#[arg(long, short, value_name = "PATH")]
	pub output: Option<PathBuf>,

	/// Which files drive project discovery
	#[arg(long, value_enum)]
	pub layout: Option<Layout>,

	/// Extra path suffix to skip, may be repeated
	#[arg(long, value_name = "SUFFIX")]
	pub ignore: Vec<String>,

	/// What to do when two projects derive the same name
	#[arg(long, value_enum)]
	pub on_duplicate: Option<DuplicatePolicy>,

	/// Fail when the output is out of date instead of writing it
	#[arg(long)]
	pub check: bool,

	/// Verbose logging
	#[arg(short, long)]
	pub verbose: bool,
}

impl Cli {
	/// Applies flags on top of `config`. Ignore suffixes are appended.
	pub fn apply(&self, config: &mut Config) {
		if let Some(root) = &self.root {
			config.root = root.clone();
		}
		if let Some(output) = &self.output {
			config.output = output.clone();
		}
		if let Some(layout) = self.layout {
			config.layout = layout;
		}
		if let Some(policy) = self.on_duplicate {
			config.on_duplicate = policy;
		}
		config.ignore.extend(self.ignore.iter().cloned());
	}
}
