//! grammake binary.
//!
//! Loads the configuration, applies command line overrides, renders the
//! Makefile and writes it, or with `--check` verifies the existing one.

mod cli;

use std::path::Path;

use anyhow::{Context, bail};
use clap::Parser;
use grammake_config::{Config, DEFAULT_CONFIG_FILE};
use grammake_graph::output;
use tracing::info;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let mut config = load_config(&cli)?;
	cli.apply(&mut config);

	if cli.check && output::is_stdout(&config.output) {
		bail!("--check compares against a file, it cannot be used with stdout output");
	}

	let generated = grammake_graph::generate(&config)
		.with_context(|| format!("failed to generate a Makefile from {}", config.root.display()))?;

	if cli.check {
		output::check(&config.output, &generated.text)?;
		info!(path = %config.output.display(), "up to date");
	} else {
		output::emit(&config.output, &generated.text).context("failed to write the Makefile")?;
		info!(
			projects = generated.projects,
			path = %config.output.display(),
			"wrote Makefile"
		);
	}

	Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
	match &cli.config {
		Some(path) => Config::load(path).with_context(|| format!("failed to load {}", path.display())),
		None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE)).context("failed to load configuration"),
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(false)
		.init();
}
