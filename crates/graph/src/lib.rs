//! Build-graph generation for grammar projects.
//!
//! A run walks a grammar tree, builds an index of projects and renders it as
//! one Makefile:
//!
//! - [`aggregate`]: one project per `pom.xml` configuring the ANTLR plugin.
//! - [`grammars`]: one project per `.g4` grammar, split lexer/parser pairs
//!   merged into a single package.
//! - [`render`]: either index to a [`Makefile`] value, serialized by
//!   `Display`.
//! - [`output`]: atomic replacement of the destination, or a staleness check.
//!
//! Every stage is sequential and the first error aborts the run before
//! anything is written.

pub mod aggregate;
pub mod error;
pub mod grammars;
pub mod ignore;
pub mod makefile;
pub mod output;
pub mod render;

use grammake_config::{Config, Layout};
use tracing::debug;

pub use aggregate::{AggregateIndex, Aggregator};
pub use error::{GraphError, Result};
pub use grammars::{GrammarIndex, GrammarProject, merge_split_grammars};
pub use ignore::IgnoreList;
pub use makefile::Makefile;
pub use render::{RenderSettings, render_descriptors, render_grammars};

/// A rendered Makefile and the number of projects it builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
	pub text: String,
	pub projects: usize,
}

/// Walks `config.root` with the configured layout and renders the Makefile.
///
/// Nothing is written; see [`output`].
pub fn generate(config: &Config) -> Result<Generated> {
	let settings = RenderSettings::from_config(config);
	let ignore = IgnoreList::from_config(config);

	let (makefile, projects) = match config.layout {
		Layout::Descriptors => {
			let index = Aggregator::new(ignore)
				.on_duplicate(config.on_duplicate)
				.generator_options(settings.options)
				.aggregate(&config.root)?;
			(render_descriptors(&index, &settings)?, index.len())
		}
		Layout::Grammars => {
			let index = GrammarIndex::aggregate(&config.root, &ignore, settings.options)?;
			(render_grammars(&index, &settings)?, index.len())
		}
	};

	debug!(projects, layout = ?config.layout, "rendered build graph");
	Ok(Generated {
		text: makefile.to_string(),
		projects,
	})
}

#[cfg(test)]
mod tests;
