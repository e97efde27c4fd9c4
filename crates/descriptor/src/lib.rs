//! Descriptor parsing for grammar projects.
//!
//! Two small input formats are understood here:
//!
//! - **Maven descriptors** (`pom.xml`): the project name, the grammar files
//!   listed by `antlr4-maven-plugin`, and the metadata of the
//!   `antlr4test-maven-plugin`. See [`pom`].
//! - **ANTLR grammar headers** (`*.g4`): the declared grammar kind and name,
//!   the `tokenVocab` option and imported grammars. See [`grammar`].
//!
//! [`naming`] derives the file names the ANTLR Go target writes for a grammar,
//! which is what the build graph uses as generated targets.

pub mod error;
pub mod grammar;
pub mod naming;
pub mod pom;

pub use error::{DescriptorError, Result};
pub use grammar::Grammar;
pub use naming::{GeneratorOptions, GrammarKind};
pub use pom::{Project, TestPlugin};
