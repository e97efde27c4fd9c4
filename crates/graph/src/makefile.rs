//! In-memory Makefile.
//!
//! Rendering first builds a [`Makefile`] value holding every comment,
//! variable and rule in output order, then serializes it through
//! [`fmt::Display`]. Tests can inspect rules structurally with
//! [`Makefile::find_rule`] instead of matching text.

use std::fmt;

/// Ordered Makefile contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Makefile {
	items: Vec<Item>,
}

/// One top-level Makefile construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
	/// `# text`, or a bare `#` when empty.
	Comment(String),
	/// An empty line.
	Blank,
	Variable(Variable),
	Rule(Rule),
}

/// `NAME op value`.
///
/// Multi-line values are written verbatim; continuation backslashes are part
/// of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
	pub name: String,
	pub op: Assign,
	pub value: String,
}

/// Variable assignment flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assign {
	/// `=`, expanded on use.
	Recursive,
	/// `:=`, expanded once.
	Simple,
	/// `+=`
	Append,
}

impl Assign {
	fn as_str(self) -> &'static str {
		match self {
			Self::Recursive => "=",
			Self::Simple => ":=",
			Self::Append => "+=",
		}
	}
}

/// `targets: prerequisites` followed by tab-indented recipe lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rule {
	pub targets: Vec<String>,
	pub prerequisites: Vec<String>,
	pub recipe: Vec<String>,
}

impl Rule {
	pub fn new<I, S>(targets: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			targets: targets.into_iter().map(Into::into).collect(),
			..Self::default()
		}
	}

	pub fn prerequisites<I, S>(mut self, prerequisites: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.prerequisites.extend(prerequisites.into_iter().map(Into::into));
		self
	}

	pub fn recipe<I, S>(mut self, lines: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.recipe.extend(lines.into_iter().map(Into::into));
		self
	}
}

impl Makefile {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn comment(&mut self, text: impl Into<String>) -> &mut Self {
		self.items.push(Item::Comment(text.into()));
		self
	}

	pub fn blank(&mut self) -> &mut Self {
		self.items.push(Item::Blank);
		self
	}

	pub fn variable(&mut self, name: impl Into<String>, op: Assign, value: impl Into<String>) -> &mut Self {
		self.items.push(Item::Variable(Variable {
			name: name.into(),
			op,
			value: value.into(),
		}));
		self
	}

	pub fn rule(&mut self, rule: Rule) -> &mut Self {
		self.items.push(Item::Rule(rule));
		self
	}

	pub fn items(&self) -> &[Item] {
		&self.items
	}

	/// All rules, in output order.
	pub fn rules(&self) -> impl Iterator<Item = &Rule> {
		self.items.iter().filter_map(|item| match item {
			Item::Rule(rule) => Some(rule),
			_ => None,
		})
	}

	/// First rule listing `target` among its targets.
	pub fn find_rule(&self, target: &str) -> Option<&Rule> {
		self.rules().find(|rule| rule.targets.iter().any(|t| t == target))
	}

	/// Value of the last assignment to `name`.
	pub fn find_variable(&self, name: &str) -> Option<&Variable> {
		self.items
			.iter()
			.filter_map(|item| match item {
				Item::Variable(var) if var.name == name => Some(var),
				_ => None,
			})
			.last()
	}
}

impl fmt::Display for Makefile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for item in &self.items {
			writeln!(f, "{item}")?;
		}
		Ok(())
	}
}

impl fmt::Display for Item {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Comment(text) if text.is_empty() => f.write_str("#"),
			Self::Comment(text) => write!(f, "# {text}"),
			Self::Blank => Ok(()),
			Self::Variable(var) => write!(f, "{var}"),
			Self::Rule(rule) => write!(f, "{rule}"),
		}
	}
}

impl fmt::Display for Variable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.value.is_empty() {
			write!(f, "{} {}", self.name, self.op.as_str())
		} else {
			write!(f, "{} {} {}", self.name, self.op.as_str(), self.value)
		}
	}
}

impl fmt::Display for Rule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:", self.targets.join(" "))?;
		if !self.prerequisites.is_empty() {
			write!(f, " {}", self.prerequisites.join(" "))?;
		}
		for line in &self.recipe {
			write!(f, "\n\t{line}")?;
		}
		Ok(())
	}
}
