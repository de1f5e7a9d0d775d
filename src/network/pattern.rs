use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::{NetworkError, Result};
use super::stack::Stack;

/// A case-insensitive item matcher that remembers its source text.
///
/// Equality and the display form both use the source text, which is also
/// what gets persisted.
#[derive(Clone, Debug)]
pub struct Pattern {
	source: String,
	regex: Regex,
}

impl Pattern {
	pub fn new(source: impl Into<String>) -> Result<Self> {
		let source = source.into();
		let regex = RegexBuilder::new(&source)
			.case_insensitive(true)
			.build()
			.map_err(|source_err| NetworkError::InvalidPattern {
				pattern: source.clone(),
				source: source_err,
			})?;
		Ok(Self { source, regex })
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn is_match(&self, name: &str) -> bool {
		self.regex.is_match(name)
	}

	/// True when any of the stack's identifiers matches.
	pub fn matches(&self, stack: &Stack) -> bool {
		stack.names.iter().any(|name| self.is_match(name))
	}
}

impl PartialEq for Pattern {
	fn eq(&self, other: &Self) -> bool {
		self.source == other.source
	}
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.source)
	}
}

impl TryFrom<&str> for Pattern {
	type Error = NetworkError;

	fn try_from(source: &str) -> Result<Self> {
		Pattern::new(source)
	}
}

impl Serialize for Pattern {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.source)
	}
}

impl<'de> Deserialize<'de> for Pattern {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		let source = String::deserialize(deserializer)?;
		Pattern::new(source).map_err(serde::de::Error::custom)
	}
}

/// Compile every source, failing on the first invalid one.
pub fn compile_all<I, S>(sources: I) -> Result<Vec<Pattern>>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	sources.into_iter().map(Pattern::new).collect()
}

/// Allow/deny policy deciding which items may be expanded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
	pub whitelist: Vec<Pattern>,
	pub blacklist: Vec<Pattern>,
}

impl Filter {
	pub fn new(whitelist: Vec<Pattern>, blacklist: Vec<Pattern>) -> Self {
		Self {
			whitelist,
			blacklist,
		}
	}

	/// Blacklist always wins; a non-empty whitelist must also match.
	pub fn allows(&self, stack: &Stack) -> bool {
		if self.blacklist.iter().any(|pattern| pattern.matches(stack)) {
			return false;
		}
		self.whitelist.is_empty() || self.whitelist.iter().any(|pattern| pattern.matches(stack))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn matching_ignores_case() {
		let pattern = Pattern::new("^IRON").unwrap();
		assert!(pattern.is_match("iron_ore"));
		assert!(!pattern.is_match("copper_ore"));
		assert!(pattern.matches(&Stack::new(["gold", "Iron_Nugget"])));
	}

	#[test]
	fn invalid_source_is_rejected() {
		let err = Pattern::new("(unclosed").unwrap_err();
		assert!(matches!(err, NetworkError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
	}

	#[test]
	fn equality_and_display_use_source() {
		let a = Pattern::new("ore$").unwrap();
		assert_eq!(a, Pattern::new("ore$").unwrap());
		assert_eq!(a.to_string(), "ore$");
	}

	#[test]
	fn persisted_as_source_text() {
		let patterns = compile_all(["ingot", "^dust"]).unwrap();
		let json = serde_json::to_string(&patterns).unwrap();
		assert_eq!(json, r#"["ingot","^dust"]"#);

		let back: Vec<Pattern> = serde_json::from_str(&json).unwrap();
		assert_eq!(back, patterns);
		assert!(back[1].is_match("DUST_IRON"));
		assert!(serde_json::from_str::<Vec<Pattern>>(r#"["["]"#).is_err());
	}

	#[test]
	fn blacklist_dominates_whitelist() {
		let filter = Filter::new(
			compile_all(["ore"]).unwrap(),
			compile_all(["iron"]).unwrap(),
		);
		assert!(!filter.allows(&Stack::new(["iron_ore"])));
		assert!(filter.allows(&Stack::new(["copper_ore"])));
		assert!(!filter.allows(&Stack::new(["copper_ingot"])));
		assert!(Filter::default().allows(&Stack::new(["anything"])));
	}
}
