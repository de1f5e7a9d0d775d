use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::Result;
use super::stack::Stack;

/// One production relation: an ingredient and how much of it is needed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
	/// Identifiers of the ingredient, canonical first.
	pub names: Vec<String>,
	#[serde(default)]
	pub quantity: u32,
}

impl Relation {
	pub fn new<I, S>(names: I, quantity: u32) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			names: names.into_iter().map(Into::into).collect(),
			quantity,
		}
	}

	/// The ingredient as a stack.
	pub fn to_stack(&self) -> Stack {
		Stack {
			names: self.names.clone(),
			amount: self.quantity,
		}
	}
}

/// Supplies the production relations of an item.
///
/// Implementations must return relations in a stable order; traversal
/// determinism depends on it.
pub trait RecipeSource {
	fn lookup(&self, item: &str) -> Vec<Relation>;

	/// Relations for the first of the stack's names that has any.
	fn lookup_stack(&self, stack: &Stack) -> Vec<Relation> {
		stack
			.names
			.iter()
			.map(|name| self.lookup(name))
			.find(|relations| !relations.is_empty())
			.unwrap_or_default()
	}
}

/// An in-memory recipe table keyed by item identifier.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeBook {
	recipes: BTreeMap<String, Vec<Relation>>,
}

impl RecipeBook {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse a `{ "item": [{ "names": [..], "quantity": n }, ..] }` table.
	pub fn from_json(json: &str) -> Result<Self> {
		Ok(serde_json::from_str(json)?)
	}

	/// Append a relation to `item`.
	pub fn insert(&mut self, item: impl Into<String>, relation: Relation) {
		self.recipes.entry(item.into()).or_default().push(relation);
	}

	/// Builder-style helper adding single-name ingredients.
	pub fn with(mut self, item: &str, ingredients: &[(&str, u32)]) -> Self {
		let relations = self.recipes.entry(item.to_owned()).or_default();
		relations.extend(
			ingredients
				.iter()
				.map(|(name, quantity)| Relation::new([*name], *quantity)),
		);
		self
	}

	pub fn len(&self) -> usize {
		self.recipes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.recipes.is_empty()
	}
}

impl RecipeSource for RecipeBook {
	fn lookup(&self, item: &str) -> Vec<Relation> {
		self.recipes.get(item).cloned().unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lookup_preserves_insertion_order() {
		let book = RecipeBook::new().with("circuit", &[("copper_cable", 3), ("iron_plate", 1)]);
		let names: Vec<_> = book
			.lookup("circuit")
			.into_iter()
			.map(|relation| relation.names[0].clone())
			.collect();
		assert_eq!(names, ["copper_cable", "iron_plate"]);
		assert!(book.lookup("unknown").is_empty());
	}

	#[test]
	fn stack_lookup_falls_back_to_aliases() {
		let book = RecipeBook::new().with("ingotIron", &[("iron_ore", 1)]);
		let stack = Stack::new(["minecraft:iron_ingot", "ingotIron"]);
		assert_eq!(book.lookup_stack(&stack), vec![Relation::new(["iron_ore"], 1)]);
	}

	#[test]
	fn loads_from_json() {
		let book = RecipeBook::from_json(
			r#"{ "iron_ingot": [{ "names": ["iron_ore"], "quantity": 1 }], "iron_ore": [] }"#,
		)
		.unwrap();
		assert_eq!(book.len(), 2);
		assert_eq!(book.lookup("iron_ingot")[0].to_stack(), Stack::new(["iron_ore"]).with_amount(1));
		assert!(RecipeBook::from_json("[]").is_err());
	}
}
