use serde::{Deserialize, Serialize};

/// An item and a quantity of it.
///
/// `names` lists aliases of one logical item; the first entry is canonical.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stack {
	/// Identifiers of the item, canonical first.
	pub names: Vec<String>,
	/// Requested or produced quantity.
	#[serde(default)]
	pub amount: u32,
}

impl Stack {
	/// Build a stack from item identifiers with an amount of zero.
	pub fn new<I, S>(names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			names: names.into_iter().map(Into::into).collect(),
			amount: 0,
		}
	}

	/// Builder-style amount setter.
	pub fn with_amount(mut self, amount: u32) -> Self {
		self.amount = amount;
		self
	}

	/// The canonical identifier, if any.
	pub fn canonical(&self) -> Option<&str> {
		self.names.first().map(String::as_str)
	}

	pub fn set_amount(&mut self, amount: u32) {
		self.amount = amount;
	}

	pub fn set_names(&mut self, names: Vec<String>) {
		self.names = names;
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}
