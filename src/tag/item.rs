use crate::error::{Result, TagError};

/// The kind of value an item holds
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
	/// UTF-8 text, possibly multi-valued
	Text,
	/// Arbitrary bytes
	Binary,
	/// A reference to an external resource (URL, path)
	Locator,
}

/// The value of a [`TagItem`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemValue {
	/// Any number of text values
	Text(Vec<String>),
	/// A single binary blob
	Binary(Vec<u8>),
	/// Any number of locators
	Locator(Vec<String>),
}

impl ItemValue {
	/// The [`ItemKind`] of this value
	pub fn kind(&self) -> ItemKind {
		match self {
			ItemValue::Text(_) => ItemKind::Text,
			ItemValue::Binary(_) => ItemKind::Binary,
			ItemValue::Locator(_) => ItemKind::Locator,
		}
	}

	/// Whether the value holds no data at all
	pub fn is_empty(&self) -> bool {
		match self {
			ItemValue::Text(values) | ItemValue::Locator(values) => values.is_empty(),
			ItemValue::Binary(data) => data.is_empty(),
		}
	}
}

/// A single key and its value(s)
///
/// An item is only validated once it is inserted into a tag, see
/// [`ItemStore::set_item`](crate::tag::store::ItemStore::set_item).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagItem {
	/// Whether the item is flagged read-only on disk
	pub read_only: bool,
	pub(crate) key: String,
	pub(crate) value: ItemValue,
}

impl TagItem {
	/// Create a new `TagItem`
	pub fn new(key: impl Into<String>, value: ItemValue) -> Self {
		Self {
			read_only: false,
			key: key.into(),
			value,
		}
	}

	/// Create a single valued text item
	pub fn from_text(key: impl Into<String>, value: impl Into<String>) -> Self {
		Self::new(key, ItemValue::Text(vec![value.into()]))
	}

	/// Returns the item key, as it was provided
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the item value
	pub fn value(&self) -> &ItemValue {
		&self.value
	}

	/// Consume the item, returning its value
	pub fn into_value(self) -> ItemValue {
		self.value
	}

	/// Returns the [`ItemKind`] of the value
	pub fn kind(&self) -> ItemKind {
		self.value.kind()
	}

	/// Make the item read only
	pub fn set_read_only(&mut self) {
		self.read_only = true
	}

	/// Returns the text values
	///
	/// # Errors
	///
	/// The item is not [`ItemKind::Text`]
	pub fn text(&self) -> Result<&[String]> {
		match &self.value {
			ItemValue::Text(values) => Ok(values),
			other => Err(TagError::TypeMismatch {
				expected: ItemKind::Text,
				found: other.kind(),
			}),
		}
	}

	/// Returns the binary value
	///
	/// # Errors
	///
	/// The item is not [`ItemKind::Binary`]
	pub fn binary(&self) -> Result<&[u8]> {
		match &self.value {
			ItemValue::Binary(data) => Ok(data),
			other => Err(TagError::TypeMismatch {
				expected: ItemKind::Binary,
				found: other.kind(),
			}),
		}
	}

	/// Returns the locator values
	///
	/// # Errors
	///
	/// The item is not [`ItemKind::Locator`]
	pub fn locator(&self) -> Result<&[String]> {
		match &self.value {
			ItemValue::Locator(values) => Ok(values),
			other => Err(TagError::TypeMismatch {
				expected: ItemKind::Locator,
				found: other.kind(),
			}),
		}
	}
}
