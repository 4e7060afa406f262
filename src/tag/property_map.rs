use std::collections::btree_map::{self, BTreeMap};

/// A format agnostic view of a tag's text data
///
/// Keys are canonical property names (`TITLE`, `TRACKNUMBER`, `ALBUMARTIST`, ...), always
/// stored in ASCII uppercase. Anything the tag holds that can't be represented as a property
/// is listed in [`PropertyMap::unsupported`], so callers can decide whether to keep it or
/// remove it with [`TagExt::remove_unsupported_properties`](crate::tag::TagExt::remove_unsupported_properties).
///
/// ```rust
/// use tagkit::tag::PropertyMap;
///
/// let mut properties = PropertyMap::new();
/// properties.insert("title", vec![String::from("Foo")]);
/// properties.append("Artist", "Bar");
/// properties.append("ARTIST", "Baz");
///
/// assert_eq!(properties.get("TITLE"), Some(&[String::from("Foo")][..]));
/// assert_eq!(properties.get("artist").map(<[String]>::len), Some(2));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PropertyMap {
	map: BTreeMap<String, Vec<String>>,
	unsupported: Vec<String>,
}

impl PropertyMap {
	/// Create an empty `PropertyMap`
	pub fn new() -> Self {
		Self::default()
	}

	fn normalize(key: &str) -> String {
		key.to_ascii_uppercase()
	}

	/// Set the values of a property, returning the previous values
	pub fn insert(&mut self, key: &str, values: Vec<String>) -> Option<Vec<String>> {
		self.map.insert(Self::normalize(key), values)
	}

	/// Append a value to a property, creating it if necessary
	pub fn append(&mut self, key: &str, value: impl Into<String>) {
		self.map
			.entry(Self::normalize(key))
			.or_default()
			.push(value.into());
	}

	/// Append a list of values to a property, creating it if necessary
	pub fn append_values<I>(&mut self, key: &str, values: I)
	where
		I: IntoIterator<Item = String>,
	{
		self.map
			.entry(Self::normalize(key))
			.or_default()
			.extend(values);
	}

	/// Get the values of a property
	pub fn get(&self, key: &str) -> Option<&[String]> {
		self.map.get(&Self::normalize(key)).map(Vec::as_slice)
	}

	/// Whether the property is present
	pub fn contains(&self, key: &str) -> bool {
		self.map.contains_key(&Self::normalize(key))
	}

	/// Remove a property, returning its values
	pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
		self.map.remove(&Self::normalize(key))
	}

	/// All property names, sorted
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.map.keys().map(String::as_str)
	}

	/// Iterate over the properties, sorted by name
	pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
		self.map.iter()
	}

	/// Number of properties, not counting unsupported entries
	pub fn len(&self) -> usize {
		self.map.len()
	}

	/// Whether there are no properties and no unsupported entries
	pub fn is_empty(&self) -> bool {
		self.map.is_empty() && self.unsupported.is_empty()
	}

	/// Keys of tag data that could not be represented as properties
	pub fn unsupported(&self) -> &[String] {
		&self.unsupported
	}

	/// Record a key that could not be represented
	///
	/// Unlike property names, these are kept exactly as the format stores them.
	pub fn add_unsupported(&mut self, key: impl Into<String>) {
		self.unsupported.push(key.into());
	}
}

impl<K: AsRef<str>> FromIterator<(K, Vec<String>)> for PropertyMap {
	fn from_iter<T: IntoIterator<Item = (K, Vec<String>)>>(iter: T) -> Self {
		let mut map = Self::new();
		for (key, values) in iter {
			map.append_values(key.as_ref(), values);
		}

		map
	}
}

impl IntoIterator for PropertyMap {
	type Item = (String, Vec<String>);
	type IntoIter = btree_map::IntoIter<String, Vec<String>>;

	fn into_iter(self) -> Self::IntoIter {
		self.map.into_iter()
	}
}

impl<'a> IntoIterator for &'a PropertyMap {
	type Item = (&'a String, &'a Vec<String>);
	type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

	fn into_iter(self) -> Self::IntoIter {
		self.map.iter()
	}
}

/// A single value of a [`ComplexProperty`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComplexValue {
	/// Text
	Text(String),
	/// Raw bytes
	Bytes(Vec<u8>),
	/// An unsigned integer
	Number(u32),
}

impl ComplexValue {
	/// Returns the text, if this is [`ComplexValue::Text`]
	pub fn as_text(&self) -> Option<&str> {
		match self {
			ComplexValue::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Returns the bytes, if this is [`ComplexValue::Bytes`]
	pub fn as_bytes(&self) -> Option<&[u8]> {
		match self {
			ComplexValue::Bytes(bytes) => Some(bytes),
			_ => None,
		}
	}

	/// Returns the number, if this is [`ComplexValue::Number`]
	pub fn as_number(&self) -> Option<u32> {
		match self {
			ComplexValue::Number(n) => Some(*n),
			_ => None,
		}
	}
}

/// Structured, non-text tag data (such as an embedded picture) as a set of named attributes
pub type ComplexProperty = BTreeMap<String, ComplexValue>;
