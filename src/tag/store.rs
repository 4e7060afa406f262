//! The generic key/value store behind item based tags

use super::item::{ItemKind, ItemValue, TagItem};
use super::property_map::PropertyMap;
use crate::error::{Result, TagError};

use unicase::UniCase;

/// A format's policy for item keys
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyRules {
	/// Minimum key length (in bytes)
	pub min_len: usize,
	/// Maximum key length for storage
	pub max_len: usize,
	/// Maximum key length for keys exchanged through a [`PropertyMap`]
	pub property_max_len: usize,
	/// Keys that can never be used, compared case-insensitively
	pub reserved: &'static [&'static str],
	/// Format keys and the property names they are exposed as, both uppercase
	pub renames: &'static [(&'static str, &'static str)],
}

impl KeyRules {
	fn check(&self, key: &str, max_len: usize) -> bool {
		(self.min_len..=max_len).contains(&key.len())
			&& key.bytes().all(|b| (0x20..=0x7E).contains(&b))
			&& !self
				.reserved
				.iter()
				.any(|r| UniCase::new(*r) == UniCase::new(key))
	}

	/// Whether `key` can be stored at all
	pub fn is_valid_key(&self, key: &str) -> bool {
		self.check(key, self.max_len)
	}

	/// Whether `key` can be exchanged through a [`PropertyMap`]
	pub fn is_valid_property_key(&self, key: &str) -> bool {
		self.check(key, self.property_max_len)
	}

	/// Whether `key` is exchanged through a [`PropertyMap`] under [`Self::to_property`]
	///
	/// A key whose property name leads back to a different key (`DATE` is read back as
	/// `YEAR`) is not, otherwise two items would end up under one property.
	pub fn is_mapped_property_key(&self, key: &str) -> bool {
		self.is_valid_property_key(key)
			&& UniCase::new(self.to_key(&self.to_property(key)).as_str()) == UniCase::new(key)
	}

	/// Map a format key to its property name
	pub fn to_property(&self, key: &str) -> String {
		let key = key.to_ascii_uppercase();

		self.renames
			.iter()
			.find(|(format_key, _)| *format_key == key)
			.map_or(key, |(_, property)| String::from(*property))
	}

	/// Map a property name to its format key
	pub fn to_key(&self, property: &str) -> String {
		let property = property.to_ascii_uppercase();

		self.renames
			.iter()
			.find(|(_, name)| *name == property)
			.map_or(property, |(format_key, _)| String::from(*format_key))
	}
}

/// An ordered list of [`TagItem`]s with case-insensitive keys
///
/// Every key maps to at most one item. Replacing an item keeps its position, so a
/// store renders the same way no matter how often it is edited.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemStore {
	rules: KeyRules,
	items: Vec<TagItem>,
}

impl ItemStore {
	/// Create an empty store using `rules` to validate keys
	pub fn new(rules: KeyRules) -> Self {
		Self {
			rules,
			items: Vec::new(),
		}
	}

	/// The key rules of this store
	pub fn rules(&self) -> &KeyRules {
		&self.rules
	}

	fn position(&self, key: &str) -> Option<usize> {
		let key = UniCase::new(key);
		self.items
			.iter()
			.position(|item| UniCase::new(item.key()) == key)
	}

	fn validate(&self, key: &str) -> Result<()> {
		if self.rules.is_valid_key(key) {
			return Ok(());
		}

		Err(TagError::InvalidKey(key.to_string()))
	}

	// Caller validates the key
	pub(crate) fn insert_unchecked(&mut self, item: TagItem) {
		match self.position(item.key()) {
			Some(pos) => self.items[pos] = item,
			None => self.items.push(item),
		}
	}

	/// Get an item by key, ignoring case
	pub fn item(&self, key: &str) -> Option<&TagItem> {
		self.position(key).map(|pos| &self.items[pos])
	}

	/// All items, in render order
	pub fn items(&self) -> &[TagItem] {
		&self.items
	}

	/// Number of items
	pub fn len(&self) -> usize {
		self.items.len()
	}

	/// Whether the store holds no items
	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Remove all items
	pub fn clear(&mut self) {
		self.items.clear();
	}

	/// Insert an item, replacing any item with the same key
	///
	/// # Errors
	///
	/// The key does not satisfy the store's [`KeyRules`]
	pub fn set_item(&mut self, item: TagItem) -> Result<()> {
		self.validate(item.key())?;
		self.insert_unchecked(item);
		Ok(())
	}

	/// Add a text value under `key`
	///
	/// With `replace`, any existing values are dropped first. An existing item of
	/// another kind is always replaced by a new text item. An empty `value` adds
	/// nothing, though `replace` still removes the old item.
	///
	/// # Errors
	///
	/// The key does not satisfy the store's [`KeyRules`]
	pub fn add_value(&mut self, key: &str, value: impl Into<String>, replace: bool) -> Result<()> {
		self.validate(key)?;

		let value = value.into();
		if value.is_empty() {
			if replace {
				self.remove_item(key);
			}

			return Ok(());
		}

		if let Some(pos) = self.position(key) {
			if let ItemValue::Text(values) = &mut self.items[pos].value {
				if replace {
					values.clear();
				}

				values.push(value);
				return Ok(());
			}
		}

		self.insert_unchecked(TagItem::new(key, ItemValue::Text(vec![value])));
		Ok(())
	}

	/// Store `data` as the only value of a binary item under `key`
	///
	/// Empty `data` removes the item.
	///
	/// # Errors
	///
	/// The key does not satisfy the store's [`KeyRules`]
	pub fn set_data(&mut self, key: &str, data: Vec<u8>) -> Result<()> {
		self.validate(key)?;

		if data.is_empty() {
			self.remove_item(key);
			return Ok(());
		}

		self.insert_unchecked(TagItem::new(key, ItemValue::Binary(data)));
		Ok(())
	}

	/// Remove an item by key, ignoring case
	pub fn remove_item(&mut self, key: &str) -> Option<TagItem> {
		self.position(key).map(|pos| self.items.remove(pos))
	}

	/// Keep only the items matching `f`
	pub fn retain<F>(&mut self, f: F)
	where
		F: FnMut(&TagItem) -> bool,
	{
		self.items.retain(f)
	}

	/// Get the text values under `key`
	///
	/// # Errors
	///
	/// The item exists, but is not text
	pub fn text(&self, key: &str) -> Result<Option<&[String]>> {
		self.item(key).map(TagItem::text).transpose()
	}

	/// Get the binary value under `key`
	///
	/// # Errors
	///
	/// The item exists, but is not binary
	pub fn binary(&self, key: &str) -> Result<Option<&[u8]>> {
		self.item(key).map(TagItem::binary).transpose()
	}

	/// Export the text items as a [`PropertyMap`]
	///
	/// Binary and locator items, as well as keys that can't be used as property names
	/// (see [`KeyRules::is_mapped_property_key`]), are listed as unsupported.
	pub fn properties(&self) -> PropertyMap {
		let mut properties = PropertyMap::new();

		for item in &self.items {
			match item.value() {
				ItemValue::Text(values) if self.rules.is_mapped_property_key(item.key()) => {
					properties.append_values(&self.rules.to_property(item.key()), values.iter().cloned());
				},
				_ => properties.add_unsupported(item.key()),
			}
		}

		properties
	}

	/// Replace the text items with the contents of `properties`
	///
	/// Text items with a valid key that aren't in `properties` are removed, items whose values
	/// are unchanged are left untouched. Returns the properties that can't be stored.
	pub fn set_properties(&mut self, properties: &PropertyMap) -> PropertyMap {
		let rules = self.rules;
		let mut rejected = PropertyMap::new();

		let mut wanted = Vec::new();
		for (property, values) in properties.iter() {
			let key = rules.to_key(property);

			// A property must come back under its own name, `YEAR` would be read back as `DATE`
			if !rules.is_valid_property_key(&key) || rules.to_property(&key) != *property {
				log::debug!("Rejecting property `{property}`, `{key}` is not a valid key");
				rejected.insert(property, values.clone());
				continue;
			}

			wanted.push((key, values));
		}

		self.items.retain(|item| {
			item.kind() != ItemKind::Text
				|| !rules.is_mapped_property_key(item.key())
				|| wanted
					.iter()
					.any(|(key, _)| UniCase::new(key.as_str()) == UniCase::new(item.key()))
		});

		for (key, values) in wanted {
			if values.is_empty() {
				self.remove_item(&key);
				continue;
			}

			match self.position(&key) {
				Some(pos) if self.items[pos].text().map_or(false, |v| v == values.as_slice()) => {},
				Some(pos) => {
					let existing = &mut self.items[pos];
					existing.value = ItemValue::Text(values.clone());
					existing.read_only = false;
				},
				None => self.items.push(TagItem::new(key, ItemValue::Text(values.clone()))),
			}
		}

		rejected
	}

	/// Remove the items listed in [`PropertyMap::unsupported`]
	///
	/// Keys are matched exactly, as they were reported.
	pub fn remove_unsupported_properties(&mut self, keys: &[String]) {
		self.items.retain(|item| !keys.iter().any(|key| key == item.key()));
	}
}
