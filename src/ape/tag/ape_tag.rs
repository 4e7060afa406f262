use crate::ape::constants::APE_KEY_RULES;
use crate::error::Result;
use crate::picture::{is_ape_picture_key, Picture, PictureType, PICTURE_KEY};
use crate::tag::item::{ItemKind, ItemValue, TagItem};
use crate::tag::store::ItemStore;
use crate::tag::{leading_number, Accessor, ComplexProperty, PropertyMap, TagExt, TagType};

use unicase::UniCase;

macro_rules! impl_accessor {
	($($name:ident, $key:literal;)+) => {
		paste::paste! {
			impl Accessor for ApeTag {
				$(
					fn $name(&self) -> Option<&str> {
						self.first_text($key)
					}

					fn [<set_ $name>](&mut self, value: String) {
						self.set_text($key, value)
					}

					fn [<remove_ $name>](&mut self) {
						self.items.remove_item($key);
					}
				)+

				fn year(&self) -> Option<u32> {
					self.first_text("YEAR").and_then(leading_number)
				}

				fn set_year(&mut self, value: u32) {
					self.set_text("YEAR", value.to_string())
				}

				fn remove_year(&mut self) {
					self.items.remove_item("YEAR");
				}

				fn track(&self) -> Option<u32> {
					self.first_text("TRACK").and_then(leading_number)
				}

				fn set_track(&mut self, value: u32) {
					self.set_text("TRACK", value.to_string())
				}

				fn remove_track(&mut self) {
					self.items.remove_item("TRACK");
				}
			}
		}
	}
}

#[derive(Debug, PartialEq, Eq, Clone)]
/// An `APE` tag
///
/// ## Item storage
///
/// `APE` isn't a very strict format. An item is only restricted by its key, see
/// [`KeyRules`](crate::tag::store::KeyRules), and can hold any [`ItemValue`]. Keys are
/// matched without regard to case.
///
/// Pictures are stored as [`ItemValue::Binary`] under keys such as `Cover Art (Front)`,
/// and are exposed as the `PICTURE` complex property.
pub struct ApeTag {
	/// Whether or not to mark the tag as read only
	pub read_only: bool,
	pub(crate) items: ItemStore,
}

impl_accessor!(
	title,   "TITLE";
	artist,  "ARTIST";
	album,   "ALBUM";
	comment, "COMMENT";
	genre,   "GENRE";
);

impl Default for ApeTag {
	fn default() -> Self {
		Self::new()
	}
}

impl ApeTag {
	/// Create a new empty `ApeTag`
	pub fn new() -> Self {
		Self {
			read_only: false,
			items: ItemStore::new(APE_KEY_RULES),
		}
	}

	fn first_text(&self, key: &str) -> Option<&str> {
		match self.items.item(key)?.value() {
			ItemValue::Text(values) => values.first().map(String::as_str),
			_ => None,
		}
	}

	// Only used with valid keys
	fn set_text(&mut self, key: &str, value: String) {
		if value.is_empty() {
			self.items.remove_item(key);
			return;
		}

		self.items.insert_unchecked(TagItem::from_text(key, value));
	}

	/// Get an item by key, ignoring case
	pub fn get(&self, key: &str) -> Option<&TagItem> {
		self.items.item(key)
	}

	/// Returns all of the tag's items
	pub fn items(&self) -> &[TagItem] {
		self.items.items()
	}

	/// Insert an item, replacing any item with the same key
	///
	/// # Errors
	///
	/// The key is invalid, see [`KeyRules`](crate::tag::store::KeyRules)
	pub fn insert(&mut self, item: TagItem) -> Result<()> {
		self.items.set_item(item)
	}

	/// See [`ItemStore::add_value`]
	///
	/// # Errors
	///
	/// The key is invalid
	pub fn add_value(&mut self, key: &str, value: impl Into<String>, replace: bool) -> Result<()> {
		self.items.add_value(key, value, replace)
	}

	/// See [`ItemStore::set_data`]
	///
	/// # Errors
	///
	/// The key is invalid
	pub fn set_data(&mut self, key: &str, data: Vec<u8>) -> Result<()> {
		self.items.set_data(key, data)
	}

	/// Remove an item by key, ignoring case
	pub fn remove(&mut self, key: &str) -> Option<TagItem> {
		self.items.remove_item(key)
	}

	/// Returns the underlying [`ItemStore`]
	pub fn store(&self) -> &ItemStore {
		&self.items
	}

	/// Returns all pictures, in item order
	///
	/// Binary items under a cover art key that hold no image data are ignored.
	pub fn pictures(&self) -> Vec<Picture> {
		self.items
			.items()
			.iter()
			.filter_map(|item| match item.value() {
				ItemValue::Binary(data) if is_ape_picture_key(item.key()) => {
					Picture::from_ape_bytes(item.key(), data)
				},
				_ => None,
			})
			.collect()
	}

	/// Store a picture, replacing any picture of the same type
	pub fn set_picture(&mut self, picture: &Picture) {
		self.items.insert_unchecked(TagItem::new(
			picture.pic_type.as_ape_key(),
			ItemValue::Binary(picture.as_ape_bytes()),
		));
	}

	/// Remove the picture of type `pic_type`
	pub fn remove_picture(&mut self, pic_type: PictureType) -> Option<Picture> {
		let item = self.items.remove_item(&pic_type.as_ape_key())?;

		match item.value() {
			ItemValue::Binary(data) => Picture::from_ape_bytes(item.key(), data),
			_ => None,
		}
	}
}

impl TagExt for ApeTag {
	fn tag_type(&self) -> TagType {
		TagType::Ape
	}

	fn len(&self) -> usize {
		self.items.len()
	}

	fn clear(&mut self) {
		self.items.clear();
	}

	fn properties(&self) -> PropertyMap {
		self.items.properties()
	}

	fn set_properties(&mut self, properties: &PropertyMap) -> PropertyMap {
		self.items.set_properties(properties)
	}

	fn remove_unsupported_properties(&mut self, keys: &[String]) {
		self.items.remove_unsupported_properties(keys)
	}

	fn complex_property_keys(&self) -> Vec<String> {
		if self.pictures().is_empty() {
			return Vec::new();
		}

		vec![String::from(PICTURE_KEY)]
	}

	fn complex_properties(&self, key: &str) -> Vec<ComplexProperty> {
		if UniCase::new(key) != UniCase::new(PICTURE_KEY) {
			return Vec::new();
		}

		self.pictures()
			.iter()
			.map(Picture::to_complex_property)
			.collect()
	}

	/// Replace all pictures
	///
	/// Values without `data` are dropped. When several values share a picture type,
	/// the last one is kept.
	fn set_complex_properties(&mut self, key: &str, values: Vec<ComplexProperty>) -> bool {
		if UniCase::new(key) != UniCase::new(PICTURE_KEY) {
			return false;
		}

		self.items.retain(|item| {
			!(item.kind() == ItemKind::Binary && is_ape_picture_key(item.key()))
		});

		for value in &values {
			match Picture::from_complex_property(value) {
				Some(picture) => self.set_picture(&picture),
				None => log::warn!("APE: Dropping a picture without data"),
			}
		}

		true
	}
}

#[cfg(test)]
mod tests {
	use super::ApeTag;
	use crate::picture::{Picture, PictureType};
	use crate::tag::item::{ItemValue, TagItem};
	use crate::tag::{Accessor, ComplexValue, PropertyMap, TagExt};

	use pretty_assertions::assert_eq;

	const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3];

	#[test]
	fn accessors() {
		let mut tag = ApeTag::new();
		tag.insert(TagItem::from_text("Title", "Foo")).unwrap();
		tag.insert(TagItem::from_text("Track", "3/12")).unwrap();
		tag.insert(TagItem::from_text("Year", "1984-05-01")).unwrap();

		assert_eq!(tag.title(), Some("Foo"));
		assert_eq!(tag.track(), Some(3));
		assert_eq!(tag.year(), Some(1984));

		tag.set_artist(String::from("Bar"));
		tag.set_title(String::from("Baz"));
		assert_eq!(tag.artist(), Some("Bar"));
		assert_eq!(tag.title(), Some("Baz"));
		// Replaced in place
		assert_eq!(tag.items()[0].key(), "TITLE");

		tag.set_genre(String::new());
		assert_eq!(tag.genre(), None);

		tag.remove_track();
		assert_eq!(tag.track(), None);
		assert_eq!(tag.len(), 3);
	}

	#[test]
	fn binary_items_are_unsupported() {
		let mut tag = ApeTag::new();
		tag.insert(TagItem::from_text("Artist", "A")).unwrap();
		tag.set_data("Blob", vec![1, 2, 3]).unwrap();

		let properties = tag.properties();
		assert_eq!(properties.get("ARTIST"), Some(&[String::from("A")][..]));
		assert_eq!(properties.unsupported(), &[String::from("Blob")]);

		// Replacing the text items leaves the binary item alone
		let rejected = tag.set_properties(&PropertyMap::new());
		assert!(rejected.is_empty());
		assert_eq!(tag.len(), 1);

		tag.remove_unsupported_properties(properties.unsupported());
		assert!(tag.is_empty());
	}

	#[test]
	fn pictures() {
		let mut tag = ApeTag::new();
		assert!(tag.complex_property_keys().is_empty());

		let picture = Picture::new(PictureType::CoverFront, Some(String::from("front")), PNG.to_vec());
		tag.set_picture(&picture);

		assert_eq!(
			tag.get("cover art (front)").map(TagItem::value),
			Some(&ItemValue::Binary(b"front\0".iter().chain(PNG).copied().collect()))
		);
		assert_eq!(tag.complex_property_keys(), vec![String::from("PICTURE")]);

		let properties = tag.complex_properties("picture");
		assert_eq!(properties.len(), 1);
		assert_eq!(properties[0].get("mimeType"), Some(&ComplexValue::Text(String::from("image/png"))));

		let mut back = properties[0].clone();
		back.insert(String::from("pictureType"), ComplexValue::Text(String::from("Back Cover")));
		assert!(tag.set_complex_properties("PICTURE", vec![back]));

		let pictures = tag.pictures();
		assert_eq!(pictures.len(), 1);
		assert_eq!(pictures[0].pic_type, PictureType::CoverBack);
		assert_eq!(pictures[0].data, PNG);

		assert!(!tag.set_complex_properties("LYRICS", Vec::new()));
		assert!(tag.set_complex_properties("PICTURE", Vec::new()));
		assert!(tag.is_empty());
	}
}
