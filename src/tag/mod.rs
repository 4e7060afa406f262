//! Format agnostic tag access
//!
//! Every format specific tag implements [`TagExt`], which gives access to the common
//! fields through [`Accessor`] and to everything else through a [`PropertyMap`].
//! Item based formats store their data in an [`ItemStore`](store::ItemStore).

pub mod item;
mod property_map;
pub mod store;

pub use item::{ItemKind, ItemValue, TagItem};
pub use property_map::{ComplexProperty, ComplexValue, PropertyMap};

macro_rules! accessor_trait {
	($($name:ident => $getter:ty, $setter:ty);+ $(;)?) => {
		/// Provides accessors for common items
		///
		/// A format that can't store a field keeps the default, no-op implementation.
		pub trait Accessor {
			paste::paste! {
				$(
					#[doc = "Returns the " $name]
					fn $name(&self) -> Option<$getter> {
						None
					}
					#[doc = "Sets the " $name]
					fn [<set_ $name>](&mut self, _value: $setter) {}
					#[doc = "Removes the " $name]
					fn [<remove_ $name>](&mut self) {}
				)+
			}
		}
	};
}

accessor_trait! {
	title   => &str, String;
	artist  => &str, String;
	album   => &str, String;
	comment => &str, String;
	genre   => &str, String;
	year    => u32,  u32;
	track   => u32,  u32;
}

/// The tag formats tagkit can read and write
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TagType {
	/// An APEv1/v2 tag
	Ape,
	/// The metadata of an Extended Module file
	Xm,
}

/// Capabilities shared by all tags
///
/// This trait is object safe, files only ever hand out `&dyn TagExt`.
pub trait TagExt: Accessor {
	/// The format of this tag
	fn tag_type(&self) -> TagType;

	/// Number of items (or set fields) in the tag
	fn len(&self) -> usize;

	/// Whether the tag holds no data
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Remove all data from the tag
	fn clear(&mut self);

	/// Export the tag as a [`PropertyMap`]
	fn properties(&self) -> PropertyMap;

	/// Replace the contents of the tag with `properties`
	///
	/// Returns the subset of `properties` the tag can't store.
	fn set_properties(&mut self, properties: &PropertyMap) -> PropertyMap;

	/// Remove the data listed in [`PropertyMap::unsupported`]
	fn remove_unsupported_properties(&mut self, _keys: &[String]) {}

	/// Keys of the complex properties present in the tag, such as `PICTURE`
	fn complex_property_keys(&self) -> Vec<String> {
		Vec::new()
	}

	/// All values of the complex property `key`
	fn complex_properties(&self, _key: &str) -> Vec<ComplexProperty> {
		Vec::new()
	}

	/// Replace all values of the complex property `key`
	///
	/// Returns `false` if the tag can't store `key`.
	fn set_complex_properties(&mut self, _key: &str, _values: Vec<ComplexProperty>) -> bool {
		false
	}
}

/// Parse the leading number of a text value, such as the `3` of a `3/12` track number
pub(crate) fn leading_number(value: &str) -> Option<u32> {
	let digits = value.trim_start();
	let end = digits
		.find(|c: char| !c.is_ascii_digit())
		.unwrap_or(digits.len());

	digits[..end].parse().ok()
}
