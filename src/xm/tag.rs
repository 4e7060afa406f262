use crate::tag::{Accessor, PropertyMap, TagExt, TagType};

const TITLE: &str = "TITLE";
const COMMENT: &str = "COMMENT";
const TRACKER_NAME: &str = "TRACKERNAME";

/// The metadata of an Extended Module file
///
/// ## Storage
///
/// XM has no real tag, only fixed-width name slots:
///
/// * The title (20 bytes)
/// * The name of the tracker that produced the file (20 bytes)
/// * One name per instrument (22 bytes) and per sample (22 bytes)
///
/// The instrument and sample names are commonly used to store free text, so they are
/// exposed as the comment: one line per instrument, followed by one line per sample.
/// When saving, text that doesn't fit a slot is truncated and surplus lines are dropped.
///
/// Every slot is rewritten from its decoded text, so saving an untouched tag is not always
/// byte-identical:
///
/// * Unused characters (`0xFF`) are read as spaces, and written back as spaces
/// * Anything after the first NUL in a slot is lost, the slot is NUL padded
///
/// ## Properties
///
/// | Property      | Field                       |
/// |---------------|-----------------------------|
/// | `TITLE`       | [`XmTag::title`]            |
/// | `COMMENT`     | [`XmTag::comment`]          |
/// | `TRACKERNAME` | [`XmTag::tracker_name`]     |
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct XmTag {
	pub(crate) title: String,
	pub(crate) comment: String,
	pub(crate) tracker_name: String,
}

impl XmTag {
	/// Create an empty `XmTag`
	pub fn new() -> Self {
		Self::default()
	}

	/// The name of the tracker that produced the file
	pub fn tracker_name(&self) -> Option<&str> {
		(!self.tracker_name.is_empty()).then(|| self.tracker_name.as_str())
	}

	/// Set the tracker name
	pub fn set_tracker_name(&mut self, tracker_name: String) {
		self.tracker_name = tracker_name
	}

	/// Remove the tracker name
	pub fn remove_tracker_name(&mut self) {
		self.tracker_name.clear()
	}

	fn fields(&self) -> [(&'static str, &String); 3] {
		[
			(TITLE, &self.title),
			(COMMENT, &self.comment),
			(TRACKER_NAME, &self.tracker_name),
		]
	}
}

impl Accessor for XmTag {
	fn title(&self) -> Option<&str> {
		(!self.title.is_empty()).then(|| self.title.as_str())
	}

	fn set_title(&mut self, value: String) {
		self.title = value
	}

	fn remove_title(&mut self) {
		self.title.clear()
	}

	fn comment(&self) -> Option<&str> {
		(!self.comment.is_empty()).then(|| self.comment.as_str())
	}

	fn set_comment(&mut self, value: String) {
		self.comment = value
	}

	fn remove_comment(&mut self) {
		self.comment.clear()
	}
}

impl TagExt for XmTag {
	fn tag_type(&self) -> TagType {
		TagType::Xm
	}

	fn len(&self) -> usize {
		self.fields()
			.iter()
			.filter(|(_, value)| !value.is_empty())
			.count()
	}

	fn clear(&mut self) {
		*self = Self::default();
	}

	fn properties(&self) -> PropertyMap {
		let mut properties = PropertyMap::new();
		for (key, value) in self.fields() {
			if !value.is_empty() {
				properties.append(key, value.clone());
			}
		}

		properties
	}

	/// Each field takes the first value of its property, a missing property clears the field
	///
	/// Unknown properties and any value after the first are returned.
	fn set_properties(&mut self, properties: &PropertyMap) -> PropertyMap {
		let mut rejected = PropertyMap::new();
		let first = |key: &str| -> String {
			properties
				.get(key)
				.and_then(<[String]>::first)
				.cloned()
				.unwrap_or_default()
		};

		self.title = first(TITLE);
		self.comment = first(COMMENT);
		self.tracker_name = first(TRACKER_NAME);

		for (key, values) in properties {
			if ![TITLE, COMMENT, TRACKER_NAME].contains(&key.as_str()) {
				rejected.insert(key, values.clone());
			} else if values.len() > 1 {
				rejected.insert(key, values[1..].to_vec());
			}
		}

		rejected
	}
}

#[cfg(test)]
mod tests {
	use super::XmTag;
	use crate::tag::{Accessor, PropertyMap, TagExt};

	use pretty_assertions::assert_eq;

	#[test]
	fn properties_skip_empty_fields() {
		let mut tag = XmTag::new();
		tag.set_title(String::from("MySong"));

		let properties = tag.properties();
		assert_eq!(properties.keys().collect::<Vec<_>>(), vec!["TITLE"]);
		assert_eq!(tag.len(), 1);
	}

	#[test]
	fn set_properties_rejects_extras() {
		let mut tag = XmTag::new();
		tag.set_comment(String::from("old comment"));

		let mut properties = PropertyMap::new();
		properties.insert("TITLE", vec![String::from("A"), String::from("B")]);
		properties.insert("trackername", vec![String::from("FastTracker v2.00")]);
		properties.insert("ARTIST", vec![String::from("Nobody")]);

		let rejected = tag.set_properties(&properties);

		assert_eq!(tag.title(), Some("A"));
		assert_eq!(tag.tracker_name(), Some("FastTracker v2.00"));
		assert_eq!(tag.comment(), None);
		assert_eq!(rejected.get("TITLE").unwrap(), &[String::from("B")]);
		assert_eq!(rejected.get("ARTIST").unwrap(), &[String::from("Nobody")]);
		assert!(!rejected.contains("TRACKERNAME"));
	}

	#[test]
	fn unsupported_fields_are_noops() {
		let mut tag = XmTag::new();
		tag.set_artist(String::from("Nobody"));
		tag.set_year(1999);

		assert_eq!(tag.artist(), None);
		assert_eq!(tag.year(), None);
		assert!(tag.is_empty());
	}
}
