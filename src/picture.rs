//! Embedded pictures
//!
//! Tags that can hold pictures expose them through the `PICTURE` complex property, each
//! picture being a [`ComplexProperty`] with the attributes:
//!
//! | Attribute     | Value                                         |
//! |---------------|-----------------------------------------------|
//! | `data`        | [`ComplexValue::Bytes`], the image            |
//! | `pictureType` | [`ComplexValue::Text`], e.g. `"Front Cover"`  |
//! | `description` | [`ComplexValue::Text`]                        |
//! | `mimeType`    | [`ComplexValue::Text`], e.g. `"image/png"`    |

use crate::tag::{ComplexProperty, ComplexValue};

use unicase::UniCase;

/// The complex property key pictures are exposed under
pub const PICTURE_KEY: &str = "PICTURE";

const APE_KEY_PREFIX: &str = "Cover Art (";

/// Mime types for pictures, sniffed from the image data
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum MimeType {
	/// PNG image
	Png,
	/// JPEG image
	Jpeg,
	/// TIFF image
	Tiff,
	/// BMP image
	Bmp,
	/// GIF image
	Gif,
	/// Anything else
	Unknown,
}

impl MimeType {
	/// Guess the mime type from the first bytes of an image
	pub fn sniff(data: &[u8]) -> Self {
		match data {
			[0x89, b'P', b'N', b'G', ..] => MimeType::Png,
			[0xFF, 0xD8, ..] => MimeType::Jpeg,
			[b'G', b'I', b'F', ..] => MimeType::Gif,
			[b'B', b'M', ..] => MimeType::Bmp,
			[b'I', b'I', 0x2A, 0x00, ..] | [b'M', b'M', 0x00, 0x2A, ..] => MimeType::Tiff,
			_ => MimeType::Unknown,
		}
	}

	/// The mime type as a string, empty for [`MimeType::Unknown`]
	pub fn as_str(self) -> &'static str {
		match self {
			MimeType::Png => "image/png",
			MimeType::Jpeg => "image/jpeg",
			MimeType::Tiff => "image/tiff",
			MimeType::Bmp => "image/bmp",
			MimeType::Gif => "image/gif",
			MimeType::Unknown => "",
		}
	}

	/// Parse a mime type string
	pub fn from_mime(mime: &str) -> Self {
		match mime {
			"image/png" => MimeType::Png,
			"image/jpeg" | "image/jpg" => MimeType::Jpeg,
			"image/tiff" => MimeType::Tiff,
			"image/bmp" => MimeType::Bmp,
			"image/gif" => MimeType::Gif,
			_ => MimeType::Unknown,
		}
	}
}

macro_rules! picture_types {
	($($variant:ident => $name:literal, $ape:literal);+ $(;)?) => {
		/// The picture type, following the ID3v2 `APIC` list
		#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
		pub enum PictureType {
			$(
				#[doc = $name]
				$variant,
			)+
		}

		impl PictureType {
			const ALL: &'static [PictureType] = &[$(PictureType::$variant),+];

			/// A human readable name, as used by the `pictureType` attribute
			pub fn as_str(self) -> &'static str {
				match self {
					$(PictureType::$variant => $name,)+
				}
			}

			/// The suffix of the APE item key, `Cover Art (<suffix>)`
			fn ape_suffix(self) -> &'static str {
				match self {
					$(PictureType::$variant => $ape,)+
				}
			}
		}
	};
}

picture_types! {
	Other             => "Other",                            "Other";
	Icon              => "File Icon",                        "Png Icon";
	OtherIcon         => "Other File Icon",                  "Icon";
	CoverFront        => "Front Cover",                      "Front";
	CoverBack         => "Back Cover",                       "Back";
	Leaflet           => "Leaflet Page",                     "Leaflet";
	Media             => "Media",                            "Media";
	LeadArtist        => "Lead Artist",                      "Lead Artist";
	Artist            => "Artist",                           "Artist";
	Conductor         => "Conductor",                        "Conductor";
	Band              => "Band",                             "Band";
	Composer          => "Composer",                         "Composer";
	Lyricist          => "Lyricist",                         "Lyricist";
	RecordingLocation => "Recording Location",               "Recording Location";
	DuringRecording   => "During Recording",                 "During Recording";
	DuringPerformance => "During Performance",               "During Performance";
	ScreenCapture     => "Movie Screen Capture",             "Video Capture";
	BrightFish        => "Coloured Fish",                    "Fish";
	Illustration      => "Illustration",                     "Illustration";
	BandLogo          => "Band Logo",                        "Band Logotype";
	PublisherLogo     => "Publisher Logo",                   "Publisher Logotype";
}

impl PictureType {
	/// Parse a name produced by [`PictureType::as_str`], ignoring case
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL
			.iter()
			.copied()
			.find(|ty| UniCase::new(ty.as_str()) == UniCase::new(name))
	}

	/// The APE item key for this picture type
	pub fn as_ape_key(self) -> String {
		format!("{}{})", APE_KEY_PREFIX, self.ape_suffix())
	}

	/// Get the picture type from an APE item key, ignoring case
	///
	/// Returns `None` if the key isn't a cover art key.
	pub fn from_ape_key(key: &str) -> Option<Self> {
		let key = UniCase::new(key);
		Self::ALL
			.iter()
			.copied()
			.find(|ty| UniCase::new(ty.as_ape_key()) == key)
	}
}

/// Whether an APE item key holds a picture
pub(crate) fn is_ape_picture_key(key: &str) -> bool {
	key.len() > APE_KEY_PREFIX.len()
		&& key.is_char_boundary(APE_KEY_PREFIX.len())
		&& key[..APE_KEY_PREFIX.len()].eq_ignore_ascii_case(APE_KEY_PREFIX)
}

/// An embedded picture
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Picture {
	/// The picture type
	pub pic_type: PictureType,
	/// The picture's mime type
	pub mime_type: MimeType,
	/// The picture's description
	pub description: Option<String>,
	/// The image data
	pub data: Vec<u8>,
}

impl Picture {
	/// Create a new `Picture`, sniffing the mime type from `data`
	pub fn new(pic_type: PictureType, description: Option<String>, data: Vec<u8>) -> Self {
		Self {
			pic_type,
			mime_type: MimeType::sniff(&data),
			description,
			data,
		}
	}

	/// Convert the picture to an APE binary item value: `description\0data`
	pub fn as_ape_bytes(&self) -> Vec<u8> {
		let description = self.description.as_deref().unwrap_or_default();

		let mut bytes = Vec::with_capacity(description.len() + 1 + self.data.len());
		bytes.extend_from_slice(description.as_bytes());
		bytes.push(0);
		bytes.extend_from_slice(&self.data);

		bytes
	}

	/// Read a picture from an APE binary item
	///
	/// A value without a description separator is taken as image data. Returns `None` if
	/// there is no image data or the key isn't a cover art key.
	pub fn from_ape_bytes(key: &str, bytes: &[u8]) -> Option<Self> {
		let pic_type = PictureType::from_ape_key(key)?;

		let (description, data) = match bytes.iter().position(|b| *b == 0) {
			Some(pos) => (&bytes[..pos], &bytes[pos + 1..]),
			None => (&[][..], bytes),
		};

		if data.is_empty() {
			return None;
		}

		let description =
			(!description.is_empty()).then(|| String::from_utf8_lossy(description).into_owned());

		Some(Self::new(pic_type, description, data.to_vec()))
	}

	/// Convert the picture to a [`ComplexProperty`]
	pub fn to_complex_property(&self) -> ComplexProperty {
		let mut property = ComplexProperty::new();
		property.insert(String::from("data"), ComplexValue::Bytes(self.data.clone()));
		property.insert(
			String::from("pictureType"),
			ComplexValue::Text(String::from(self.pic_type.as_str())),
		);
		property.insert(
			String::from("mimeType"),
			ComplexValue::Text(String::from(self.mime_type.as_str())),
		);

		if let Some(description) = &self.description {
			property.insert(String::from("description"), ComplexValue::Text(description.clone()));
		}

		property
	}

	/// Read a picture from a [`ComplexProperty`]
	///
	/// Only `data` is required. A missing or unknown `pictureType` means
	/// [`PictureType::CoverFront`], a missing `mimeType` is sniffed from the data.
	pub fn from_complex_property(property: &ComplexProperty) -> Option<Self> {
		let data = property.get("data")?.as_bytes()?.to_vec();

		let pic_type = property
			.get("pictureType")
			.and_then(|ty| match ty {
				ComplexValue::Text(name) => PictureType::from_name(name),
				ComplexValue::Number(n) => PictureType::ALL.get(*n as usize).copied(),
				ComplexValue::Bytes(_) => None,
			})
			.unwrap_or(PictureType::CoverFront);

		let description = property
			.get("description")
			.and_then(ComplexValue::as_text)
			.filter(|d| !d.is_empty())
			.map(String::from);

		let mut picture = Self::new(pic_type, description, data);
		if let Some(mime) = property.get("mimeType").and_then(ComplexValue::as_text) {
			match MimeType::from_mime(mime) {
				MimeType::Unknown => {},
				mime_type => picture.mime_type = mime_type,
			}
		}

		Some(picture)
	}
}

#[cfg(test)]
mod tests {
	use super::{is_ape_picture_key, MimeType, Picture, PictureType};
	use crate::tag::ComplexValue;

	use pretty_assertions::assert_eq;

	const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

	#[test]
	fn ape_keys() {
		assert_eq!(PictureType::CoverFront.as_ape_key(), "Cover Art (Front)");
		assert_eq!(
			PictureType::from_ape_key("COVER ART (BACK)"),
			Some(PictureType::CoverBack)
		);
		assert_eq!(PictureType::from_ape_key("Cover Art (Nothing)"), None);

		assert!(is_ape_picture_key("cover art (front)"));
		assert!(!is_ape_picture_key("Cover Art ("));
		assert!(!is_ape_picture_key("Title"));
	}

	#[test]
	fn ape_bytes() {
		let picture = Picture::new(PictureType::CoverFront, Some(String::from("cover")), PNG.to_vec());
		assert_eq!(picture.mime_type, MimeType::Png);

		let bytes = picture.as_ape_bytes();
		assert_eq!(&bytes[..6], b"cover\0");

		let parsed = Picture::from_ape_bytes("Cover Art (Front)", &bytes).unwrap();
		assert_eq!(parsed, picture);

		assert!(Picture::from_ape_bytes("Cover Art (Front)", b"only a description\0").is_none());
	}

	#[test]
	fn complex_property() {
		let picture = Picture::new(PictureType::Artist, None, vec![0xFF, 0xD8, 0xFF]);

		let property = picture.to_complex_property();
		assert_eq!(
			property.get("pictureType"),
			Some(&ComplexValue::Text(String::from("Artist")))
		);
		assert_eq!(
			property.get("mimeType"),
			Some(&ComplexValue::Text(String::from("image/jpeg")))
		);
		assert!(property.get("description").is_none());

		assert_eq!(Picture::from_complex_property(&property), Some(picture));
	}
}
