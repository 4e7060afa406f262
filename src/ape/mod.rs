//! APE specific items
//!
//! ## File notes
//!
//! Monkey's Audio files carry their metadata in an APEv2 tag at the end of the file,
//! optionally followed by an ID3v1 tag. A leading ID3v2 tag goes against the format, but
//! is still possible. Both ID3 tags are skipped when reading and left untouched when saving.
//!
//! Unlike XM, saving can grow or shrink the file: the tag region is spliced in place.
mod constants;
mod properties;
mod read;
pub(crate) mod tag;

pub use properties::ApeProperties;
pub use tag::ape_tag::ApeTag;

use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::file::{AudioFile, FileProperties, FileType};
use crate::stream::Stream;
use crate::tag::TagExt;

use std::io::{Read, Seek};

/// An APE file
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ApeFile {
	/// An APEv1/v2 tag, empty if the file has none
	pub(crate) ape_tag: ApeTag,
	/// Length of a leading ID3v2 tag (Not officially supported)
	pub(crate) id3v2_len: Option<u64>,
	/// Whether the file ends in an ID3v1 tag
	pub(crate) id3v1: bool,
	/// The file's audio properties
	pub(crate) properties: ApeProperties,
}

impl ApeFile {
	/// Returns a reference to the APE tag
	pub fn ape_tag(&self) -> &ApeTag {
		&self.ape_tag
	}

	/// Returns a mutable reference to the APE tag
	pub fn ape_tag_mut(&mut self) -> &mut ApeTag {
		&mut self.ape_tag
	}

	/// Whether the file starts with an ID3v2 tag
	pub fn contains_id3v2(&self) -> bool {
		self.id3v2_len.is_some()
	}

	/// Whether the file ends in an ID3v1 tag
	pub fn contains_id3v1(&self) -> bool {
		self.id3v1
	}

	/// Returns the file's audio properties
	pub fn properties(&self) -> &ApeProperties {
		&self.properties
	}
}

impl AudioFile for ApeFile {
	fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
		Self: Sized,
	{
		read::read_from(reader, parse_options)
	}

	fn file_type(&self) -> FileType {
		FileType::Ape
	}

	fn tag(&self) -> &dyn TagExt {
		&self.ape_tag
	}

	fn tag_mut(&mut self) -> &mut dyn TagExt {
		&mut self.ape_tag
	}

	fn file_properties(&self) -> FileProperties {
		FileProperties::from(&self.properties)
	}

	fn save_to(&self, stream: &mut dyn Stream, write_options: WriteOptions) -> Result<()> {
		tag::write::write_to(stream, &self.ape_tag, write_options)
	}
}

/// The full length of an ID3v2 tag at the start of `header`, if there is one
///
/// This includes the 10 byte header and, if present, the footer.
pub(crate) fn id3v2_len(header: &[u8]) -> Option<u64> {
	match header {
		[b'I', b'D', b'3', _, _, flags, size @ ..] if size.len() >= 4 => {
			let size = size[..4]
				.iter()
				.fold(0_u64, |size, b| (size << 7) | u64::from(b & 0x7F));

			// Footer present
			let footer = if flags & 0x10 == 0x10 { 10 } else { 0 };

			Some(10 + size + footer)
		},
		_ => None,
	}
}
