//! Extended Module (XM) specific items
//!
//! ## File notes
//!
//! XM is a tracker module format, the "tag" is a set of fixed-width name slots spread over
//! the module and instrument headers. See [`XmTag`] for how they are exposed.
//!
//! Saving only ever overwrites those slots, the file length and every size or count field
//! stay as they are.
//!
//! Files written by some tools ("stripped" modules) zero out the magic and shorten the
//! headers. These are read as long as every header still covers its size field.
mod properties;
mod read;
mod tag;
mod write;

pub use properties::XmProperties;
pub use tag::XmTag;

use crate::config::{ParseOptions, WriteOptions};
use crate::error::Result;
use crate::file::{AudioFile, FileProperties, FileType};
use crate::stream::Stream;
use crate::tag::TagExt;

use std::io::{Read, Seek};

pub(crate) const MAGIC: &[u8; 17] = b"Extended Module: ";

/// An XM file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct XmFile {
	pub(crate) tag: XmTag,
	pub(crate) properties: XmProperties,
}

impl XmFile {
	/// Returns a reference to the file's tag
	pub fn xm_tag(&self) -> &XmTag {
		&self.tag
	}

	/// Returns a mutable reference to the file's tag
	pub fn xm_tag_mut(&mut self) -> &mut XmTag {
		&mut self.tag
	}

	/// Returns the file's audio properties
	pub fn properties(&self) -> &XmProperties {
		&self.properties
	}
}

impl AudioFile for XmFile {
	fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
		Self: Sized,
	{
		read::read_from(reader, parse_options)
	}

	fn file_type(&self) -> FileType {
		FileType::Xm
	}

	fn tag(&self) -> &dyn TagExt {
		&self.tag
	}

	fn tag_mut(&mut self) -> &mut dyn TagExt {
		&mut self.tag
	}

	fn file_properties(&self) -> FileProperties {
		FileProperties::from(&self.properties)
	}

	/// Overwrite the name slots in `stream`
	///
	/// There are no write options relevant to XM.
	fn save_to(&self, stream: &mut dyn Stream, _write_options: WriteOptions) -> Result<()> {
		write::write_to(stream, &self.tag)
	}
}
