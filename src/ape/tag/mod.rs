pub(crate) mod ape_tag;
pub(crate) mod read;
pub(crate) mod write;

use super::constants::{
	APE_VERSION_2, FLAG_HAS_HEADER, FLAG_IS_HEADER, FLAG_READ_ONLY, FOOTER_SIZE,
};
use super::read::corrupt;
use crate::error::Result;

use std::io::{Read, Seek, SeekFrom};

use byteorder::{LittleEndian, ReadBytesExt};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ApeHeader {
	pub(crate) version: u32,
	/// Size of the items and the footer, not including the header
	pub(crate) size: u32,
	pub(crate) item_count: u32,
	pub(crate) flags: u32,
}

impl ApeHeader {
	pub(crate) fn read_only(&self) -> bool {
		self.flags & FLAG_READ_ONLY == FLAG_READ_ONLY
	}

	/// Whether a header precedes the items
	///
	/// Version 1 tags never have one.
	pub(crate) fn has_header(&self) -> bool {
		self.version == APE_VERSION_2 && self.flags & FLAG_HAS_HEADER == FLAG_HAS_HEADER
	}

	/// The size of the whole tag, including the header
	pub(crate) fn total_size(&self) -> u64 {
		let header = if self.has_header() { FOOTER_SIZE } else { 0 };
		u64::from(self.size) + u64::from(header)
	}
}

/// Read the remaining 24 bytes of a footer, after the preamble
///
/// The items (and the header, if any) may not start before `min_start`. The reader is
/// left at the start of the items.
pub(crate) fn read_ape_footer<R>(data: &mut R, min_start: u64) -> Result<ApeHeader>
where
	R: Read + Seek + ?Sized,
{
	let version = data.read_u32::<LittleEndian>()?;
	let size = data.read_u32::<LittleEndian>()?;

	if size < FOOTER_SIZE {
		// If the size is < 32, something went wrong during encoding
		// The size includes the footer and all items
		return Err(corrupt("Tag has an invalid size (< 32)"));
	}

	let item_count = data.read_u32::<LittleEndian>()?;
	let flags = data.read_u32::<LittleEndian>()?;

	if flags & FLAG_IS_HEADER == FLAG_IS_HEADER {
		return Err(corrupt("Expected a tag footer, found a header"));
	}

	let header = ApeHeader {
		version,
		size,
		item_count,
		flags,
	};

	// Reserved (8)
	let footer_end = data.stream_position()? + 8;
	if footer_end < min_start + header.total_size() {
		return Err(corrupt("Tag is larger than the space before its footer"));
	}

	// Seek back to the end of the header
	data.seek(SeekFrom::Start(footer_end - u64::from(size)))?;

	Ok(header)
}
