use super::ape_tag::ApeTag;
use super::read::read_ape_tag;
use super::read_ape_footer;
use crate::ape::constants::{
	APE_PREAMBLE, APE_VERSION_2, FLAG_HAS_FOOTER, FLAG_HAS_HEADER, FLAG_IS_HEADER,
	FLAG_READ_ONLY, FOOTER_SIZE, ID3V1_SIZE,
};
use crate::ape::id3v2_len;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Result, TagError};
use crate::stream::Stream;
use crate::tag::item::{ItemValue, TagItem};
use crate::tag::store::ItemStore;

use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};

// Where the tag lives, or should be placed
#[derive(Debug, PartialEq, Eq)]
struct TagRegion {
	start: u64,
	len: u64,
}

/// Replace the APE tag in `stream` with `tag`
///
/// Everything outside of the tag region (a leading ID3v2 tag, the audio, a trailing ID3v1
/// tag) is left as is. An empty tag removes the region.
pub(crate) fn write_to<S>(stream: &mut S, tag: &ApeTag, write_options: WriteOptions) -> Result<()>
where
	S: Stream + ?Sized,
{
	if stream.is_read_only() {
		return Err(TagError::ReadOnlyWrite);
	}

	let (region, existing) = find_tag_region(stream)?;

	let mut items = tag.items.clone();

	// Read only items on disk win over the in-memory tag
	if write_options.preserve_read_only {
		if let Some(existing) = existing {
			for item in existing.items.items().iter().filter(|item| item.read_only) {
				log::debug!("APE: Preserving read only item {:?}", item.key());
				items.insert_unchecked(item.clone());
			}
		}
	}

	let rendered = create_ape_tag(&items, tag.read_only)?;

	if rendered.is_empty() && region.len == 0 {
		return Ok(());
	}

	log::debug!(
		"APE: Replacing {} bytes at {} with a {} byte tag",
		region.len,
		region.start,
		rendered.len()
	);

	stream.insert(&rendered, region.start, region.len)
}

fn find_tag_region<R>(data: &mut R) -> Result<(TagRegion, Option<ApeTag>)>
where
	R: Read + Seek + ?Sized,
{
	let stream_len = data.seek(SeekFrom::End(0))?;

	// The tag can never overlap a leading ID3v2 tag
	data.seek(SeekFrom::Start(0))?;
	let mut id3v2_header = [0; 10];
	let audio_start = match data.read_exact(&mut id3v2_header) {
		Ok(()) => id3v2_len(&id3v2_header).unwrap_or(0),
		Err(_) => 0,
	};

	let mut tag_end = stream_len;

	// Starts with ['T', 'A', 'G'], exactly 128 bytes long
	if stream_len >= audio_start + ID3V1_SIZE {
		data.seek(SeekFrom::Start(stream_len - ID3V1_SIZE))?;

		let mut id3v1_ident = [0; 3];
		data.read_exact(&mut id3v1_ident)?;

		if &id3v1_ident == b"TAG" {
			tag_end -= ID3V1_SIZE;
		}
	}

	let missing = TagRegion {
		start: tag_end,
		len: 0,
	};

	if tag_end < audio_start + u64::from(FOOTER_SIZE) {
		return Ok((missing, None));
	}

	data.seek(SeekFrom::Start(tag_end - u64::from(FOOTER_SIZE)))?;

	let mut ape_preamble = [0; 8];
	data.read_exact(&mut ape_preamble)?;

	if &ape_preamble != APE_PREAMBLE {
		return Ok((missing, None));
	}

	let header = read_ape_footer(data, audio_start)?;
	let existing = read_ape_tag(data, header, ParseOptions::new())?;

	let len = header.total_size();
	Ok((
		TagRegion {
			start: tag_end - len,
			len,
		},
		Some(existing),
	))
}

/// Render the items, framed by a header and a footer
///
/// No items means no tag at all.
pub(crate) fn create_ape_tag(items: &ItemStore, read_only: bool) -> Result<Vec<u8>> {
	if items.is_empty() {
		return Ok(Vec::new());
	}

	let mut tag = Vec::new();
	for item in items.items() {
		write_item(&mut tag, item)?;
	}

	let item_count = u32::try_from(items.len()).map_err(|_| TagError::TooMuchData)?;

	// The total size includes the 32 bytes of the footer
	let size = u32::try_from(tag.len() + FOOTER_SIZE as usize)
		.map_err(|_| TagError::TooMuchData)?;

	// Bit 30 set: tag contains a footer
	// Bit 31 set: tag contains a header
	let mut flags = FLAG_HAS_FOOTER | FLAG_HAS_HEADER;
	if read_only {
		flags |= FLAG_READ_ONLY;
	}

	let mut rendered = Vec::with_capacity(tag.len() + 2 * FOOTER_SIZE as usize);

	// The header is exactly the same as the footer, except for bit 29
	write_footer(&mut rendered, size, item_count, flags | FLAG_IS_HEADER)?;
	rendered.append(&mut tag);
	write_footer(&mut rendered, size, item_count, flags)?;

	Ok(rendered)
}

fn write_footer(writer: &mut Vec<u8>, size: u32, item_count: u32, flags: u32) -> Result<()> {
	writer.write_all(APE_PREAMBLE)?;
	// Even if we read a v1 tag, we end up adding a header anyway
	writer.write_u32::<LittleEndian>(APE_VERSION_2)?;
	writer.write_u32::<LittleEndian>(size)?;
	writer.write_u32::<LittleEndian>(item_count)?;
	writer.write_u32::<LittleEndian>(flags)?;
	// The header/footer must end in 8 bytes of zeros
	writer.write_u64::<LittleEndian>(0)?;

	Ok(())
}

fn write_item(writer: &mut Vec<u8>, item: &TagItem) -> Result<()> {
	let (item_type, value) = match item.value() {
		ItemValue::Text(values) => (0_u32, values.join("\0").into_bytes()),
		ItemValue::Binary(data) => (1, data.clone()),
		ItemValue::Locator(values) => (2, values.join("\0").into_bytes()),
	};

	let mut flags = item_type << 1;
	if item.read_only {
		flags |= FLAG_READ_ONLY;
	}

	let size = u32::try_from(value.len()).map_err(|_| TagError::TooMuchData)?;

	writer.write_u32::<LittleEndian>(size)?;
	writer.write_u32::<LittleEndian>(flags)?;
	writer.write_all(item.key().as_bytes())?;
	writer.write_u8(0)?;
	writer.write_all(&value)?;

	Ok(())
}
