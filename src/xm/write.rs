use super::read::corrupt;
use super::tag::XmTag;
use crate::error::{Result, TagError};
use crate::reader::{encode_latin1_fixed, try_read_u32_le, StructReader};
use crate::stream::Stream;

use std::io::{Read, Seek, SeekFrom};

const TITLE_OFFSET: u64 = 17;
const TRACKER_NAME_OFFSET: u64 = 38;
const HEADER_OFFSET: u64 = 60;

const TITLE_LEN: usize = 20;
const NAME_LEN: u32 = 22;

// Offsets within an instrument header
const INSTRUMENT_NAME_OFFSET: u64 = 4;
// Name and instrument type, counted from the end of the size field
const SAMPLE_COUNT_SKIP: u32 = 23;
const SAMPLE_HEADER_SIZE_OFFSET: u64 = 29;
const MIN_SAMPLE_HEADER_SIZE_END: u32 = 33;

// Offset within a sample header
const SAMPLE_NAME_OFFSET: u32 = 18;

#[derive(Debug)]
struct Patch {
	offset: u64,
	data: Vec<u8>,
}

/// Overwrite the name slots of the module in `stream`
///
/// The module layout is walked first, nothing is written unless every slot was found.
pub(super) fn write_to<S>(stream: &mut S, tag: &XmTag) -> Result<()>
where
	S: Stream + ?Sized,
{
	if stream.is_read_only() {
		return Err(TagError::ReadOnlyWrite);
	}

	let patches = collect_patches(stream, tag)?;

	let stream_len = stream.length()?;
	if let Some(patch) = patches
		.iter()
		.find(|patch| patch.offset + patch.data.len() as u64 > stream_len)
	{
		return Err(TagError::PatchOutOfBounds {
			offset: patch.offset,
			len: patch.data.len(),
		});
	}

	for patch in &patches {
		stream.patch(patch.offset, &patch.data)?;
	}

	log::debug!("Patched {} name slots", patches.len());
	Ok(())
}

/// Read a little endian `u16` that sits `skip` bytes into a record of `limit` bytes
///
/// Stripped records may end before the field, in which case it reads as 0 (or
/// whatever bytes of it are present), the same way the parser sees it.
fn read_u16_field<R>(reader: &mut R, record: u64, skip: u32, limit: u32) -> Result<u16>
where
	R: Read + Seek + ?Sized,
{
	reader.seek(SeekFrom::Start(record))?;

	let mut value = 0;
	let mut field = StructReader::new().skip(skip).u16_le(&mut value);

	let expected = limit.min(field.size());
	if field.read(reader, limit)? != expected {
		return Err(corrupt("Record is shorter than its declared size"));
	}

	drop(field);
	Ok(value)
}

fn read_u32_at<R>(reader: &mut R, offset: u64, message: &'static str) -> Result<u32>
where
	R: Read + Seek + ?Sized,
{
	reader.seek(SeekFrom::Start(offset))?;
	try_read_u32_le(reader)?.ok_or_else(|| corrupt(message))
}

fn collect_patches<R>(reader: &mut R, tag: &XmTag) -> Result<Vec<Patch>>
where
	R: Read + Seek + ?Sized,
{
	let mut patches = vec![
		Patch {
			offset: TITLE_OFFSET,
			data: encode_latin1_fixed(&tag.title, TITLE_LEN),
		},
		Patch {
			offset: TRACKER_NAME_OFFSET,
			data: encode_latin1_fixed(&tag.tracker_name, TITLE_LEN),
		},
	];

	let header_size = read_u32_at(reader, HEADER_OFFSET, "Module header is truncated")?;
	if header_size < 4 {
		return Err(corrupt("Header size is smaller than 4 bytes"));
	}

	// Song length, restart position and channels come first
	let header_start = HEADER_OFFSET + 4;
	let pattern_count = read_u16_field(reader, header_start, 6, header_size - 4)?;
	let instrument_count = read_u16_field(reader, header_start, 8, header_size - 4)?;

	let mut pos = HEADER_OFFSET + u64::from(header_size);

	for _ in 0..pattern_count {
		let header_len = read_u32_at(reader, pos, "Pattern header is truncated")?;
		if header_len < 4 {
			return Err(corrupt("Pattern header is smaller than 4 bytes"));
		}

		// Packing type and row count come first
		let data_size = read_u16_field(reader, pos + 4, 3, header_len - 4)?;
		pos += u64::from(header_len) + u64::from(data_size);
	}

	let lines = tag.comment.split('\n').collect::<Vec<_>>();
	let line = |index: usize| lines.get(index).copied().unwrap_or_default();

	let mut sample_index = usize::from(instrument_count);

	for i in 0..usize::from(instrument_count) {
		let header_size = read_u32_at(reader, pos, "Instrument header is truncated")?;
		if header_size < 4 {
			return Err(corrupt("Instrument header is smaller than 4 bytes"));
		}

		let name_len = NAME_LEN.min(header_size - 4);
		patches.push(Patch {
			offset: pos + INSTRUMENT_NAME_OFFSET,
			data: encode_latin1_fixed(line(i), name_len as usize),
		});

		let sample_count =
			read_u16_field(reader, pos + 4, SAMPLE_COUNT_SKIP, header_size - 4)?;

		let mut sample_header_size = 0;
		if sample_count > 0 {
			if header_size < MIN_SAMPLE_HEADER_SIZE_END {
				return Err(corrupt("Instrument header is missing the sample header size"));
			}

			sample_header_size = read_u32_at(
				reader,
				pos + SAMPLE_HEADER_SIZE_OFFSET,
				"Instrument header is missing the sample header size",
			)?;
		}

		pos += u64::from(header_size);

		let mut data_len = 0;
		for _ in 0..sample_count {
			let mut len = 0;
			{
				reader.seek(SeekFrom::Start(pos))?;
				let mut sample = StructReader::new().u32_le(&mut len);

				let expected = sample_header_size.min(sample.size());
				if sample.read(reader, sample_header_size)? != expected {
					return Err(corrupt("Sample header is truncated"));
				}
			}

			if sample_header_size > SAMPLE_NAME_OFFSET {
				let name_len = NAME_LEN.min(sample_header_size - SAMPLE_NAME_OFFSET);
				patches.push(Patch {
					offset: pos + u64::from(SAMPLE_NAME_OFFSET),
					data: encode_latin1_fixed(line(sample_index), name_len as usize),
				});
			}

			// Samples without a name slot still own a (blank) line
			sample_index += 1;

			data_len += u64::from(len);
			pos += u64::from(sample_header_size);
		}

		pos += data_len;
	}

	Ok(patches)
}
