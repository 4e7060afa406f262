use super::properties::XmProperties;
use super::tag::XmTag;
use super::{XmFile, MAGIC};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{Result, TagError};
use crate::file::FileType;
use crate::reader::{try_read_u32_le, StructReader};

use std::io::{Read, Seek, SeekFrom};

pub(super) fn corrupt(message: &'static str) -> TagError {
	TagError::corrupt(FileType::Xm, message)
}

#[derive(Default)]
struct Names {
	instruments: Vec<String>,
	samples: Vec<String>,
}

impl Names {
	fn into_comment(self) -> String {
		let mut comment = self.instruments.join("\n");

		if !self.samples.is_empty() {
			comment.push('\n');
			comment.push_str(&self.samples.join("\n"));
		}

		comment
	}
}

pub(super) fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<XmFile>
where
	R: Read + Seek,
{
	reader.seek(SeekFrom::Start(0))?;

	let mut magic = [0; 17];
	reader
		.read_exact(&mut magic)
		.map_err(|_| corrupt("File is too short to contain a module header"))?;

	// Stripped files zero out the magic
	if &magic != MAGIC && magic != [0; 17] {
		return Err(corrupt("Invalid magic"));
	}

	let mut tag = XmTag::default();
	let mut properties = XmProperties::default();

	let mut escape = 0;
	let mut header_size = 0;

	let complete = {
		let mut leading = StructReader::new()
			.string(&mut tag.title, 20)
			.byte(&mut escape)
			.string(&mut tag.tracker_name, 20)
			.u16_le(&mut properties.version)
			.u32_le(&mut header_size);

		let size = leading.size();
		leading.read(reader, size)? == size
	};

	if !complete {
		return Err(corrupt("Module header is truncated"));
	}

	// Also zeroed in stripped files
	if escape != 0x1A && escape != 0 {
		return Err(corrupt("Invalid escape byte after the title"));
	}

	if header_size < 4 {
		return Err(corrupt("Header size is smaller than 4 bytes"));
	}

	let (consumed, expected) = {
		let mut header = StructReader::new()
			.u16_le(&mut properties.length_in_patterns)
			.u16_le(&mut properties.restart_position)
			.u16_le(&mut properties.channels)
			.u16_le(&mut properties.pattern_count)
			.u16_le(&mut properties.instrument_count)
			.u16_le(&mut properties.flags)
			.u16_le(&mut properties.tempo)
			.u16_le(&mut properties.bpm_speed);

		let limit = header_size - 4;
		let expected = limit.min(header.size());
		(header.read(reader, limit)?, expected)
	};

	if consumed != expected {
		return Err(corrupt("Module header is shorter than its declared size"));
	}

	// Skips the pattern order table
	reader.seek(SeekFrom::Start(60 + u64::from(header_size)))?;

	let mut names = Names::default();
	if let Err(err) = read_records(reader, &mut properties, &mut names) {
		match parse_options.parsing_mode {
			ParsingMode::Strict => return Err(err),
			_ => log::warn!("Keeping partially read module: {err}"),
		}
	}

	tag.comment = names.into_comment();

	log::debug!(
		"Read module {:?}: {} patterns, {} instruments, {} samples",
		tag.title,
		properties.pattern_count,
		properties.instrument_count,
		properties.sample_count
	);

	if !parse_options.read_properties {
		properties = XmProperties::default();
	}

	Ok(XmFile { tag, properties })
}

fn read_records<R>(reader: &mut R, properties: &mut XmProperties, names: &mut Names) -> Result<()>
where
	R: Read + Seek,
{
	for i in 0..properties.pattern_count {
		read_pattern(reader, i)?;
	}

	for i in 0..properties.instrument_count {
		read_instrument(reader, i, properties, names)?;
	}

	Ok(())
}

fn read_pattern<R>(reader: &mut R, index: u16) -> Result<()>
where
	R: Read + Seek,
{
	let header_len =
		try_read_u32_le(reader)?.ok_or_else(|| corrupt("Pattern header is truncated"))?;

	if header_len < 4 {
		return Err(corrupt("Pattern header is smaller than 4 bytes"));
	}

	let mut packing_type = 0;
	let mut rows = 0;
	let mut data_size = 0;

	let (count, expected) = {
		let mut pattern = StructReader::new()
			.byte(&mut packing_type)
			.u16_le(&mut rows)
			.u16_le(&mut data_size);

		let limit = header_len - 4;
		let expected = limit.min(pattern.size());
		(pattern.read(reader, limit)?, expected)
	};

	if count != expected {
		return Err(corrupt("Pattern header is shorter than its declared size"));
	}

	log::trace!("Pattern {index}: {rows} rows, packing type {packing_type}, {data_size} bytes");

	// The cells themselves are never decoded
	reader.seek(SeekFrom::Current(
		i64::from(header_len - 4 - count) + i64::from(data_size),
	))?;

	Ok(())
}

fn read_instrument<R>(
	reader: &mut R,
	index: u16,
	properties: &mut XmProperties,
	names: &mut Names,
) -> Result<()>
where
	R: Read + Seek,
{
	let header_size =
		try_read_u32_le(reader)?.ok_or_else(|| corrupt("Instrument header is truncated"))?;

	if header_size < 4 {
		return Err(corrupt("Instrument header is smaller than 4 bytes"));
	}

	let mut name = String::new();
	let mut instrument_type = 0;
	let mut sample_count = 0;

	// Both counts include the 4 byte size field
	let (count, expected) = {
		let mut instrument = StructReader::new()
			.string(&mut name, 22)
			.byte(&mut instrument_type)
			.u16_le(&mut sample_count);

		let expected = header_size.min(instrument.size() + 4);
		(4 + instrument.read(reader, header_size - 4)?, expected)
	};

	if count != expected {
		return Err(corrupt("Instrument header is shorter than its declared size"));
	}

	log::trace!("Instrument {index}: {name:?}, type {instrument_type}, {sample_count} samples");

	let offset = if sample_count == 0 {
		u64::from(header_size - count)
	} else {
		properties.sample_count += u32::from(sample_count);

		// Without it, the size of the sample headers is unknown
		if header_size < count + 4 {
			return Err(corrupt("Instrument header is missing the sample header size"));
		}

		let sample_header_size = try_read_u32_le(reader)?
			.ok_or_else(|| corrupt("Instrument header is missing the sample header size"))?;

		reader.seek(SeekFrom::Current(i64::from(header_size - count - 4)))?;

		let mut data_len = 0;
		for _ in 0..sample_count {
			let (len, sample_name) = read_sample_header(reader, sample_header_size)?;

			data_len += u64::from(len);
			names.samples.push(sample_name);
		}

		properties.sample_data_length += data_len;
		data_len
	};

	names.instruments.push(name);

	let offset = i64::try_from(offset).map_err(|_| TagError::TooMuchData)?;
	reader.seek(SeekFrom::Current(offset))?;

	Ok(())
}

fn read_sample_header<R>(reader: &mut R, header_size: u32) -> Result<(u32, String)>
where
	R: Read + Seek,
{
	let mut length = 0;
	let mut loop_start = 0;
	let mut loop_length = 0;
	let mut volume = 0;
	let mut finetune = 0;
	let mut sample_type = 0;
	let mut panning = 0;
	let mut note = 0;
	let mut compression = 0;
	let mut name = String::new();

	let (count, expected) = {
		let mut sample = StructReader::new()
			.u32_le(&mut length)
			.u32_le(&mut loop_start)
			.u32_le(&mut loop_length)
			.byte(&mut volume)
			.byte(&mut finetune)
			.byte(&mut sample_type)
			.byte(&mut panning)
			.byte(&mut note)
			.byte(&mut compression)
			.string(&mut name, 22);

		let expected = header_size.min(sample.size());
		(sample.read(reader, header_size)?, expected)
	};

	if count != expected {
		return Err(corrupt("Sample header is shorter than its declared size"));
	}

	log::trace!(
		"Sample {name:?}: {length} bytes, loop {loop_start}+{loop_length}, volume {volume}, \
		 finetune {finetune}, type {sample_type}, panning {panning}, note {note}, compression \
		 {compression}"
	);

	reader.seek(SeekFrom::Current(i64::from(header_size - count)))?;

	Ok((length, name))
}
