use super::constants::{APE_PREAMBLE, FOOTER_SIZE, ID3V1_SIZE};
use super::tag::ape_tag::ApeTag;
use super::tag::read::read_ape_tag;
use super::tag::read_ape_footer;
use super::{id3v2_len, ApeFile, ApeProperties};
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{Result, TagError};
use crate::file::FileType;

use std::io::{Read, Seek, SeekFrom};

pub(crate) fn corrupt(message: &'static str) -> TagError {
	TagError::corrupt(FileType::Ape, message)
}

pub(super) fn read_from<R>(data: &mut R, parse_options: ParseOptions) -> Result<ApeFile>
where
	R: Read + Seek,
{
	let file_length = data.seek(SeekFrom::End(0))?;
	data.seek(SeekFrom::Start(0))?;

	if file_length == 0 {
		return Err(TagError::EmptyFile);
	}

	let mut stream_len = file_length;

	// ID3v2 tags are unsupported in APE files, but still possible
	let mut id3v2_header = [0; 10];
	let id3v2 = match data.read_exact(&mut id3v2_header) {
		Ok(()) => id3v2_len(&id3v2_header),
		Err(_) => None,
	};

	let audio_start = id3v2.unwrap_or(0);
	if audio_start > file_length {
		return Err(corrupt("ID3v2 tag is larger than the file"));
	}

	stream_len -= audio_start;
	data.seek(SeekFrom::Start(audio_start))?;

	let mut mac = [0; 4];
	data.read_exact(&mut mac)
		.map_err(|_| corrupt("File is too short to contain a MAC header"))?;

	if &mac != b"MAC " {
		return Err(corrupt(
			"Invalid data found while reading header, expected \"MAC \"",
		));
	}

	let mac_start = audio_start + 4;

	// First see if there's a ID3v1 tag
	//
	// Starts with ['T', 'A', 'G']
	// Exactly 128 bytes long (including the identifier)
	let mut tag_end = file_length;
	let mut id3v1 = false;

	if file_length >= mac_start + ID3V1_SIZE {
		data.seek(SeekFrom::Start(file_length - ID3V1_SIZE))?;

		let mut id3v1_ident = [0; 3];
		data.read_exact(&mut id3v1_ident)?;

		if &id3v1_ident == b"TAG" {
			log::debug!("APE: Skipping ID3v1 tag");

			id3v1 = true;
			tag_end -= ID3V1_SIZE;
			stream_len -= ID3V1_SIZE;
		}
	}

	// Next, search for an APE tag footer
	//
	// Starts with ['A', 'P', 'E', 'T', 'A', 'G', 'E', 'X']
	// Exactly 32 bytes long
	// Strongly recommended to be at the end of the file
	let mut ape_tag = ApeTag::new();

	if tag_end >= mac_start + u64::from(FOOTER_SIZE) {
		data.seek(SeekFrom::Start(tag_end - u64::from(FOOTER_SIZE)))?;

		let mut ape_preamble = [0; 8];
		data.read_exact(&mut ape_preamble)?;

		if &ape_preamble == APE_PREAMBLE {
			let tag = read_ape_footer(data, mac_start).and_then(|header| {
				let tag = read_ape_tag(data, header, parse_options)?;
				Ok((header, tag))
			});

			match tag {
				Ok((header, tag)) => {
					stream_len -= header.total_size();
					ape_tag = tag;
				},
				Err(err) if parse_options.parsing_mode == ParsingMode::Strict => return Err(err),
				Err(err) => log::warn!("APE: Ignoring unreadable tag: {err}"),
			}
		}
	}

	log::debug!("APE: Read {} tag items", ape_tag.items.len());

	let properties = if parse_options.read_properties {
		// Go back to the MAC header to read properties
		data.seek(SeekFrom::Start(mac_start))?;
		super::properties::read_properties(data, stream_len, file_length)?
	} else {
		ApeProperties::default()
	};

	Ok(ApeFile {
		ape_tag,
		id3v2_len: id3v2,
		id3v1,
		properties,
	})
}
