use super::read::corrupt;
use crate::error::Result;
use crate::file::FileProperties;

use std::io::{Read, Seek, SeekFrom};
use std::time::Duration;

use byteorder::{LittleEndian, ReadBytesExt};

#[derive(Clone, Debug, PartialEq, Eq, Default)]
/// An APE file's audio properties
pub struct ApeProperties {
	pub(crate) version: u16,
	pub(crate) duration: Duration,
	pub(crate) overall_bitrate: u32,
	pub(crate) audio_bitrate: u32,
	pub(crate) sample_rate: u32,
	pub(crate) bits_per_sample: u16,
	pub(crate) channels: u8,
	pub(crate) total_samples: u64,
}

impl From<&ApeProperties> for FileProperties {
	fn from(input: &ApeProperties) -> Self {
		Self {
			duration: input.duration,
			overall_bitrate: Some(input.overall_bitrate),
			audio_bitrate: Some(input.audio_bitrate),
			sample_rate: Some(input.sample_rate),
			channels: Some(input.channels),
		}
	}
}

impl ApeProperties {
	/// Duration
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Overall bitrate (kbps)
	pub fn overall_bitrate(&self) -> u32 {
		self.overall_bitrate
	}

	/// Audio bitrate (kbps)
	pub fn bitrate(&self) -> u32 {
		self.audio_bitrate
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> u32 {
		self.sample_rate
	}

	/// Bits per sample
	///
	/// Only stored by version 3980 and later, 16 is assumed for older files.
	pub fn bits_per_sample(&self) -> u16 {
		self.bits_per_sample
	}

	/// Channel count
	pub fn channels(&self) -> u8 {
		self.channels
	}

	/// Total number of samples, per channel
	pub fn total_samples(&self) -> u64 {
		self.total_samples
	}

	/// APE version
	pub fn version(&self) -> u16 {
		self.version
	}
}

// The frame layout shared by both header versions
struct Frames {
	blocks_per_frame: u32,
	final_frame_blocks: u32,
	total_frames: u32,
}

/// Read the properties following a `MAC ` identifier
///
/// `stream_len` is the length of the audio data, `file_length` the length of the whole file.
pub(super) fn read_properties<R>(
	data: &mut R,
	stream_len: u64,
	file_length: u64,
) -> Result<ApeProperties>
where
	R: Read + Seek,
{
	let version = data
		.read_u16::<LittleEndian>()
		.map_err(|_| corrupt("Unable to read version"))?;

	// Property reading differs between versions
	let (frames, mut properties) = if version >= 3980 {
		properties_gt_3980(data)?
	} else {
		properties_lt_3980(data, version)?
	};

	if frames.total_frames == 0 {
		return Err(corrupt("File contains no frames"));
	}

	if !(1..=32).contains(&properties.channels) {
		return Err(corrupt(
			"File has an invalid channel count (must be between 1 and 32 inclusive)",
		));
	}

	properties.version = version;
	properties.total_samples = u64::from(frames.final_frame_blocks)
		+ u64::from(frames.blocks_per_frame) * u64::from(frames.total_frames - 1);

	if properties.sample_rate > 0 {
		let length = (properties.total_samples * 1000) / u64::from(properties.sample_rate);

		properties.duration = Duration::from_millis(length);

		// Shorter than a millisecond
		if length > 0 {
			properties.overall_bitrate = ((file_length * 8) / length) as u32;
			properties.audio_bitrate = ((stream_len * 8) / length) as u32;
		}
	}

	log::debug!(
		"APE version {version}: {} samples at {} Hz",
		properties.total_samples,
		properties.sample_rate
	);

	Ok(properties)
}

fn properties_gt_3980<R>(data: &mut R) -> Result<(Frames, ApeProperties)>
where
	R: Read + Seek,
{
	// First read the file descriptor
	let mut descriptor = [0; 46];
	data.read_exact(&mut descriptor)
		.map_err(|_| corrupt("Not enough data left in reader to finish file descriptor"))?;

	// The only piece of information we need from the file descriptor
	let descriptor_len = (&descriptor[2..6]).read_u32::<LittleEndian>()?;

	// The descriptor should be 52 bytes long (including ['M', 'A', 'C', ' ']
	// Anything extra is unknown, and just gets skipped
	if descriptor_len > 52 {
		data.seek(SeekFrom::Current(i64::from(descriptor_len - 52)))?;
	}

	// Move on to the header
	let mut header = [0; 24];
	data.read_exact(&mut header)
		.map_err(|_| corrupt("Not enough data left in reader to finish MAC header"))?;

	// Skip the first 4 bytes of the header
	// Compression type (2)
	// Format flags (2)
	let header_read = &mut &header[4..];

	let frames = Frames {
		blocks_per_frame: header_read.read_u32::<LittleEndian>()?,
		final_frame_blocks: header_read.read_u32::<LittleEndian>()?,
		total_frames: header_read.read_u32::<LittleEndian>()?,
	};

	let bits_per_sample = header_read.read_u16::<LittleEndian>()?;
	let channels = header_read.read_u16::<LittleEndian>()?;
	let sample_rate = header_read.read_u32::<LittleEndian>()?;

	Ok((
		frames,
		ApeProperties {
			sample_rate,
			bits_per_sample,
			channels: u8::try_from(channels).unwrap_or(0),
			..ApeProperties::default()
		},
	))
}

fn properties_lt_3980<R>(data: &mut R, version: u16) -> Result<(Frames, ApeProperties)>
where
	R: Read + Seek,
{
	// Versions < 3980 don't have a descriptor
	let mut header = [0; 26];
	data.read_exact(&mut header)
		.map_err(|_| corrupt("Not enough data left in reader to finish MAC header"))?;

	// We don't need all the header data, so just make 2 slices
	let header_first = &mut &header[..10];

	// Skipping 8 bytes
	// WAV header length (4)
	// WAV tail length (4)
	let header_second = &mut &header[18..];

	let compression_level = header_first.read_u16::<LittleEndian>()?;

	// Unused
	let _format_flags = header_first.read_u16::<LittleEndian>()?;

	let blocks_per_frame = match version {
		_ if version >= 3950 => 73728 * 4,
		_ if version >= 3900 || (version >= 3800 && compression_level >= 4000) => 73728,
		_ => 9216,
	};

	let channels = header_first.read_u16::<LittleEndian>()?;
	let sample_rate = header_first.read_u32::<LittleEndian>()?;

	// Move on the second part of header
	let total_frames = header_second.read_u32::<LittleEndian>()?;
	let final_frame_blocks = header_second.read_u32::<LittleEndian>()?;

	Ok((
		Frames {
			blocks_per_frame,
			final_frame_blocks,
			total_frames,
		},
		ApeProperties {
			sample_rate,
			bits_per_sample: 16,
			channels: u8::try_from(channels).unwrap_or(0),
			..ApeProperties::default()
		},
	))
}
