#![allow(dead_code)]

use std::io::Cursor;

use tagkit::stream::FileStream;

pub const XM_MAGIC: &[u8; 17] = b"Extended Module: ";

pub fn stream(data: &[u8]) -> FileStream<Cursor<Vec<u8>>> {
	FileStream::new(Cursor::new(data.to_vec()))
}

pub fn bytes(stream: FileStream<Cursor<Vec<u8>>>) -> Vec<u8> {
	stream.into_inner().into_inner()
}

fn fixed(text: &str, width: usize) -> Vec<u8> {
	let mut slot = text.as_bytes().to_vec();
	slot.resize(width, 0);
	slot
}

pub struct XmSample {
	pub name: &'static str,
	pub data: Vec<u8>,
}

pub struct XmInstrument {
	pub name: &'static str,
	/// Declared header size, `None` for the usual 263 (29 without samples)
	pub header_size: Option<u32>,
	/// Declared sample header size, `None` for the usual 40
	pub sample_header_size: Option<u32>,
	pub samples: Vec<XmSample>,
}

impl XmInstrument {
	pub fn new(name: &'static str, samples: Vec<XmSample>) -> Self {
		Self {
			name,
			header_size: None,
			sample_header_size: None,
			samples,
		}
	}
}

/// A module built field by field, independent of the parser
pub struct XmBuilder {
	pub stripped: bool,
	pub title: &'static str,
	pub tracker_name: &'static str,
	/// Declared module header size, `None` for the usual 276
	pub header_size: Option<u32>,
	pub channels: u16,
	pub patterns: Vec<Vec<u8>>,
	pub instruments: Vec<XmInstrument>,
}

impl Default for XmBuilder {
	fn default() -> Self {
		Self {
			stripped: false,
			title: "MySong",
			tracker_name: "FastTracker v2.00",
			header_size: None,
			channels: 4,
			patterns: Vec::new(),
			instruments: Vec::new(),
		}
	}
}

impl XmBuilder {
	pub fn build(&self) -> Vec<u8> {
		let mut data = Vec::new();

		if self.stripped {
			data.extend_from_slice(&[0; 17]);
		} else {
			data.extend_from_slice(XM_MAGIC);
		}

		data.extend(fixed(self.title, 20));
		data.push(if self.stripped { 0 } else { 0x1A });
		data.extend(fixed(self.tracker_name, 20));
		data.extend_from_slice(&0x0104_u16.to_le_bytes());

		let header_size = self.header_size.unwrap_or(276);
		data.extend_from_slice(&header_size.to_le_bytes());

		let mut header = Vec::new();
		for field in [
			self.patterns.len().max(1) as u16,
			0,
			self.channels,
			self.patterns.len() as u16,
			self.instruments.len() as u16,
			1,
			6,
			125,
		] {
			header.extend_from_slice(&field.to_le_bytes());
		}

		// Pattern order table
		header.resize(header_size.saturating_sub(4) as usize, 0);
		data.extend(header);

		for pattern in &self.patterns {
			data.extend_from_slice(&9_u32.to_le_bytes());
			data.push(0);
			data.extend_from_slice(&64_u16.to_le_bytes());
			data.extend_from_slice(&(pattern.len() as u16).to_le_bytes());
			data.extend_from_slice(pattern);
		}

		for instrument in &self.instruments {
			data.extend(build_instrument(instrument));
		}

		data
	}
}

fn build_instrument(instrument: &XmInstrument) -> Vec<u8> {
	let default_size = if instrument.samples.is_empty() { 29 } else { 263 };
	let header_size = instrument.header_size.unwrap_or(default_size);
	let sample_header_size = instrument.sample_header_size.unwrap_or(40);

	let mut header = header_size.to_le_bytes().to_vec();
	header.extend(fixed(instrument.name, 22));
	header.push(0);
	header.extend_from_slice(&(instrument.samples.len() as u16).to_le_bytes());

	if !instrument.samples.is_empty() {
		// Sample header size
		header.extend_from_slice(&sample_header_size.to_le_bytes());
	}

	header.resize(header_size as usize, 0);

	let mut data = header;
	for sample in &instrument.samples {
		let mut sample_header = (sample.data.len() as u32).to_le_bytes().to_vec();
		// Loop start and length
		sample_header.extend_from_slice(&[0; 8]);
		// Volume, finetune, type, panning, note, compression
		sample_header.extend_from_slice(&[64, 0, 0, 128, 0, 0]);
		sample_header.extend(fixed(sample.name, 22));

		sample_header.resize(sample_header_size as usize, 0);
		data.extend(sample_header);
	}

	for sample in &instrument.samples {
		data.extend_from_slice(&sample.data);
	}

	data
}

/// A full featured module: 2 patterns, 2 instruments (one without samples) and 2 samples
pub fn xm_module() -> XmBuilder {
	XmBuilder {
		patterns: vec![vec![0x80; 64], vec![0x81; 32]],
		instruments: vec![
			XmInstrument::new(
				"Bass",
				vec![
					XmSample {
						name: "kick",
						data: vec![1; 100],
					},
					XmSample {
						name: "snare",
						data: vec![2; 50],
					},
				],
			),
			XmInstrument::new("Lead", Vec::new()),
		],
		..XmBuilder::default()
	}
}

// APE

pub const APE_AUDIO: &[u8] = &[0xAB; 1000];

pub struct ApeItem {
	pub key: &'static str,
	/// 0 text, 1 binary, 2 locator
	pub item_type: u32,
	pub read_only: bool,
	pub value: Vec<u8>,
}

impl ApeItem {
	pub fn text(key: &'static str, value: &str) -> Self {
		Self {
			key,
			item_type: 0,
			read_only: false,
			value: value.as_bytes().to_vec(),
		}
	}

	pub fn binary(key: &'static str, value: &[u8]) -> Self {
		Self {
			key,
			item_type: 1,
			read_only: false,
			value: value.to_vec(),
		}
	}

	pub fn read_only(mut self) -> Self {
		self.read_only = true;
		self
	}
}

fn ape_frame(size: u32, item_count: u32, flags: u32) -> Vec<u8> {
	let mut frame = b"APETAGEX".to_vec();
	frame.extend_from_slice(&2000_u32.to_le_bytes());
	frame.extend_from_slice(&size.to_le_bytes());
	frame.extend_from_slice(&item_count.to_le_bytes());
	frame.extend_from_slice(&flags.to_le_bytes());
	frame.extend_from_slice(&[0; 8]);
	frame
}

/// An APEv2 tag with a header and a footer
pub fn ape_tag(items: &[ApeItem]) -> Vec<u8> {
	let mut body = Vec::new();
	for item in items {
		body.extend_from_slice(&(item.value.len() as u32).to_le_bytes());
		body.extend_from_slice(&((item.item_type << 1) | u32::from(item.read_only)).to_le_bytes());
		body.extend_from_slice(item.key.as_bytes());
		body.push(0);
		body.extend_from_slice(&item.value);
	}

	let size = body.len() as u32 + 32;
	let count = items.len() as u32;

	let mut tag = ape_frame(size, count, 0xE000_0000);
	tag.extend(body);
	tag.extend(ape_frame(size, count, 0xC000_0000));
	tag
}

/// `MAC ` followed by a version 3990 descriptor and header: 2 channels, 44.1 kHz,
/// 16 bits, 1 frame of 44100 blocks
pub fn mac_header() -> Vec<u8> {
	let mut data = b"MAC ".to_vec();
	data.extend_from_slice(&3990_u16.to_le_bytes());
	data.extend_from_slice(&[0; 2]);
	data.extend_from_slice(&52_u32.to_le_bytes());
	data.extend_from_slice(&[0; 40]);

	// Compression type and format flags
	data.extend_from_slice(&2000_u16.to_le_bytes());
	data.extend_from_slice(&[0; 2]);
	data.extend_from_slice(&73728_u32.to_le_bytes());
	data.extend_from_slice(&44100_u32.to_le_bytes());
	data.extend_from_slice(&1_u32.to_le_bytes());
	data.extend_from_slice(&16_u16.to_le_bytes());
	data.extend_from_slice(&2_u16.to_le_bytes());
	data.extend_from_slice(&44100_u32.to_le_bytes());
	data
}

/// The audio part of an APE file: `MAC ` header and payload
pub fn ape_audio() -> Vec<u8> {
	let mut data = mac_header();
	data.extend_from_slice(APE_AUDIO);
	data
}

pub fn id3v1() -> Vec<u8> {
	let mut tag = b"TAG".to_vec();
	tag.extend(fixed("id3v1 title", 30));
	tag.resize(128, 0);
	tag
}

pub fn id3v2() -> Vec<u8> {
	let mut tag = b"ID3\x04\x00\x00\x00\x00\x00\x14".to_vec();
	tag.extend_from_slice(&[0; 20]);
	tag
}

pub fn ape_file(items: &[ApeItem], with_id3v1: bool) -> Vec<u8> {
	let mut data = ape_audio();
	if !items.is_empty() {
		data.extend(ape_tag(items));
	}
	if with_id3v1 {
		data.extend(id3v1());
	}
	data
}
