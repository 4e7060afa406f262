//! Declarative readers for fixed-layout binary records
//!
//! Many formats declare the size of a record up front, and "stripped" files
//! declare fewer bytes than the full layout needs. A [`StructReader`] reads its
//! fields in order until the declared size runs out, leaving the remaining
//! destinations untouched, and reports how many bytes it actually consumed.
//!
//! ```rust
//! use std::io::Cursor;
//! use tagkit::reader::StructReader;
//!
//! let mut reader = Cursor::new([0x01, 0x00, 0x02, 0x00, 0x03, 0x00]);
//!
//! let (mut a, mut b, mut c) = (0, 0, 0);
//! let mut record = StructReader::new().u16_le(&mut a).u16_le(&mut b).u16_le(&mut c);
//!
//! // The header only declares 4 bytes
//! let consumed = record.read(&mut reader, 4).unwrap();
//! assert_eq!(consumed, 4);
//! drop(record);
//!
//! assert_eq!((a, b, c), (1, 2, 0));
//! ```

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::io::{self, Read, Seek, SeekFrom};

/// Byte order of an integer field
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endianness {
	/// Least significant byte first
	Little,
	/// Most significant byte first
	Big,
}

/// Name slots in tracker formats mark unused characters with `0xFF`
const UNUSED_CHAR: u8 = 0xFF;

#[derive(Debug)]
enum Field<'a> {
	Skip(u32),
	String { value: &'a mut String, size: u32 },
	Byte(&'a mut u8),
	U16 {
		value: &'a mut u16,
		endianness: Endianness,
	},
	U32 {
		value: &'a mut u32,
		endianness: Endianness,
	},
}

impl Field<'_> {
	fn size(&self) -> u32 {
		match self {
			Field::Skip(size) | Field::String { size, .. } => *size,
			Field::Byte(_) => 1,
			Field::U16 { .. } => 2,
			Field::U32 { .. } => 4,
		}
	}

	fn read<R>(&mut self, reader: &mut R, limit: u32) -> io::Result<u32>
	where
		R: Read + Seek + ?Sized,
	{
		let wanted = self.size().min(limit);

		if let Field::Skip(_) = self {
			return skip_up_to(reader, wanted);
		}

		let data = read_up_to(reader, wanted)?;

		match self {
			Field::Skip(_) => {},
			Field::String { value, .. } => **value = decode_latin1(&data),
			Field::Byte(value) => {
				if let Some(byte) = data.first() {
					**value = *byte;
				}
			},
			Field::U16 { value, endianness } => {
				if !data.is_empty() {
					**value = decode_uint(&data, *endianness) as u16;
				}
			},
			Field::U32 { value, endianness } => {
				if !data.is_empty() {
					**value = decode_uint(&data, *endianness) as u32;
				}
			},
		}

		Ok(data.len() as u32)
	}
}

/// A chain of fields, bound to their destinations, read in declaration order
#[derive(Debug, Default)]
pub struct StructReader<'a> {
	fields: Vec<Field<'a>>,
}

impl<'a> StructReader<'a> {
	/// Create an empty `StructReader`
	pub fn new() -> Self {
		Self { fields: Vec::new() }
	}

	fn push(mut self, field: Field<'a>) -> Self {
		self.fields.push(field);
		self
	}

	/// Skip `size` bytes
	#[must_use]
	pub fn skip(self, size: u32) -> Self {
		self.push(Field::Skip(size))
	}

	/// A fixed-size, NUL terminated Latin-1 string
	///
	/// Any `0xFF` byte is read as a space.
	#[must_use]
	pub fn string(self, value: &'a mut String, size: u32) -> Self {
		self.push(Field::String { value, size })
	}

	/// A single byte
	#[must_use]
	pub fn byte(self, value: &'a mut u8) -> Self {
		self.push(Field::Byte(value))
	}

	/// A 16-bit unsigned integer
	#[must_use]
	pub fn u16(self, value: &'a mut u16, endianness: Endianness) -> Self {
		self.push(Field::U16 { value, endianness })
	}

	/// A little endian 16-bit unsigned integer
	#[must_use]
	pub fn u16_le(self, value: &'a mut u16) -> Self {
		self.u16(value, Endianness::Little)
	}

	/// A big endian 16-bit unsigned integer
	#[must_use]
	pub fn u16_be(self, value: &'a mut u16) -> Self {
		self.u16(value, Endianness::Big)
	}

	/// A 32-bit unsigned integer
	#[must_use]
	pub fn u32(self, value: &'a mut u32, endianness: Endianness) -> Self {
		self.push(Field::U32 { value, endianness })
	}

	/// A little endian 32-bit unsigned integer
	#[must_use]
	pub fn u32_le(self, value: &'a mut u32) -> Self {
		self.u32(value, Endianness::Little)
	}

	/// A big endian 32-bit unsigned integer
	#[must_use]
	pub fn u32_be(self, value: &'a mut u32) -> Self {
		self.u32(value, Endianness::Big)
	}

	/// The number of bytes the full layout occupies
	pub fn size(&self) -> u32 {
		self.fields.iter().map(Field::size).sum()
	}

	/// Read the fields in order, consuming at most `limit` bytes
	///
	/// Returns the number of bytes consumed. A complete read consumes
	/// `min(limit, self.size())` bytes, anything less means the data ended early.
	/// Checking that is left to the caller.
	///
	/// # Errors
	///
	/// Only I/O errors are reported, a short read is not an error
	pub fn read<R>(&mut self, reader: &mut R, mut limit: u32) -> io::Result<u32>
	where
		R: Read + Seek + ?Sized,
	{
		let mut consumed = 0;

		for field in &mut self.fields {
			if limit == 0 {
				break;
			}

			let count = field.read(reader, limit)?;
			limit -= count;
			consumed += count;
		}

		Ok(consumed)
	}
}

fn read_up_to<R: Read + ?Sized>(reader: &mut R, len: u32) -> io::Result<Vec<u8>> {
	let mut data = Vec::with_capacity(len as usize);
	Read::take(&mut *reader, u64::from(len)).read_to_end(&mut data)?;

	Ok(data)
}

// Never moves past the end of the stream
fn skip_up_to<R: Seek + ?Sized>(reader: &mut R, len: u32) -> io::Result<u32> {
	let pos = reader.stream_position()?;
	let end = reader.seek(SeekFrom::End(0))?;

	let skipped = end.saturating_sub(pos).min(u64::from(len));
	reader.seek(SeekFrom::Start(pos + skipped))?;

	Ok(skipped as u32)
}

// Short integers (from truncated records) are decoded from the bytes available
fn decode_uint(data: &[u8], endianness: Endianness) -> u64 {
	let len = data.len().min(8);

	match endianness {
		Endianness::Little => LittleEndian::read_uint(data, len),
		Endianness::Big => BigEndian::read_uint(data, len),
	}
}

pub(crate) fn decode_latin1(data: &[u8]) -> String {
	data.iter()
		.take_while(|b| **b != 0)
		.map(|b| match *b {
			UNUSED_CHAR => ' ',
			b => char::from(b),
		})
		.collect()
}

/// Encode `text` into a NUL padded Latin-1 slot of exactly `width` bytes
///
/// Text that doesn't fit is truncated, characters outside of Latin-1 are written as `?`.
pub fn encode_latin1_fixed(text: &str, width: usize) -> Vec<u8> {
	let mut slot = text
		.chars()
		.map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
		.take(width)
		.collect::<Vec<u8>>();

	slot.resize(width, 0);
	slot
}

/// Read a little endian `u16`, `None` if the data ends early
pub(crate) fn try_read_u16_le<R: Read + ?Sized>(reader: &mut R) -> io::Result<Option<u16>> {
	let data = read_up_to(reader, 2)?;
	Ok((data.len() == 2).then(|| LittleEndian::read_u16(&data)))
}

/// Read a little endian `u32`, `None` if the data ends early
pub(crate) fn try_read_u32_le<R: Read + ?Sized>(reader: &mut R) -> io::Result<Option<u32>> {
	let data = read_up_to(reader, 4)?;
	Ok((data.len() == 4).then(|| LittleEndian::read_u32(&data)))
}
