//! Format agnostic file handling

use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Result, TagError};
use crate::probe::Probe;
use crate::stream::{restoring_position, FileStream, Stream};
use crate::tag::{ComplexProperty, PropertyMap, TagExt};

use std::ffi::OsStr;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::time::Duration;

/// Provides various methods for interaction with a file
///
/// Apart from [`AudioFile::read_from`], this trait is object safe. [`Probe::read`] hands
/// out files as `Box<dyn AudioFile>`.
pub trait AudioFile {
	/// Read a file from a reader
	///
	/// # Errors
	///
	/// Errors depend on the file being read. See [`TagError`]
	fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read + Seek,
		Self: Sized;

	/// Returns the [`FileType`]
	fn file_type(&self) -> FileType;

	/// Returns the file's tag
	fn tag(&self) -> &dyn TagExt;

	/// Returns a mutable reference to the file's tag
	fn tag_mut(&mut self) -> &mut dyn TagExt;

	/// Returns the format agnostic audio properties
	fn file_properties(&self) -> FileProperties;

	/// Write the tag to `stream`, which must hold the same file it was read from
	///
	/// # Errors
	///
	/// * `stream` is read-only
	/// * The layout of `stream` doesn't match the file
	/// * See [`Stream::patch`] and [`Stream::insert`]
	fn save_to(&self, stream: &mut dyn Stream, write_options: WriteOptions) -> Result<()>;
}

/// Various *immutable* audio properties
///
/// Anything a format doesn't store is `None` (or zero, for the duration).
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct FileProperties {
	pub(crate) duration: Duration,
	pub(crate) overall_bitrate: Option<u32>,
	pub(crate) audio_bitrate: Option<u32>,
	pub(crate) sample_rate: Option<u32>,
	pub(crate) channels: Option<u8>,
}

impl FileProperties {
	/// Creates a new [`FileProperties`]
	pub const fn new(
		duration: Duration,
		overall_bitrate: Option<u32>,
		audio_bitrate: Option<u32>,
		sample_rate: Option<u32>,
		channels: Option<u8>,
	) -> Self {
		Self {
			duration,
			overall_bitrate,
			audio_bitrate,
			sample_rate,
			channels,
		}
	}

	/// Duration
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Overall bitrate (kbps)
	pub fn overall_bitrate(&self) -> Option<u32> {
		self.overall_bitrate
	}

	/// Audio bitrate (kbps)
	pub fn audio_bitrate(&self) -> Option<u32> {
		self.audio_bitrate
	}

	/// Sample rate (Hz)
	pub fn sample_rate(&self) -> Option<u32> {
		self.sample_rate
	}

	/// Channel count
	pub fn channels(&self) -> Option<u8> {
		self.channels
	}
}

/// The type of file read
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum FileType {
	/// Monkey's Audio
	Ape,
	/// Extended Module
	Xm,
}

impl FileType {
	/// Attempts to extract a [`FileType`] from an extension
	pub fn from_ext<E>(ext: E) -> Option<Self>
	where
		E: AsRef<OsStr>,
	{
		let ext = ext.as_ref().to_str()?.to_ascii_lowercase();

		match ext.as_str() {
			"ape" => Some(Self::Ape),
			"xm" => Some(Self::Xm),
			_ => None,
		}
	}

	/// Attempts to extract a [`FileType`] from a path
	///
	/// # Errors
	///
	/// This will return [`TagError::UnknownFormat`] if the extension didn't map to a `FileType`
	pub fn from_path<P>(path: P) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		path.as_ref()
			.extension()
			.and_then(Self::from_ext)
			.ok_or(TagError::UnknownFormat)
	}

	/// Attempts to extract a [`FileType`] from a buffer
	///
	/// NOTE: Stripped XM files have no magic and can only be detected by extension.
	/// Files starting with an ID3v2 tag need [`Probe::guess_file_type`].
	pub fn from_buffer(buf: &[u8]) -> Option<Self> {
		match Self::from_buffer_inner(buf) {
			Ok((Some(f_ty), _)) => Some(f_ty),
			_ => None,
		}
	}

	// Returns the length of a leading ID3v2 tag, when the type can't be determined without skipping it
	pub(crate) fn from_buffer_inner(buf: &[u8]) -> Result<(Option<Self>, u64)> {
		if buf.is_empty() {
			return Err(TagError::EmptyFile);
		}

		if buf.starts_with(crate::xm::MAGIC) {
			return Ok((Some(Self::Xm), 0));
		}

		if buf.starts_with(b"MAC ") {
			return Ok((Some(Self::Ape), 0));
		}

		match crate::ape::id3v2_len(buf) {
			Some(id3v2_len) => Ok((None, id3v2_len)),
			None => Err(TagError::UnknownFormat),
		}
	}
}

/// A file opened over a [`Stream`], ready to be edited and saved
///
/// The stream is either owned (`TaggedFile<FileStream<File>>`), or borrowed
/// (`TaggedFile<&mut FileStream<File>>`), in which case it is left open once the
/// `TaggedFile` is dropped.
///
/// Every read and save restores the stream position, also when they fail.
///
/// ```rust,no_run
/// # fn main() -> tagkit::error::Result<()> {
/// use tagkit::config::ParseOptions;
/// use tagkit::file::TaggedFile;
/// use tagkit::tag::Accessor;
///
/// let mut file = TaggedFile::open_path("song.xm", ParseOptions::new())?;
///
/// file.tag_mut().set_title(String::from("New title"));
/// file.save()?;
/// # Ok(()) }
/// ```
pub struct TaggedFile<S: Stream> {
	stream: S,
	file: Box<dyn AudioFile>,
}

impl<S: Stream> TaggedFile<S> {
	/// Open a file, guessing its type from the content
	///
	/// # Errors
	///
	/// See [`TaggedFile::open_with`]
	pub fn open(stream: S) -> Result<Self> {
		Self::open_with(stream, None, ParseOptions::new())
	}

	/// Open a file of a known type, or guess it from the content with `None`
	///
	/// # Errors
	///
	/// * The type can't be determined
	/// * The file is corrupt, see [`ParseOptions::parsing_mode`]
	pub fn open_with(
		mut stream: S,
		file_type: Option<FileType>,
		parse_options: ParseOptions,
	) -> Result<Self> {
		if stream.length()? == 0 {
			return Err(TagError::EmptyFile);
		}

		let file = restoring_position(&mut stream, |stream| {
			stream.seek(SeekFrom::Start(0))?;

			let probe = match file_type {
				Some(file_type) => Probe::with_file_type(stream, file_type),
				None => Probe::new(stream).guess_file_type()?,
			};

			probe.read(parse_options)
		})?;

		Ok(Self { stream, file })
	}

	/// Returns the [`FileType`]
	pub fn file_type(&self) -> FileType {
		self.file.file_type()
	}

	/// Returns the format specific file
	pub fn file(&self) -> &dyn AudioFile {
		&*self.file
	}

	/// Returns the file's tag
	pub fn tag(&self) -> &dyn TagExt {
		self.file.tag()
	}

	/// Returns a mutable reference to the file's tag
	pub fn tag_mut(&mut self) -> &mut dyn TagExt {
		self.file.tag_mut()
	}

	/// Returns the file's audio properties
	pub fn audio_properties(&self) -> FileProperties {
		self.file.file_properties()
	}

	/// See [`TagExt::properties`]
	pub fn properties(&self) -> PropertyMap {
		self.tag().properties()
	}

	/// See [`TagExt::set_properties`]
	pub fn set_properties(&mut self, properties: &PropertyMap) -> PropertyMap {
		self.tag_mut().set_properties(properties)
	}

	/// See [`TagExt::remove_unsupported_properties`]
	pub fn remove_unsupported_properties(&mut self, keys: &[String]) {
		self.tag_mut().remove_unsupported_properties(keys)
	}

	/// See [`TagExt::complex_property_keys`]
	pub fn complex_property_keys(&self) -> Vec<String> {
		self.tag().complex_property_keys()
	}

	/// See [`TagExt::complex_properties`]
	pub fn complex_properties(&self, key: &str) -> Vec<ComplexProperty> {
		self.tag().complex_properties(key)
	}

	/// See [`TagExt::set_complex_properties`]
	pub fn set_complex_properties(&mut self, key: &str, values: Vec<ComplexProperty>) -> bool {
		self.tag_mut().set_complex_properties(key, values)
	}

	/// Write the tag back to the stream with the default [`WriteOptions`]
	///
	/// # Errors
	///
	/// See [`TaggedFile::save_with`]
	pub fn save(&mut self) -> Result<()> {
		self.save_with(WriteOptions::default())
	}

	/// Write the tag back to the stream
	///
	/// # Errors
	///
	/// * [`TagError::ReadOnlyWrite`], the stream is left untouched
	/// * See [`AudioFile::save_to`]
	pub fn save_with(&mut self, write_options: WriteOptions) -> Result<()> {
		if self.stream.is_read_only() {
			return Err(TagError::ReadOnlyWrite);
		}

		let file = &self.file;
		restoring_position(&mut self.stream, |stream| file.save_to(stream, write_options))
	}

	/// Get a reference to the underlying stream
	pub fn get_ref(&self) -> &S {
		&self.stream
	}

	/// Close the file, returning the underlying stream
	pub fn into_inner(self) -> S {
		self.stream
	}
}

impl TaggedFile<FileStream<File>> {
	/// Open a path, read-only if it can't be opened for writing
	///
	/// The type is taken from the extension, falling back to the content.
	///
	/// # Errors
	///
	/// * `path` does not exist
	/// * See [`TaggedFile::open_with`]
	pub fn open_path<P>(path: P, parse_options: ParseOptions) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();
		let file_type = FileType::from_path(path).ok();

		Self::open_with(FileStream::open(path)?, file_type, parse_options)
	}
}
