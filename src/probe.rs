use crate::ape::ApeFile;
use crate::config::ParseOptions;
use crate::error::{Result, TagError};
use crate::file::{AudioFile, FileType};
use crate::xm::XmFile;

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// A format agnostic reader
///
/// This provides a way to determine the [`FileType`] of a reader, for when a concrete
/// type is not known.
///
/// ## Usage
///
/// When reading from a path, the [`FileType`] will be inferred from the path, rather than the
/// open file.
///
/// ```rust,no_run
/// # fn main() -> tagkit::error::Result<()> {
/// use tagkit::file::FileType;
/// use tagkit::probe::Probe;
///
/// let probe = Probe::open("song.xm")?;
///
/// // Inferred from the `xm` extension
/// assert_eq!(probe.file_type(), Some(FileType::Xm));
/// # Ok(()) }
/// ```
///
/// When a path isn't available, or is unreliable, content-based detection is also possible.
///
/// ```rust
/// # fn main() -> tagkit::error::Result<()> {
/// use std::io::Cursor;
/// use tagkit::file::FileType;
/// use tagkit::probe::Probe;
///
/// static MAC_HEADER: &[u8; 4] = b"MAC ";
///
/// let probe = Probe::new(Cursor::new(MAC_HEADER)).guess_file_type()?;
///
/// // Inferred from the MAC header
/// assert_eq!(probe.file_type(), Some(FileType::Ape));
/// # Ok(()) }
/// ```
pub struct Probe<R: Read> {
	inner: R,
	f_ty: Option<FileType>,
}

impl<R: Read> Probe<R> {
	/// Create a new `Probe`
	pub fn new(reader: R) -> Self {
		Self {
			inner: reader,
			f_ty: None,
		}
	}

	/// Create a new `Probe` with a specified [`FileType`]
	pub fn with_file_type(reader: R, file_type: FileType) -> Self {
		Self {
			inner: reader,
			f_ty: Some(file_type),
		}
	}

	/// Returns the current [`FileType`]
	pub fn file_type(&self) -> Option<FileType> {
		self.f_ty
	}

	/// Set the [`FileType`] with which to read the file
	pub fn set_file_type(&mut self, file_type: FileType) {
		self.f_ty = Some(file_type)
	}

	/// Extract the reader
	pub fn into_inner(self) -> R {
		self.inner
	}
}

impl Probe<BufReader<File>> {
	/// Opens a file for reading
	///
	/// This will initially guess the [`FileType`] from the path, but
	/// this can be overwritten with [`Probe::guess_file_type`] or [`Probe::set_file_type`]
	///
	/// # Errors
	///
	/// * `path` does not exist
	pub fn open<P>(path: P) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let path = path.as_ref();

		Ok(Self {
			inner: BufReader::new(File::open(path)?),
			f_ty: FileType::from_path(path).ok(),
		})
	}
}

impl<R: Read + Seek> Probe<R> {
	/// Attempts to get the [`FileType`] based on the data in the reader
	///
	/// On success, the file type will be replaced. If the content is not recognized, the
	/// current file type is kept. Stripped XM files can't be recognized by content.
	///
	/// # Errors
	///
	/// * The reader is empty
	/// * Any [`std::io::Error`]. If this happens, there is likely an issue with the provided
	///   reader, and the entire `Probe` should be discarded.
	pub fn guess_file_type(mut self) -> Result<Self> {
		let f_ty = self.guess_inner()?;
		self.f_ty = f_ty.or(self.f_ty);

		Ok(self)
	}

	fn guess_inner(&mut self) -> Result<Option<FileType>> {
		let mut buf = Vec::with_capacity(36);

		let pos = self.inner.stream_position()?;
		self.inner.by_ref().take(36).read_to_end(&mut buf)?;
		self.inner.seek(SeekFrom::Start(pos))?;

		match FileType::from_buffer_inner(&buf) {
			Ok((Some(f_ty), _)) => Ok(Some(f_ty)),
			Ok((None, id3v2_len)) => {
				self.inner.seek(SeekFrom::Start(pos + id3v2_len))?;

				let mut ident = Vec::with_capacity(4);
				self.inner.by_ref().take(4).read_to_end(&mut ident)?;
				self.inner.seek(SeekFrom::Start(pos))?;

				match ident.as_slice() {
					b"MAC " => Ok(Some(FileType::Ape)),
					_ => Ok(None),
				}
			},
			Err(TagError::EmptyFile) => Err(TagError::EmptyFile),
			Err(_) => Ok(None),
		}
	}

	/// Attempts to read the file from the reader
	///
	/// If [`ParseOptions::read_properties`] is false, the properties will be zeroed out.
	///
	/// # Errors
	///
	/// * No file type
	///     - This expects the file type to have been set already, either with
	///       [`Probe::guess_file_type`] or [`Probe::set_file_type`]. When reading from
	///       paths, this is not necessary.
	/// * The reader contains invalid data
	pub fn read(mut self, parse_options: ParseOptions) -> Result<Box<dyn AudioFile>> {
		let reader = &mut self.inner;

		match self.f_ty {
			Some(FileType::Ape) => Ok(Box::new(ApeFile::read_from(reader, parse_options)?)),
			Some(FileType::Xm) => Ok(Box::new(XmFile::read_from(reader, parse_options)?)),
			None => Err(TagError::UnknownFormat),
		}
	}
}

/// Read a file from a path
///
/// The [`FileType`] is taken from the extension, falling back to the content.
///
/// # Errors
///
/// See:
///
/// * [`Probe::open`]
/// * [`Probe::guess_file_type`]
/// * [`Probe::read`]
pub fn read_from_path<P>(path: P, parse_options: ParseOptions) -> Result<Box<dyn AudioFile>>
where
	P: AsRef<Path>,
{
	let probe = Probe::open(path)?;

	let probe = match probe.file_type() {
		Some(_) => probe,
		None => probe.guess_file_type()?,
	};

	probe.read(parse_options)
}

#[cfg(test)]
mod tests {
	use super::Probe;
	use crate::error::TagError;
	use crate::file::FileType;

	use std::io::{Cursor, Seek};

	fn guess(data: &[u8]) -> Option<FileType> {
		Probe::new(Cursor::new(data)).guess_file_type().unwrap().file_type()
	}

	#[test]
	fn content_detection() {
		assert_eq!(guess(b"Extended Module: Song"), Some(FileType::Xm));
		assert_eq!(guess(b"MAC \x96\x0f"), Some(FileType::Ape));
		assert_eq!(guess(b"ID3\x04\x00\x00\x00\x00\x00\x02\0\0MAC "), Some(FileType::Ape));
		assert_eq!(guess(b"ID3\x04\x00\x00\x00\x00\x00\x02\0\0fLaC"), None);
		assert_eq!(guess(&[0; 64]), None);
	}

	#[test]
	fn guess_keeps_position_and_hint() {
		let cursor = Cursor::new(&[0_u8; 64][..]);

		let probe = Probe::with_file_type(cursor, FileType::Xm).guess_file_type().unwrap();
		assert_eq!(probe.file_type(), Some(FileType::Xm));
		assert_eq!(probe.into_inner().stream_position().unwrap(), 0);
	}

	#[test]
	fn empty_reader() {
		assert!(matches!(
			Probe::new(Cursor::new(&[0_u8; 0][..])).guess_file_type(),
			Err(TagError::EmptyFile)
		));
	}
}
