//! Seekable byte streams that tags are read from and written to
//!
//! Every format reads through [`Read`] + [`Seek`], and writes through [`Stream`], which
//! adds the two write paths a tag editor needs:
//!
//! * [`Stream::patch`] overwrites a fixed-length slot. The stream length never changes.
//! * [`Stream::insert`] splices a region, shifting everything after it. Used when a tag
//!   has to grow or shrink.

use crate::error::{Result, TagError};

use std::fs::{File, OpenOptions};
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Sources that can be resized
pub trait Truncate {
	/// Truncate (or extend) the source to `new_len` bytes
	///
	/// # Errors
	///
	/// Depends on the source, see [`File::set_len`]
	fn truncate(&mut self, new_len: u64) -> io::Result<()>;
}

impl Truncate for File {
	fn truncate(&mut self, new_len: u64) -> io::Result<()> {
		self.set_len(new_len)
	}
}

impl Truncate for Cursor<Vec<u8>> {
	fn truncate(&mut self, new_len: u64) -> io::Result<()> {
		self.get_mut().resize(new_len as usize, 0);
		Ok(())
	}
}

impl<T: Truncate + ?Sized> Truncate for &mut T {
	fn truncate(&mut self, new_len: u64) -> io::Result<()> {
		(**self).truncate(new_len)
	}
}

/// A seekable byte stream that can be edited in place
///
/// Implementors only need to provide [`Stream::is_read_only`] and
/// [`Stream::truncate`], the remaining operations are built on [`Read`], [`Write`]
/// and [`Seek`].
pub trait Stream: Read + Write + Seek {
	/// Whether writes to this stream are refused
	fn is_read_only(&self) -> bool;

	/// Resize the stream to `len` bytes
	///
	/// # Errors
	///
	/// * The stream is read-only
	/// * The underlying source failed to resize
	fn truncate(&mut self, len: u64) -> Result<()>;

	/// Read at most `len` bytes, fewer if the end of the stream is reached
	///
	/// # Errors
	///
	/// Any I/O error other than reaching the end of the stream
	fn read_block(&mut self, len: usize) -> Result<Vec<u8>> {
		let mut block = Vec::with_capacity(len.min(0x10000));
		<&mut Self as Read>::take(self, len as u64).read_to_end(&mut block)?;
		Ok(block)
	}

	/// The current position in the stream
	///
	/// # Errors
	///
	/// See [`Seek::stream_position`]
	fn tell(&mut self) -> Result<u64> {
		Ok(self.stream_position()?)
	}

	/// The total length of the stream, the position is left untouched
	///
	/// # Errors
	///
	/// See [`Seek::seek`]
	fn length(&mut self) -> Result<u64> {
		let pos = self.stream_position()?;
		let end = self.seek(SeekFrom::End(0))?;
		self.seek(SeekFrom::Start(pos))?;

		Ok(end)
	}

	/// Overwrite `data.len()` bytes at `offset`
	///
	/// # Errors
	///
	/// * The stream is read-only
	/// * `offset + data.len()` is past the end of the stream
	fn patch(&mut self, offset: u64, data: &[u8]) -> Result<()> {
		if self.is_read_only() {
			return Err(TagError::ReadOnlyWrite);
		}

		if offset + data.len() as u64 > self.length()? {
			return Err(TagError::PatchOutOfBounds {
				offset,
				len: data.len(),
			});
		}

		self.seek(SeekFrom::Start(offset))?;
		self.write_all(data)?;
		self.flush()?;

		Ok(())
	}

	/// Replace `replace` bytes at `at` with `data`, shifting everything after the region
	///
	/// # Errors
	///
	/// * The stream is read-only
	/// * The replaced region is past the end of the stream
	fn insert(&mut self, data: &[u8], at: u64, replace: u64) -> Result<()> {
		if self.is_read_only() {
			return Err(TagError::ReadOnlyWrite);
		}

		let len = self.length()?;
		if at + replace > len {
			return Err(TagError::PatchOutOfBounds {
				offset: at,
				len: replace as usize,
			});
		}

		if data.len() as u64 == replace {
			return self.patch(at, data);
		}

		self.seek(SeekFrom::Start(at + replace))?;
		let mut tail = Vec::new();
		self.read_to_end(&mut tail)?;

		self.seek(SeekFrom::Start(at))?;
		self.write_all(data)?;
		self.write_all(&tail)?;

		let new_len = at + data.len() as u64 + tail.len() as u64;
		if new_len < len {
			self.truncate(new_len)?;
		}

		self.flush()?;
		Ok(())
	}

	/// Remove `len` bytes at `at`, shifting everything after the region
	///
	/// # Errors
	///
	/// See [`Stream::insert`]
	fn remove_block(&mut self, at: u64, len: u64) -> Result<()> {
		self.insert(&[], at, len)
	}
}

impl<T: Stream + ?Sized> Stream for &mut T {
	fn is_read_only(&self) -> bool {
		(**self).is_read_only()
	}

	fn truncate(&mut self, len: u64) -> Result<()> {
		(**self).truncate(len)
	}
}

impl<T: Stream + ?Sized> Stream for Box<T> {
	fn is_read_only(&self) -> bool {
		(**self).is_read_only()
	}

	fn truncate(&mut self, len: u64) -> Result<()> {
		(**self).truncate(len)
	}
}

/// A [`Stream`] over any resizable source
///
/// ```rust
/// use std::io::Cursor;
/// use tagkit::stream::{FileStream, Stream};
///
/// let mut stream = FileStream::new(Cursor::new(b"Hello world".to_vec()));
/// stream.insert(b"big ", 6, 0).unwrap();
///
/// assert_eq!(stream.into_inner().into_inner(), b"Hello big world");
/// ```
#[derive(Debug)]
pub struct FileStream<F> {
	inner: F,
	read_only: bool,
}

impl<F> FileStream<F> {
	/// Wrap a writable source
	pub fn new(inner: F) -> Self {
		Self {
			inner,
			read_only: false,
		}
	}

	/// Wrap a source, refusing all writes
	pub fn read_only(inner: F) -> Self {
		Self {
			inner,
			read_only: true,
		}
	}

	/// Get a reference to the underlying source
	pub fn get_ref(&self) -> &F {
		&self.inner
	}

	/// Extract the underlying source
	pub fn into_inner(self) -> F {
		self.inner
	}
}

impl FileStream<File> {
	/// Open a path for reading and writing
	///
	/// If the file can't be opened for writing, it will be opened read-only.
	///
	/// # Errors
	///
	/// The file can't be opened at all
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();

		match OpenOptions::new().read(true).write(true).open(path) {
			Ok(file) => Ok(Self::new(file)),
			Err(e) => {
				log::warn!(
					"Could not open {} for writing ({e}), falling back to read-only",
					path.display()
				);
				Ok(Self::read_only(File::open(path)?))
			},
		}
	}
}

impl<F: Read> Read for FileStream<F> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		self.inner.read(buf)
	}
}

impl<F: Write> Write for FileStream<F> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		if self.read_only {
			return Err(io::Error::new(
				io::ErrorKind::PermissionDenied,
				"stream is read-only",
			));
		}

		self.inner.write(buf)
	}

	fn flush(&mut self) -> io::Result<()> {
		self.inner.flush()
	}
}

impl<F: Seek> Seek for FileStream<F> {
	fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
		self.inner.seek(pos)
	}
}

impl<F: Read + Write + Seek + Truncate> Stream for FileStream<F> {
	fn is_read_only(&self) -> bool {
		self.read_only
	}

	fn truncate(&mut self, len: u64) -> Result<()> {
		if self.read_only {
			return Err(TagError::ReadOnlyWrite);
		}

		Truncate::truncate(&mut self.inner, len)?;
		Ok(())
	}
}

/// Run `f`, then seek back to where the stream was, on success and failure alike
pub(crate) fn restoring_position<S, T, F>(stream: &mut S, f: F) -> Result<T>
where
	S: Seek + ?Sized,
	F: FnOnce(&mut S) -> Result<T>,
{
	let start = stream.stream_position()?;
	let ret = f(stream);
	let restored = stream.seek(SeekFrom::Start(start));

	match (ret, restored) {
		(Err(e), _) => Err(e),
		(Ok(_), Err(e)) => Err(e.into()),
		(Ok(ret), Ok(_)) => Ok(ret),
	}
}
