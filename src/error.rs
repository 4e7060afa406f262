use crate::file::FileType;
use crate::tag::item::ItemKind;

/// Errors that could occur within tagkit.
#[derive(thiserror::Error, Debug)]
pub enum TagError {
	// Format detection
	/// The stream could not be recognized as any supported format
	#[error("No format could be determined from the provided stream")]
	UnknownFormat,
	/// Provided an empty stream
	#[error("Stream contains no data")]
	EmptyFile,

	// Parsing
	/// A required field was short or violated a size invariant
	#[error("{format:?}: corrupt header: {message}")]
	CorruptHeader {
		/// The format being parsed
		format: FileType,
		/// What went wrong
		message: &'static str,
	},

	// Writing
	/// Attempted to save to a read-only stream
	#[error("Attempted to write to a read-only stream")]
	ReadOnlyWrite,
	/// A fixed-length patch would extend past the end of the stream
	#[error("Patch of {len} bytes at offset {offset} exceeds the stream length")]
	PatchOutOfBounds {
		/// Start of the patch
		offset: u64,
		/// Length of the patch
		len: usize,
	},
	/// Attempting to write an abnormally large amount of data
	#[error("An abnormally large amount of data was provided, and an overflow occurred")]
	TooMuchData,

	// Tag related errors
	/// The property is valid text, but the tag cannot store it
	#[error("Property `{0}` is not supported by this tag")]
	UnsupportedProperty(String),
	/// An item was accessed as the wrong kind
	#[error("Expected a {expected:?} item, found {found:?}")]
	TypeMismatch {
		/// The requested kind
		expected: ItemKind,
		/// The kind actually stored
		found: ItemKind,
	},
	/// An item key does not satisfy the format's key rules
	#[error("Invalid item key: {0:?}")]
	InvalidKey(String),

	// Conversions for std Errors
	/// Unable to convert bytes to a String
	#[error(transparent)]
	FromUtf8(#[from] std::string::FromUtf8Error),
	/// Represents all cases of `std::io::Error`.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl TagError {
	pub(crate) fn corrupt(format: FileType, message: &'static str) -> Self {
		Self::CorruptHeader { format, message }
	}
}

/// Result of tag operations.
pub type Result<T> = std::result::Result<T, TagError>;
