//! Options for reading and writing files

/// How strictly a parser treats damaged trailing records
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum ParsingMode {
	/// Any violated invariant aborts the read with an error
	Strict,
	/// Leading invariants (magic, mandatory header sizes) abort the read,
	/// damaged trailing records are logged and the data parsed so far is kept
	#[default]
	BestAttempt,
}

/// Options to control how files are read
///
/// ```rust
/// use tagkit::config::{ParseOptions, ParsingMode};
///
/// let options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
/// assert!(options.read_properties);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ParseOptions {
	/// Whether or not to read the audio properties
	pub read_properties: bool,
	/// See [`ParsingMode`]
	pub parsing_mode: ParsingMode,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Default `ParseOptions`: read properties, [`ParsingMode::BestAttempt`]
	pub const fn new() -> Self {
		Self {
			read_properties: true,
			parsing_mode: ParsingMode::BestAttempt,
		}
	}

	/// Whether or not to read the audio properties
	pub const fn read_properties(mut self, read_properties: bool) -> Self {
		self.read_properties = read_properties;
		self
	}

	/// The parsing mode to use
	pub const fn parsing_mode(mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		self
	}
}

/// Options to control how tags are written
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct WriteOptions {
	/// Keep items flagged read-only in the existing on-disk tag, even if they
	/// were removed or changed in memory
	///
	/// Only relevant to formats with per-item flags (APE).
	pub preserve_read_only: bool,
}

impl Default for WriteOptions {
	fn default() -> Self {
		Self::new()
	}
}

impl WriteOptions {
	/// Default `WriteOptions`
	pub const fn new() -> Self {
		Self {
			preserve_read_only: true,
		}
	}

	/// Whether or not to keep read-only items already present on disk
	pub const fn preserve_read_only(mut self, preserve_read_only: bool) -> Self {
		self.preserve_read_only = preserve_read_only;
		self
	}
}
