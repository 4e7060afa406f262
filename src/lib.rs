//! Parse and rewrite the metadata embedded in audio containers, without touching the audio.
//!
//! # Supported Formats
//!
//! | File Format     | Extensions | Read | Write | Metadata Format(s)                       |
//! |-----------------|------------|------|-------|------------------------------------------|
//! | Extended Module | `xm`       |**X** |**X**  | Title, tracker name, instrument/sample names |
//! | Monkey's Audio  | `ape`      |**X** |**X**  | `APEv2`, `APEv1` (`ID3v1`/`ID3v2` preserved) |
//!
//! XM files are edited in place: every name has a fixed width and the file length never
//! changes. APE tags live in a region at the end of the file, which is spliced when saving.
//!
//! # Examples
//!
//! ## Reading a file
//!
//! ```rust,no_run
//! # fn main() -> tagkit::error::Result<()> {
//! use tagkit::config::ParseOptions;
//! use tagkit::file::TaggedFile;
//! use tagkit::tag::Accessor;
//!
//! let file = TaggedFile::open_path("tests/files/song.xm", ParseOptions::new())?;
//!
//! println!("Title: {:?}", file.tag().title());
//! println!("Channels: {:?}", file.audio_properties().channels());
//! # Ok(()) }
//! ```
//!
//! ## Editing through a property map
//!
//! ```rust,no_run
//! # fn main() -> tagkit::error::Result<()> {
//! use tagkit::config::ParseOptions;
//! use tagkit::file::TaggedFile;
//!
//! let mut file = TaggedFile::open_path("song.ape", ParseOptions::new())?;
//!
//! let mut properties = file.properties();
//! properties.insert("ARTIST", vec![String::from("Foo"), String::from("Bar")]);
//!
//! // Anything the tag can't hold is handed back
//! let rejected = file.set_properties(&properties);
//! assert!(rejected.is_empty());
//!
//! file.save()?;
//! # Ok(()) }
//! ```
//!
//! ## Working with an in-memory stream
//!
//! Any [`Stream`](stream::Stream) works, such as a [`Cursor`](std::io::Cursor) wrapped in a
//! [`FileStream`](stream::FileStream):
//!
//! ```rust,no_run
//! # fn main() -> tagkit::error::Result<()> {
//! use std::io::Cursor;
//! use tagkit::file::TaggedFile;
//! use tagkit::stream::FileStream;
//!
//! # let bytes = Vec::new();
//! let mut file = TaggedFile::open(FileStream::new(Cursor::new(bytes)))?;
//! file.save()?;
//!
//! let bytes = file.into_inner().into_inner().into_inner();
//! # Ok(()) }
//! ```

#![warn(clippy::pedantic, clippy::all, missing_docs, rust_2018_idioms)]
#![forbid(unsafe_code)]
#![allow(
	clippy::too_many_lines,
	clippy::cast_precision_loss,
	clippy::cast_sign_loss,
	clippy::cast_possible_wrap,
	clippy::cast_possible_truncation,
	clippy::module_name_repetitions,
	clippy::must_use_candidate,
	clippy::doc_markdown,
	clippy::match_wildcard_for_single_variants,
	clippy::semicolon_if_nothing_returned,
	clippy::return_self_not_must_use
)]

pub mod ape;
pub mod config;
pub mod error;
pub mod file;
pub mod picture;
pub mod probe;
pub mod reader;
pub mod stream;
pub mod tag;
pub mod xm;

pub use crate::config::{ParseOptions, ParsingMode, WriteOptions};
pub use crate::error::{Result, TagError};
pub use crate::file::{AudioFile, FileProperties, FileType, TaggedFile};
pub use crate::picture::{MimeType, Picture, PictureType};
pub use crate::probe::{read_from_path, Probe};
pub use crate::tag::{Accessor, PropertyMap, TagExt, TagType};
