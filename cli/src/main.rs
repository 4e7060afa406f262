#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::correctness)]
#![warn(rust_2018_idioms)]
mod cli;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use log::info;
use std::fs;
use std::path::Path;
use tagkit::picture::PICTURE_KEY;
use tagkit::stream::FileStream;
use tagkit::tag::ComplexValue;
use tagkit::{Accessor, ParseOptions, ParsingMode, TaggedFile, WriteOptions};

use cli::{Action, Args};

fn main() -> Result<()> {
	lovely_env_logger::init_default();

	let args = Args::parse();

	let parse_options = if args.strict {
		ParseOptions::new().parsing_mode(ParsingMode::Strict)
	} else {
		ParseOptions::new()
	};

	match args.action {
		Action::Show { file } => show(&file, parse_options),
		Action::Props { file } => props(&file, parse_options),
		Action::Set {
			file,
			key,
			values,
			overwrite_read_only,
		} => set(
			&file,
			parse_options,
			&key,
			values,
			WriteOptions::new().preserve_read_only(!overwrite_read_only),
		),
		Action::Picture { file, out, index } => picture(&file, parse_options, &out, index),
	}
}

fn open(path: &Path, parse_options: ParseOptions) -> Result<TaggedFile<FileStream<fs::File>>> {
	TaggedFile::open_path(path, parse_options)
		.with_context(|| format!("Failed to read {}", path.display()))
}

fn show(path: &Path, parse_options: ParseOptions) -> Result<()> {
	let file = open(path, parse_options)?;
	let tag = file.tag();

	println!("File type:  {:?}", file.file_type());

	let fields = [
		("Title:", tag.title()),
		("Artist:", tag.artist()),
		("Album:", tag.album()),
		("Genre:", tag.genre()),
	];
	for (name, value) in fields {
		if let Some(value) = value {
			println!("{name:<11} {value}");
		}
	}

	if let Some(year) = tag.year() {
		println!("Year:       {year}");
	}
	if let Some(track) = tag.track() {
		println!("Track:      {track}");
	}
	if let Some(comment) = tag.comment() {
		println!("Comment:");
		for line in comment.lines() {
			println!("  {line}");
		}
	}

	let properties = file.audio_properties();
	println!("Duration:   {:?}", properties.duration());
	if let Some(channels) = properties.channels() {
		println!("Channels:   {channels}");
	}
	if let Some(sample_rate) = properties.sample_rate() {
		println!("Sample rate: {sample_rate} Hz");
	}
	if let Some(bitrate) = properties.audio_bitrate() {
		println!("Bitrate:    {bitrate} kbps");
	}

	Ok(())
}

fn props(path: &Path, parse_options: ParseOptions) -> Result<()> {
	let file = open(path, parse_options)?;
	let properties = file.properties();

	for (key, values) in &properties {
		for value in values {
			println!("{key}={value}");
		}
	}

	for key in properties.unsupported() {
		println!("# unsupported: {key}");
	}

	for key in file.complex_property_keys() {
		println!("# complex: {key} ({} values)", file.complex_properties(&key).len());
	}

	Ok(())
}

fn set(
	path: &Path,
	parse_options: ParseOptions,
	key: &str,
	values: Vec<String>,
	write_options: WriteOptions,
) -> Result<()> {
	let mut file = open(path, parse_options)?;

	let mut properties = file.properties();
	if values.is_empty() {
		properties.remove(key);
	} else {
		properties.insert(key, values);
	}

	let rejected = file.set_properties(&properties);
	if !rejected.is_empty() {
		let keys = rejected.keys().collect::<Vec<_>>().join(", ");
		bail!("{:?} can't store: {keys}", file.file_type());
	}

	file.save_with(write_options)
		.with_context(|| format!("Failed to save {}", path.display()))?;

	info!("Saved {}", path.display());
	Ok(())
}

fn picture(path: &Path, parse_options: ParseOptions, out: &Path, index: usize) -> Result<()> {
	let file = open(path, parse_options)?;

	let pictures = file.complex_properties(PICTURE_KEY);
	let picture = pictures
		.get(index)
		.ok_or_else(|| anyhow!("{} has {} pictures", path.display(), pictures.len()))?;

	let data = picture
		.get("data")
		.and_then(ComplexValue::as_bytes)
		.ok_or_else(|| anyhow!("Picture {index} holds no data"))?;

	fs::write(out, data).with_context(|| format!("Failed to write {}", out.display()))?;

	info!("Wrote {} bytes to {}", data.len(), out.display());
	Ok(())
}
