use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "tagkit", author, version, about, long_about = None)] // Read from `Cargo.toml`
pub struct Args {
	#[command(subcommand)]
	pub action: Action,
	/// Fail on any damaged record instead of keeping what could be read.
	#[arg(short, long, global = true)]
	pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum Action {
	/// Print the format, common fields and audio properties.
	Show {
		#[arg(value_name = "FILE")]
		file: PathBuf,
	},
	/// Print every property, one `KEY=VALUE` per line.
	Props {
		#[arg(value_name = "FILE")]
		file: PathBuf,
	},
	/// Replace the values of a property and save. No VALUE removes it.
	Set {
		#[arg(value_name = "FILE")]
		file: PathBuf,
		#[arg(value_name = "KEY")]
		key: String,
		#[arg(value_name = "VALUE")]
		values: Vec<String>,
		/// Also overwrite items flagged read-only on disk.
		#[arg(long)]
		overwrite_read_only: bool,
	},
	/// Extract an embedded picture.
	Picture {
		#[arg(value_name = "FILE")]
		file: PathBuf,
		#[arg(value_name = "OUT")]
		out: PathBuf,
		/// Which picture to extract, in tag order.
		#[arg(short, long, default_value_t = 0)]
		index: usize,
	},
}
