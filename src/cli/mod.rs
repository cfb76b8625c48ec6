use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cachefetch")]
#[command(version, about = "Download files into a per-user cache directory", long_about = None)]
pub struct Cli {
	/// Path to a TOML config file (defaults to the platform config directory)
	#[arg(long, global = true)]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Print the cache directory, creating it if needed
	Dir,

	/// Download a URL into the cache unless it is already there
	Fetch {
		/// URL to download
		url: String,

		/// Destination relative to the cache directory (e.g., "node/node-v20.tar.gz")
		filename: PathBuf,
	},

	/// Fetch a JSON document and print it
	Json {
		/// URL of the JSON document
		url: String,
	},

	/// Delete the cache directory and everything in it
	Clear {
		/// Confirm the deletion
		#[arg(long)]
		yes: bool,
	},
}
