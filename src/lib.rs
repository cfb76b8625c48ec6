//! Download-and-cache helper.
//!
//! Resolves a per-application cache directory following platform conventions,
//! downloads files into it once, fetches JSON documents and clears the cache.
//!
//! ```no_run
//! use cachefetch::{CacheEnv, Config, Downloader};
//!
//! # fn main() -> cachefetch::Result<()> {
//! let config = Config::from_env()?;
//! let downloader = Downloader::from_config(&config, &CacheEnv::from_process())?;
//! let result = downloader.download("https://example.com/tool.tar.gz", "tools/tool.tar.gz")?;
//! println!("{} bytes at {:?}", result.size, result.path);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{get_cache_dir, CacheEnv, DownloadResult, Downloader, Platform};
pub use config::Config;
pub use error::{Error, Result};
