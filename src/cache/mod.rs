pub mod downloader;
pub mod locator;

pub use downloader::{DownloadResult, Downloader};
pub use locator::{cache_dir_path, get_cache_dir, CacheEnv, Platform};
