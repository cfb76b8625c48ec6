use crate::cache::locator::{self, CacheEnv};
use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Buffer size for streaming response bodies to disk (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResult {
    pub path: PathBuf,
    pub size: u64,
    /// Reserved for callers; downloads never fill it in.
    #[serde(default)]
    pub version: Option<String>,
}

/// Fetches files into a cache directory and JSON documents over HTTP.
///
/// Every call blocks until the request or filesystem operation finishes.
/// Nothing is retried.
#[derive(Debug, Clone)]
pub struct Downloader {
    cache_dir: PathBuf,
    client: Client,
}

impl Downloader {
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_timeout(cache_dir, None)
    }

    /// Requests never time out when `timeout` is `None`.
    pub fn with_timeout(cache_dir: impl Into<PathBuf>, timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            cache_dir: cache_dir.into(),
            client,
        })
    }

    /// Uses the configured cache directory if there is one, the platform
    /// directory from `env` otherwise. Either way the directory is created.
    pub fn from_config(config: &Config, env: &CacheEnv) -> Result<Self> {
        let cache_dir = Self::resolve_cache_dir(config, env)?;
        locator::create_dir_all(&cache_dir)?;

        Self::with_timeout(cache_dir, config.timeout())
    }

    /// The directory [`from_config`](Self::from_config) would use, without
    /// creating it.
    pub fn resolve_cache_dir(config: &Config, env: &CacheEnv) -> Result<PathBuf> {
        match &config.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => locator::cache_dir_path(env, &config.app_name),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Downloads `url` to `filename` under the cache directory.
    ///
    /// An existing file at the destination is returned as-is, without a
    /// request and without checking that it is complete.
    pub fn download(&self, url: &str, filename: impl AsRef<Path>) -> Result<DownloadResult> {
        let dest = self.destination(filename.as_ref())?;

        if let Ok(metadata) = fs::metadata(&dest) {
            if metadata.is_file() {
                tracing::debug!("Cache hit: {:?}", dest);
                return Ok(DownloadResult {
                    path: dest,
                    size: metadata.len(),
                    version: None,
                });
            }
        }

        tracing::debug!("Cache miss: fetching {} into {:?}", url, dest);
        let mut response = self.get(url)?;

        if let Some(parent) = dest.parent() {
            locator::create_dir_all(parent)?;
        }

        let file = File::create(&dest).map_err(|e| Error::filesystem("create file", &dest, e))?;

        let size = match stream_to_file(&mut response, file) {
            Ok(size) => size,
            Err(err) => {
                // A partial file would be served as a cache hit later.
                let _ = fs::remove_file(&dest);
                return Err(match err {
                    StreamError::Read(e) => Error::network(url, e),
                    StreamError::Write(e) => Error::filesystem("write file", &dest, e),
                });
            }
        };

        tracing::info!("Downloaded {} ({} bytes) to {:?}", url, size, dest);

        Ok(DownloadResult {
            path: dest,
            size,
            version: None,
        })
    }

    /// Fetches `url` and decodes the first JSON value in the body. Anything
    /// after that value is ignored. Never cached.
    pub fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.get(url)?;

        let mut de = serde_json::Deserializer::from_reader(BufReader::new(response));
        T::deserialize(&mut de).map_err(|e| {
            if e.is_io() {
                Error::network(url, e)
            } else {
                Error::ParseError {
                    url: url.to_string(),
                    source: e,
                }
            }
        })
    }

    /// Like [`fetch_json`](Self::fetch_json), but writes into `target`.
    /// `target` is left untouched when anything fails.
    pub fn fetch_json_into<T: DeserializeOwned>(&self, url: &str, target: &mut T) -> Result<()> {
        *target = self.fetch_json(url)?;
        Ok(())
    }

    /// Deletes the cache directory and everything in it. A missing directory
    /// is not an error.
    pub fn clear_cache(&self) -> Result<()> {
        match fs::remove_dir_all(&self.cache_dir) {
            Ok(()) => {
                tracing::debug!("Removed cache directory {:?}", self.cache_dir);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::filesystem("remove", &self.cache_dir, e)),
        }
    }

    fn get(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::network(url, e))?;

        if response.status() != StatusCode::OK {
            return Err(Error::HttpStatusError {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }

    fn destination(&self, filename: &Path) -> Result<PathBuf> {
        let mut has_name = false;
        for component in filename.components() {
            match component {
                Component::Normal(_) => has_name = true,
                Component::CurDir => {}
                _ => {
                    return Err(Error::InvalidPath(format!(
                        "{:?} must be a relative path inside the cache directory",
                        filename
                    )))
                }
            }
        }

        if !has_name {
            return Err(Error::InvalidPath("filename is empty".to_string()));
        }

        Ok(self.cache_dir.join(filename))
    }
}

enum StreamError {
    Read(io::Error),
    Write(io::Error),
}

fn stream_to_file(body: &mut impl Read, file: File) -> std::result::Result<u64, StreamError> {
    let mut writer = BufWriter::new(file);
    let mut buffer = vec![0u8; BUFFER_SIZE];
    let mut written = 0u64;

    loop {
        let n = match body.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(StreamError::Read(e)),
        };
        writer.write_all(&buffer[..n]).map_err(StreamError::Write)?;
        written += n as u64;
    }

    writer.flush().map_err(StreamError::Write)?;
    Ok(written)
}
