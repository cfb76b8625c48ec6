use crate::error::{Error, Result};
use directories::BaseDirs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Unix,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::MacOs
        } else {
            Platform::Unix
        }
    }
}

/// The parts of the OS environment that decide where the cache lives.
#[derive(Debug, Clone)]
pub struct CacheEnv {
    pub platform: Platform,
    pub home_dir: Option<PathBuf>,
    pub local_app_data: Option<OsString>,
    pub xdg_cache_home: Option<OsString>,
}

impl CacheEnv {
    pub fn from_process() -> Self {
        Self {
            platform: Platform::current(),
            home_dir: BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
            local_app_data: std::env::var_os("LOCALAPPDATA"),
            xdg_cache_home: std::env::var_os("XDG_CACHE_HOME"),
        }
    }
}

fn non_empty(value: &Option<OsString>) -> Option<&OsString> {
    value.as_ref().filter(|v| !v.is_empty())
}

/// Computes the cache directory for `app_name` without touching the filesystem.
pub fn cache_dir_path(env: &CacheEnv, app_name: &str) -> Result<PathBuf> {
    let home = env
        .home_dir
        .as_deref()
        .filter(|h| !h.as_os_str().is_empty())
        .ok_or_else(|| Error::EnvironmentError("Could not determine home directory".to_string()))?;

    let dir = match env.platform {
        Platform::Windows => {
            let root = match non_empty(&env.local_app_data) {
                Some(local) => PathBuf::from(local),
                None => home.join("AppData").join("Local"),
            };
            root.join(app_name).join("cache")
        }
        Platform::MacOs => home.join("Library").join("Caches").join(app_name),
        Platform::Unix => {
            let root = match non_empty(&env.xdg_cache_home) {
                Some(xdg) => PathBuf::from(xdg),
                None => home.join(".cache"),
            };
            root.join(app_name)
        }
    };

    Ok(dir)
}

/// Resolves the platform cache directory and makes sure it exists.
pub fn get_cache_dir(env: &CacheEnv, app_name: &str) -> Result<PathBuf> {
    let dir = cache_dir_path(env, app_name)?;
    create_dir_all(&dir)?;
    Ok(dir)
}

pub(crate) fn create_dir_all(dir: &Path) -> Result<()> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }

    builder
        .create(dir)
        .map_err(|e| Error::filesystem("create directory", dir, e))?;
    tracing::debug!("Ensured directory {:?}", dir);
    Ok(())
}
