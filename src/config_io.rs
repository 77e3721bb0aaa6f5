//! Directory resolution and config loading.

use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigError};

const APP_DIR: &str = "playground";

/// Directories the application reads and writes.
///
/// Only `main` should build this from the system with
/// [`from_system`](DirectoryContext::from_system); everything else receives
/// it as a parameter so tests can point it at a temp directory.
#[derive(Debug, Clone)]
pub struct DirectoryContext {
    /// Persistent session state and logs
    /// e.g., ~/.local/share/playground on Linux
    pub data_dir: PathBuf,

    /// User configuration
    /// e.g., ~/.config/playground on Linux
    pub config_dir: PathBuf,
}

impl DirectoryContext {
    /// Create a DirectoryContext from the system directories
    pub fn from_system() -> std::io::Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine data directory",
                )
            })?
            .join(APP_DIR);

        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .join(APP_DIR);

        Ok(Self {
            data_dir,
            config_dir,
        })
    }

    /// All paths point to subdirectories within the provided temp_dir
    pub fn for_testing(temp_dir: &Path) -> Self {
        Self {
            data_dir: temp_dir.join("data"),
            config_dir: temp_dir.join("config"),
        }
    }

    /// Where the session mapping is stored
    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join("session")
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    pub fn log_file_path(&self) -> PathBuf {
        self.data_dir.join("logs").join("playground.log")
    }
}

/// Load the config from `explicit` or the default location.
///
/// A missing default file yields the defaults; a missing explicit file is an
/// error. The loaded config is validated either way.
pub fn load_config(
    dir_context: &DirectoryContext,
    explicit: Option<&Path>,
) -> Result<Config, ConfigError> {
    let config = match explicit {
        Some(path) => Config::load_from_file(path)?,
        None => {
            let path = dir_context.config_path();
            if path.exists() {
                Config::load_from_file(&path)?
            } else {
                tracing::debug!("No config at {:?}, using defaults", path);
                Config::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}
