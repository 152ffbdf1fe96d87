use std::path::PathBuf;

use thiserror::Error;

/// Environment variable overriding where the store file lives.
pub const DATA_DIR_ENV: &str = "ERGON_DATA_DIR";

/// Values people leave behind in shell profiles when copying a template.
const PLACEHOLDER_VALUES: &[&str] = &["todo", "changeme", "change-me", "placeholder", "xxx"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "{DATA_DIR_ENV} is set to the placeholder value '{0}'. Point it at a real directory or unset it to use the default data directory."
    )]
    Placeholder(String),

    #[error(
        "{DATA_DIR_ENV} must be an absolute path, got '{0}'. A relative path would scatter store files across working directories."
    )]
    NotAbsolute(String),

    #[error(
        "No data directory available: {DATA_DIR_ENV} is unset and the platform reports no local data directory."
    )]
    NoDataDir,
}

pub struct Config {
    pub store_path: PathBuf,
}

impl Config {
    /// Resolve the store location: `ERGON_DATA_DIR` when set (validated so a
    /// placeholder or relative value degrades to a visible error instead of
    /// silently writing somewhere surprising), else the platform data dir.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(DATA_DIR_ENV) {
            Ok(value) => Self::from_override(&value),
            Err(_) => {
                let dir = dirs::data_local_dir().ok_or(ConfigError::NoDataDir)?;
                Ok(Self {
                    store_path: dir.join("ergon").join("store.json"),
                })
            }
        }
    }

    fn from_override(value: &str) -> Result<Self, ConfigError> {
        let trimmed = value.trim();
        if trimmed.is_empty()
            || PLACEHOLDER_VALUES
                .iter()
                .any(|p| trimmed.eq_ignore_ascii_case(p))
        {
            return Err(ConfigError::Placeholder(trimmed.to_string()));
        }

        let path = PathBuf::from(trimmed);
        if !path.is_absolute() {
            return Err(ConfigError::NotAbsolute(trimmed.to_string()));
        }

        Ok(Self {
            store_path: path.join("store.json"),
        })
    }
}
