use crate::{Result, TransferError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Batch size used when none is configured.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Largest batch accepted by the destination in one write.
pub const MAX_BATCH_SIZE: usize = 100;

pub const DEFAULT_SPOTIFY_API_BASE: &str = "https://api.spotify.com/v1";
pub const DEFAULT_YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Environment variable overriding [`TransferConfig::spotify_access_token`].
pub const SPOTIFY_TOKEN_ENV: &str = "SPOTIFY_ACCESS_TOKEN";
/// Environment variable overriding [`TransferConfig::youtube_access_token`].
pub const YOUTUBE_TOKEN_ENV: &str = "YOUTUBE_ACCESS_TOKEN";
/// Environment variable overriding [`TransferConfig::batch_size`].
pub const BATCH_SIZE_ENV: &str = "PLAYLIST_TRANSFER_BATCH_SIZE";

/// Settings for a transfer run.
///
/// Loaded from `~/.config/playlist-transfer/config.json` (or an explicit path),
/// then overridden from the environment. Access tokens are minted elsewhere;
/// this crate only carries them.
///
/// ```json
/// {
///   "spotify_access_token": "BQD...",
///   "youtube_access_token": "ya29...",
///   "batch_size": 50
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    pub spotify_access_token: Option<String>,
    pub youtube_access_token: Option<String>,
    /// Number of track identifiers sent per destination write
    pub batch_size: usize,
    pub spotify_api_base: String,
    pub youtube_api_base: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            spotify_access_token: None,
            youtube_access_token: None,
            batch_size: DEFAULT_BATCH_SIZE,
            spotify_api_base: DEFAULT_SPOTIFY_API_BASE.to_string(),
            youtube_api_base: DEFAULT_YOUTUBE_API_BASE.to_string(),
        }
    }
}

impl TransferConfig {
    /// Default config file location, e.g. `~/.config/playlist-transfer/config.json`.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            TransferError::Config("Cannot determine user config directory".to_string())
        })?;
        Ok(config_dir.join("playlist-transfer").join("config.json"))
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// An explicit path must exist. A missing file at the default location
    /// yields the defaults. Environment overrides are applied and the result
    /// is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_path()?;
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    log::debug!(
                        "No config file at {}, using defaults",
                        default_path.display()
                    );
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            TransferError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&contents)
            .map_err(|e| TransferError::Config(format!("{}: {e}", path.display())))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TransferError::Config(format!("Invalid JSON: {e}")))
    }

    /// Apply overrides from a key lookup (the process environment in practice).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(SPOTIFY_TOKEN_ENV) {
            self.spotify_access_token = Some(token);
        }
        if let Some(token) = lookup(YOUTUBE_TOKEN_ENV) {
            self.youtube_access_token = Some(token);
        }
        if let Some(raw) = lookup(BATCH_SIZE_ENV) {
            self.batch_size = raw.trim().parse().map_err(|_| {
                TransferError::Config(format!("{BATCH_SIZE_ENV} must be an integer, got '{raw}'"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_batch_size(self.batch_size)?;
        Ok(())
    }

    /// Both access tokens, or [`TransferError::AuthNotReady`].
    pub fn tokens(&self) -> Result<(&str, &str)> {
        Ok((self.spotify_token()?, self.youtube_token()?))
    }

    pub fn spotify_token(&self) -> Result<&str> {
        non_empty(&self.spotify_access_token).ok_or(TransferError::AuthNotReady)
    }

    pub fn youtube_token(&self) -> Result<&str> {
        non_empty(&self.youtube_access_token).ok_or(TransferError::AuthNotReady)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Check that a batch size is within `1..=MAX_BATCH_SIZE`.
pub fn validate_batch_size(batch_size: usize) -> Result<usize> {
    if (1..=MAX_BATCH_SIZE).contains(&batch_size) {
        Ok(batch_size)
    } else {
        Err(TransferError::InvalidBatchSize(batch_size))
    }
}
