//! CLI configuration file.
//!
//! ```toml
//! base_url = "https://www.bungie.net/platform/destiny"
//! timeout_secs = 30
//! profile_path = "/home/me/.config/dapi/profile.json"
//! language = "en"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dapi::ClientConfig;
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub profile_path: Option<PathBuf>,
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: None,
            profile_path: None,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dapi").join("config.toml"))
}

impl Settings {
    /// Load settings from `path`. A missing file gives the defaults; so does
    /// a malformed one, with a warning.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("Failed to read {}: {}, using defaults", path.display(), e);
                return Self::default();
            }
        };

        match toml::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Client configuration for `api_key`; `base_url` overrides the file
    pub fn client_config(&self, api_key: &str, base_url: Option<&str>) -> ClientConfig {
        let mut builder = ClientConfig::builder(api_key);
        if let Some(url) = base_url.or(self.base_url.as_deref()) {
            builder = builder.base_url(url);
        }
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    /// Profile path: explicit value, then the file setting, then the default
    pub fn profile_path(&self, explicit: Option<&Path>) -> Option<PathBuf> {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.profile_path.clone())
            .or_else(dapi::default_profile_path)
    }
}
