//! Persisted user profile.
//!
//! A profile is the search result for one player with the account summary
//! embedded under `account`. It is written once after a username lookup and
//! reloaded on later runs so operations can default to "my" membership id.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Profile file name under the dapi config directory
const PROFILE_FILE: &str = "profile.json";

/// Summary of one player account, as stored locally
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub membership_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
    /// Raw account summary (`1/Account/{id}/Summary`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Value>,
    /// Any other search result fields, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(membership_id: impl Into<String>) -> Self {
        Self {
            membership_id: membership_id.into(),
            display_name: None,
            membership_type: None,
            icon_path: None,
            account: None,
            extra: Map::new(),
        }
    }

    /// Build a profile from a raw search result object
    pub fn from_search_result(value: &Value) -> Result<Self> {
        if value.get("membershipId").is_none() {
            return Err(Error::Validation(
                "No \"membershipId\" field present in search result".to_string(),
            ));
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Raw character objects from the embedded account summary
    pub fn characters(&self) -> &[Value] {
        self.account
            .as_ref()
            .and_then(|account| account.get("characters"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Character ids of the embedded account, in account order
    pub fn character_ids(&self) -> Vec<String> {
        self.characters()
            .iter()
            .filter_map(|c| {
                let base = c.get("characterBase").unwrap_or(c);
                base.get("characterId").and_then(Value::as_str)
            })
            .map(str::to_string)
            .collect()
    }

    /// Load a profile from a file. Returns `Ok(None)` if the file does not exist.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();

        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No profile at {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let profile: UserProfile = serde_json::from_str(&content)?;
        info!(
            "Loaded profile for membership {} from {}",
            profile.membership_id,
            path.display()
        );
        Ok(Some(profile))
    }

    /// Save the profile to a file.
    ///
    /// An existing file is only replaced when `overwrite` is set; otherwise
    /// this fails with [`Error::Conflict`] and leaves the file untouched.
    pub fn save_to_path<P: AsRef<Path>>(&self, path: P, overwrite: bool) -> Result<()> {
        let path = path.as_ref();

        if path.exists() {
            if !overwrite {
                return Err(Error::Conflict(path.to_path_buf()));
            }
            fs::remove_file(path)?;
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        info!("Saved profile to {}", path.display());
        Ok(())
    }
}

/// Default profile location (`<config dir>/dapi/profile.json`)
pub fn default_profile_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("dapi").join(PROFILE_FILE))
}
