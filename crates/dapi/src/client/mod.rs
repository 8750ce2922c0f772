//! Platform API client.
//!
//! [`Dapi`] turns logical lookups (player search, account summary,
//! characters, inventories, manifest) into GET requests against the platform
//! endpoint and unwraps the response envelope.
//!
//! Most operations take an optional membership id. When none is given the id
//! of the loaded [`UserProfile`] is used, so after
//! [`Dapi::set_username`] or [`Dapi::load_profile`] calls can omit it.
//!
//! ## Example
//!
//! ```ignore
//! use dapi::{ClientConfig, Dapi};
//!
//! let mut api = Dapi::new(ClientConfig::new(api_key));
//! api.set_username("guardian")?;
//! let account = api.account(None)?;
//! ```

mod envelope;
#[cfg(test)]
pub(crate) mod mock;
mod transport;
mod world;

use std::collections::BTreeMap;
use std::path::Path;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::profile::UserProfile;

pub use envelope::{SUCCESS_STATUS, normalize_path, unwrap_envelope};
pub use transport::{API_KEY_HEADER, Transport, UreqTransport};
pub use world::{WorldManifest, content_file_name};

/// Bytes escaped in a user-supplied path segment. `.` is included so a
/// segment can never be `..`.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

/// Outcome of resolving a username
#[derive(Debug, Clone, PartialEq)]
pub enum UserLookup {
    Found(UserProfile),
    NotFound,
    /// More than one player matched; raw search results
    Ambiguous(Vec<Value>),
}

/// Platform API client
pub struct Dapi<T: Transport = UreqTransport> {
    config: ClientConfig,
    transport: T,
    profile: Option<UserProfile>,
}

impl Dapi<UreqTransport> {
    /// Create a client using the default HTTP transport
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Dapi<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            config,
            transport,
            profile: None,
        }
    }

    /// Use an in-memory profile
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Use the profile stored at `path`; the file must exist
    pub fn with_profile_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        self.load_profile(path, true)?;
        Ok(self)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Currently loaded profile
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Replace the loaded profile
    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
    }

    /// Load the profile stored at `path`.
    ///
    /// A missing file leaves the current profile in place unless `required`
    /// is set, in which case it is an [`Error::NotFound`].
    pub fn load_profile<P: AsRef<Path>>(
        &mut self,
        path: P,
        required: bool,
    ) -> Result<Option<&UserProfile>> {
        let path = path.as_ref();
        match UserProfile::load_from_path(path)? {
            Some(profile) => self.profile = Some(profile),
            None if required => {
                return Err(Error::NotFound(format!(
                    "Unable to read user profile from \"{}\"",
                    path.display()
                )));
            }
            None => {}
        }
        Ok(self.profile.as_ref())
    }

    /// Save the loaded profile to `path`
    pub fn save_profile<P: AsRef<Path>>(&self, path: P, overwrite: bool) -> Result<()> {
        let profile = self
            .profile
            .as_ref()
            .ok_or_else(|| Error::NotFound("No user profile loaded".to_string()))?;
        profile.save_to_path(path, overwrite)
    }

    fn membership_id<'a>(&'a self, membership_id: Option<&'a str>) -> Result<&'a str> {
        match membership_id {
            Some(id) => Ok(id),
            None => self
                .profile
                .as_ref()
                .map(|p| p.membership_id.as_str())
                .ok_or(Error::MissingMembership),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Call a platform path and return the unwrapped payload.
    ///
    /// `Ok(None)` means the call succeeded with an empty response.
    pub fn request(&self, path: &str) -> Result<Option<Value>> {
        let path = normalize_path(path);
        let url = self.url_for(&path);
        debug!("GET {}", url);

        let body = self
            .transport
            .get_json(&url, &self.config.api_key)
            .map_err(|e| match e {
                // Report the platform path, not the full URL
                Error::Transport { source, .. } => Error::Transport {
                    path: path.clone(),
                    source,
                },
                other => other,
            })
            .inspect_err(|e| warn!("Request failed: {}", e))?;

        unwrap_envelope(&path, body).inspect_err(|e| warn!("{}", e))
    }

    /// Search for a player by display name
    pub fn search(&self, username: &str) -> Result<Option<Value>> {
        self.request(&format!(
            "SearchDestinyPlayer/1/{}/",
            utf8_percent_encode(username, SEGMENT)
        ))
    }

    /// Resolve a username to a single player
    pub fn lookup_user(&self, username: &str) -> Result<UserLookup> {
        let lookup = match self.search(username)? {
            None => UserLookup::NotFound,
            Some(Value::Array(results)) => UserLookup::Ambiguous(results),
            Some(result) => UserLookup::Found(UserProfile::from_search_result(&result)?),
        };
        Ok(lookup)
    }

    /// Resolve `username`, fetch its account summary and make it the loaded profile
    pub fn set_username(&mut self, username: &str) -> Result<&UserProfile> {
        let mut profile = match self.lookup_user(username)? {
            UserLookup::Found(profile) => profile,
            UserLookup::NotFound => return Err(Error::UserNotFound(username.to_string())),
            UserLookup::Ambiguous(results) => {
                return Err(Error::AmbiguousUser {
                    username: username.to_string(),
                    count: results.len(),
                });
            }
        };

        profile.account = self.account(Some(&profile.membership_id))?;
        info!(
            "Resolved {} to membership {}",
            username, profile.membership_id
        );
        Ok(&*self.profile.insert(profile))
    }

    /// Account summary with the character list
    pub fn account(&self, membership_id: Option<&str>) -> Result<Option<Value>> {
        let membership_id = self.membership_id(membership_id)?;
        self.request(&format!("1/Account/{}/Summary/", membership_id))
    }

    /// Raw character objects of an account
    pub fn characters(&self, membership_id: Option<&str>) -> Result<Vec<Value>> {
        let characters = self
            .account(membership_id)?
            .and_then(|mut account| account.get_mut("characters").map(Value::take))
            .unwrap_or(Value::Null);

        match characters {
            Value::Array(list) => Ok(list),
            Value::Null => Ok(Vec::new()),
            other => Err(Error::Validation(format!(
                "Unexpected \"characters\" value in account summary: {}",
                other
            ))),
        }
    }

    /// One raw character object
    pub fn character(
        &self,
        character_id: &str,
        membership_id: Option<&str>,
    ) -> Result<Option<Value>> {
        let membership_id = self.membership_id(membership_id)?;
        self.request(&format!(
            "1/Account/{}/Character/{}",
            membership_id, character_id
        ))
    }

    /// Inventory summary of one character
    pub fn inventory(
        &self,
        character_id: &str,
        membership_id: Option<&str>,
    ) -> Result<Option<Value>> {
        let membership_id = self.membership_id(membership_id)?;
        self.request(&format!(
            "1/Account/{}/Character/{}/Inventory/Summary/",
            membership_id, character_id
        ))
    }

    /// Inventory of every character in the loaded profile, keyed by character id
    pub fn full_inventory(
        &self,
        membership_id: Option<&str>,
    ) -> Result<BTreeMap<String, Option<Value>>> {
        let membership_id = self.membership_id(membership_id)?;
        let profile = self.profile.as_ref().ok_or(Error::MissingMembership)?;

        let mut inventories = BTreeMap::new();
        for character_id in profile.character_ids() {
            let inventory = self.inventory(&character_id, Some(membership_id))?;
            inventories.insert(character_id, inventory);
        }
        Ok(inventories)
    }

    /// Summary of every item on the account
    pub fn items_summary(&self, membership_id: Option<&str>) -> Result<Option<Value>> {
        let membership_id = self.membership_id(membership_id)?;
        self.request(&format!("1/Account/{}/Items/", membership_id))
    }

    /// Single manifest definition (`Manifest/{type}/{id}`)
    pub fn manifest_entry(&self, type_id: u32, id: &str) -> Result<Option<Value>> {
        self.request(&format!("Manifest/{}/{}", type_id, id))
    }

    /// Manifest index: version and per-language content paths
    pub fn manifest_index(&self) -> Result<Option<Value>> {
        self.request("Manifest/")
    }
}
