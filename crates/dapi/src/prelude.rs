//! Prelude module for convenient imports
//!
//! ```ignore
//! use dapi::prelude::*;
//! ```
//!
//! This brings the following into scope:
//!
//! - Client types: `Dapi`, `ClientConfig`, `UserLookup`, `UserProfile`
//! - Models: `Character`, `ClassType`, `InventoryItem`
//! - Manifest: `load_manifest`, `ManifestTable`, hash helpers
//! - Error handling: `Error`, `Result`

// Client
pub use crate::client::{Dapi, UserLookup, WorldManifest};
pub use crate::config::ClientConfig;
pub use crate::profile::UserProfile;

// Error handling
pub use crate::error::{Error, Result};

// Models
pub use crate::character::{Character, ClassType};
pub use crate::item::InventoryItem;

// Manifest
pub use crate::manifest::{ManifestTable, hash_for_lookup, hash_for_storage, load_manifest};
