//! # dapi
//!
//! Client library for the Destiny platform API.
//!
//! This crate provides:
//! - An API client with response envelope handling (`client`)
//! - A locally persisted user profile (`profile`)
//! - A normalized character model (`character`)
//! - Inventory item views (`item`)
//! - World manifest download and SQLite decoding (`client`, `manifest`)

pub mod character;
pub mod client;
pub mod config;
pub mod error;
pub mod item;
pub mod manifest;
pub mod prelude;
pub mod profile;

pub use character::{Character, ClassType, Progression, StatsTable};
pub use client::{Dapi, Transport, UreqTransport, UserLookup, WorldManifest};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result};
pub use item::{InventoryItem, ItemField, inventory_item_hashes};
pub use manifest::{
    ITEM_DEFINITION_TABLE, ManifestTable, hash_for_lookup, hash_for_storage, list_tables,
    load_manifest,
};
pub use profile::{UserProfile, default_profile_path};
