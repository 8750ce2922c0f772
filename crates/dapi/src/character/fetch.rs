//! Character lookups through the API client.

use std::collections::BTreeMap;

use tracing::warn;

use super::{Character, ClassType};
use crate::client::{Dapi, Transport};
use crate::error::{Error, Result};

impl Character {
    /// Fetch one character by id
    pub fn fetch<T: Transport>(
        api: &Dapi<T>,
        membership_id: Option<&str>,
        character_id: &str,
    ) -> Result<Self> {
        let raw = api
            .character(character_id, membership_id)?
            .ok_or_else(|| Error::NotFound(format!("Character {}", character_id)))?;
        Character::from_raw(&raw)
    }

    /// Fetch every character of an account keyed by class.
    ///
    /// Accounts hold at most one character per class in practice; if two
    /// share a class the later one wins.
    pub fn fetch_all<T: Transport>(
        api: &Dapi<T>,
        membership_id: Option<&str>,
    ) -> Result<BTreeMap<ClassType, Character>> {
        let mut characters = BTreeMap::new();
        for raw in api.characters(membership_id)? {
            let character = Character::from_raw(&raw)?;
            if let Some(previous) = characters.insert(character.class_type(), character) {
                warn!(
                    "Two characters share class {}, dropping {}",
                    previous.class_type(),
                    previous.character_id()
                );
            }
        }
        Ok(characters)
    }

    /// Fetch the character of one class
    pub fn fetch_class<T: Transport>(
        api: &Dapi<T>,
        membership_id: Option<&str>,
        class: ClassType,
    ) -> Result<Self> {
        Self::fetch_all(api, membership_id)?
            .remove(&class)
            .ok_or_else(|| Error::NotFound(format!("No {} character on this account", class)))
    }
}
