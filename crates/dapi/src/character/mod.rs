//! Character model.
//!
//! Character objects come in two shapes depending on the endpoint:
//!
//! - flat: `{"membershipId", "characterId", "powerLevel", "stats", ...}`
//! - nested: `{"characterBase": {...flat fields...}, "characterLevel",
//!   "levelProgression", "emblemPath", ...}`
//!
//! [`Character::from_raw`] accepts both and keeps only the fields this crate
//! knows about.

mod fetch;
mod stats;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumString, FromRepr};
use tracing::debug;

use crate::error::{Error, Result};

pub use stats::{STATS_LAYOUT, StatsTable};

/// Customization keys kept from the raw object
pub const CUSTOMIZATION_KEYS: &[&str] = &["decalColor", "decalIndex", "eyeColor", "wearHelmet"];

/// Optional fields copied verbatim when present
pub const EXTRA_KEYS: &[&str] = &[
    "grimoireScore",
    "lastCompletedStoryHash",
    "minutesPlayedThisSession",
    "minutesPlayedTotal",
    "dateLastPlayed",
];

/// Timestamp format of `dateLastPlayed`
pub const LAST_PLAYED_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Level at which the level line is dropped from the progress summary
pub const MAX_LEVEL: i64 = 40;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    FromRepr,
    EnumString,
    Display,
)]
#[strum(ascii_case_insensitive)]
#[repr(u8)]
pub enum ClassType {
    #[strum(serialize = "titan")]
    Titan = 0,
    #[strum(serialize = "hunter")]
    Hunter = 1,
    #[strum(serialize = "warlock")]
    Warlock = 2,
    #[default]
    #[strum(serialize = "unknown")]
    Unknown = 3,
}

impl ClassType {
    /// Map a raw `classType` value; anything unrecognized is `Unknown`
    pub fn from_raw(value: Option<&Value>) -> Self {
        value
            .and_then(Value::as_u64)
            .and_then(|v| u8::try_from(v).ok())
            .and_then(Self::from_repr)
            .unwrap_or_default()
    }

    /// Capitalized name for display ("Titan")
    pub fn title(&self) -> &'static str {
        match self {
            Self::Titan => "Titan",
            Self::Hunter => "Hunter",
            Self::Warlock => "Warlock",
            Self::Unknown => "Unknown",
        }
    }
}

/// Level progression block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Progression {
    pub daily_progress: f64,
    pub weekly_progress: f64,
    pub current_progress: f64,
    pub level: i64,
    pub step: i64,
    pub progress_to_next_level: f64,
    pub next_level_at: f64,
    pub progression_hash: u64,
}

/// One character of an account
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    membership_id: String,
    character_id: String,
    level: Option<i64>,
    light_level: Option<i64>,
    progress: Option<Progression>,
    pct_next_level: Option<f64>,
    emblem_hash: Option<u32>,
    emblem_path: Option<String>,
    background_path: Option<String>,
    is_prestige: Option<bool>,
    class_type: ClassType,
    customization: Map<String, Value>,
    stats: BTreeMap<String, i64>,
    extras: Map<String, Value>,
}

fn id_field(base: &Value, key: &str) -> Result<String> {
    match base.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(Error::Validation(format!(
            "No \"{}\" field present in API object",
            key
        ))),
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Numeric field that may arrive as a number or a numeric string
fn numeric_field(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Strip the stat key prefix: `STAT_INTELLECT` -> `intellect`
pub fn stat_short_name(raw_key: &str) -> String {
    let lower = raw_key.to_lowercase();
    match lower.rsplit_once('_') {
        Some((_, short)) => short.to_string(),
        None => lower,
    }
}

fn extract_stats(raw: Option<&Value>) -> BTreeMap<String, i64> {
    let Some(Value::Object(raw)) = raw else {
        return BTreeMap::new();
    };

    raw.iter()
        .filter_map(|(key, stat)| match numeric_field(stat.get("value")) {
            Some(value) => Some((stat_short_name(key), value)),
            None => {
                debug!("Skipping stat {} without a numeric value", key);
                None
            }
        })
        .collect()
}

fn pick(raw: Option<&Value>, keys: &[&str]) -> Map<String, Value> {
    let Some(Value::Object(raw)) = raw else {
        return Map::new();
    };
    keys.iter()
        .filter_map(|&key| raw.get(key).map(|v| (key.to_string(), v.clone())))
        .collect()
}

impl Character {
    /// Build a character from either API shape.
    ///
    /// Fails with [`Error::Validation`] if `membershipId` or `characterId`
    /// is missing.
    pub fn from_raw(raw: &Value) -> Result<Self> {
        let outer = raw;
        let base = raw.get("characterBase").unwrap_or(raw);

        let membership_id = id_field(base, "membershipId")?;
        let character_id = id_field(base, "characterId")?;

        let progress = match outer.get("levelProgression") {
            Some(p) if p.is_object() => serde_json::from_value(p.clone()).ok(),
            _ => None,
        };

        Ok(Self {
            membership_id,
            character_id,
            level: numeric_field(outer.get("characterLevel")),
            light_level: numeric_field(base.get("powerLevel")),
            progress,
            pct_next_level: outer.get("percentToNextLevel").and_then(Value::as_f64),
            emblem_hash: outer
                .get("emblemHash")
                .and_then(Value::as_u64)
                .and_then(|h| u32::try_from(h).ok()),
            emblem_path: str_field(outer, "emblemPath"),
            background_path: str_field(outer, "backgroundPath"),
            is_prestige: outer.get("isPrestigeLevel").and_then(Value::as_bool),
            class_type: ClassType::from_raw(base.get("classType")),
            customization: pick(base.get("customization"), CUSTOMIZATION_KEYS),
            stats: extract_stats(base.get("stats")),
            extras: pick(Some(base), EXTRA_KEYS),
        })
    }

    pub fn membership_id(&self) -> &str {
        &self.membership_id
    }

    pub fn character_id(&self) -> &str {
        &self.character_id
    }

    pub fn level(&self) -> Option<i64> {
        self.level
    }

    pub fn light_level(&self) -> Option<i64> {
        self.light_level
    }

    pub fn progress(&self) -> Option<&Progression> {
        self.progress.as_ref()
    }

    pub fn pct_next_level(&self) -> Option<f64> {
        self.pct_next_level
    }

    pub fn emblem_hash(&self) -> Option<u32> {
        self.emblem_hash
    }

    pub fn emblem_path(&self) -> Option<&str> {
        self.emblem_path.as_deref()
    }

    pub fn background_path(&self) -> Option<&str> {
        self.background_path.as_deref()
    }

    pub fn is_prestige(&self) -> Option<bool> {
        self.is_prestige
    }

    pub fn class_type(&self) -> ClassType {
        self.class_type
    }

    pub fn customization(&self) -> &Map<String, Value> {
        &self.customization
    }

    /// Stats keyed by short name (`intellect`, `armor`, ...)
    pub fn stats(&self) -> &BTreeMap<String, i64> {
        &self.stats
    }

    /// Raw value of an optional extra field
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    pub fn grimoire_score(&self) -> Option<i64> {
        numeric_field(self.extras.get("grimoireScore"))
    }

    pub fn last_completed_story_hash(&self) -> Option<i64> {
        numeric_field(self.extras.get("lastCompletedStoryHash"))
    }

    pub fn minutes_played_this_session(&self) -> Option<i64> {
        numeric_field(self.extras.get("minutesPlayedThisSession"))
    }

    pub fn minutes_played_total(&self) -> Option<i64> {
        numeric_field(self.extras.get("minutesPlayedTotal"))
    }

    /// Last played time; `None` when absent or malformed
    pub fn last_played(&self) -> Option<DateTime<Utc>> {
        let raw = self.extras.get("dateLastPlayed")?.as_str()?;
        match NaiveDateTime::parse_from_str(raw, LAST_PLAYED_FORMAT) {
            Ok(dt) => Some(dt.and_utc()),
            Err(e) => {
                debug!("Ignoring unparsable dateLastPlayed {:?}: {}", raw, e);
                None
            }
        }
    }

    /// Last played time in `ctime` style ("Mon Oct  5 20:12:34 2015")
    pub fn last_played_display(&self) -> Option<String> {
        self.last_played()
            .map(|dt| dt.format("%a %b %e %H:%M:%S %Y").to_string())
    }

    /// One-line progress summary
    pub fn progress_summary(&self) -> Option<String> {
        let progress = self.progress.as_ref()?;

        let mut summary = String::new();
        if progress.level < MAX_LEVEL {
            summary.push_str(&format!(
                "Level {} of {} ({:.1}% till next) -- ",
                progress.level,
                MAX_LEVEL,
                self.pct_next_level.unwrap_or(0.0)
            ));
        }
        summary.push_str(&format!(
            "Current Progress: {} [Daily: {:.1}% -- Weekly: {:.1}%]",
            progress.current_progress, progress.daily_progress, progress.weekly_progress
        ));
        Some(summary)
    }

    /// Stats laid out for display; `None` when the character has no stats
    pub fn stats_table(&self) -> Option<StatsTable> {
        if self.stats.is_empty() {
            return None;
        }
        Some(StatsTable::new(&self.stats))
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = self
            .level
            .map(|l| l.to_string())
            .unwrap_or_else(|| "?".to_string());
        write!(
            f,
            "{} (Level {}) [ID: {}]",
            self.class_type.title(),
            level,
            self.character_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat_raw() -> Value {
        json!({
            "membershipId": "4611686018429000000",
            "characterId": "2305843009200000001",
            "powerLevel": 310,
            "classType": 2,
            "customization": {
                "decalColor": 3,
                "decalIndex": 12,
                "eyeColor": 1,
                "wearHelmet": false,
                "personality": 4,
                "face": 9
            },
            "stats": {
                "STAT_INTELLECT": {"statHash": 144602215, "value": 180},
                "STAT_DISCIPLINE": {"statHash": 1735777505, "value": 95},
                "STAT_LIGHT": {"statHash": 2391494160u32, "value": 310},
                "STAT_BROKEN": {"statHash": 1}
            },
            "grimoireScore": 4240,
            "minutesPlayedTotal": "12345",
            "minutesPlayedThisSession": "42",
            "dateLastPlayed": "2015-10-05T20:12:34Z",
            "genderType": 1
        })
    }

    fn nested_raw() -> Value {
        json!({
            "characterBase": flat_raw(),
            "characterLevel": 40,
            "levelProgression": {
                "dailyProgress": 1500,
                "weeklyProgress": 9000,
                "currentProgress": 123456,
                "level": 40,
                "step": 0,
                "progressToNextLevel": 0,
                "nextLevelAt": 0,
                "progressionHash": 1716568313u32
            },
            "percentToNextLevel": 12.5,
            "emblemHash": 4077939641u32,
            "emblemPath": "/common/destiny_content/icons/emblem.jpg",
            "backgroundPath": "/common/destiny_content/icons/bg.jpg",
            "isPrestigeLevel": false
        })
    }

    #[test]
    fn test_from_raw_flat() {
        let c = Character::from_raw(&flat_raw()).unwrap();
        assert_eq!(c.membership_id(), "4611686018429000000");
        assert_eq!(c.character_id(), "2305843009200000001");
        assert_eq!(c.light_level(), Some(310));
        assert_eq!(c.class_type(), ClassType::Warlock);
        assert_eq!(c.level(), None);
        assert!(c.progress().is_none());
    }

    #[test]
    fn test_from_raw_nested_lifts_outer_fields() {
        let c = Character::from_raw(&nested_raw()).unwrap();
        assert_eq!(c.character_id(), "2305843009200000001");
        assert_eq!(c.level(), Some(40));
        assert_eq!(c.light_level(), Some(310));
        assert_eq!(c.pct_next_level(), Some(12.5));
        assert_eq!(c.emblem_hash(), Some(4_077_939_641));
        assert_eq!(
            c.emblem_path(),
            Some("/common/destiny_content/icons/emblem.jpg")
        );
        assert_eq!(c.is_prestige(), Some(false));
        assert_eq!(c.progress().unwrap().level, 40);
        assert_eq!(c.progress().unwrap().current_progress, 123_456.0);
    }

    #[test]
    fn test_from_raw_missing_character_id_both_shapes() {
        let mut flat = flat_raw();
        flat.as_object_mut().unwrap().remove("characterId");
        assert!(matches!(
            Character::from_raw(&flat),
            Err(Error::Validation(_))
        ));

        let nested = json!({"characterBase": flat, "characterLevel": 20});
        assert!(matches!(
            Character::from_raw(&nested),
            Err(Error::Validation(_))
        ));

        // Ids on the outer object do not count for the nested shape
        let outer_only = json!({
            "membershipId": "1",
            "characterId": "2",
            "characterBase": {"powerLevel": 5}
        });
        assert!(Character::from_raw(&outer_only).is_err());
    }

    #[test]
    fn test_from_raw_missing_membership_id() {
        let mut flat = flat_raw();
        flat.as_object_mut().unwrap().remove("membershipId");
        let err = Character::from_raw(&flat).unwrap_err();
        assert!(err.to_string().contains("membershipId"));
    }

    #[test]
    fn test_customization_allow_list() {
        let c = Character::from_raw(&flat_raw()).unwrap();
        let keys: Vec<&str> = c.customization().keys().map(String::as_str).collect();
        assert_eq!(keys.len(), 4);
        for key in CUSTOMIZATION_KEYS {
            assert!(keys.contains(key));
        }
        assert!(c.customization().get("face").is_none());
    }

    #[test]
    fn test_stats_short_names() {
        let c = Character::from_raw(&flat_raw()).unwrap();
        assert_eq!(c.stats().get("intellect"), Some(&180));
        assert_eq!(c.stats().get("discipline"), Some(&95));
        assert_eq!(c.stats().get("light"), Some(&310));
        // No numeric value, skipped
        assert!(c.stats().get("broken").is_none());
        assert_eq!(stat_short_name("STAT_ARMOR"), "armor");
        assert_eq!(stat_short_name("Optics"), "optics");
    }

    #[test]
    fn test_extras_only_when_present() {
        let c = Character::from_raw(&flat_raw()).unwrap();
        assert_eq!(c.grimoire_score(), Some(4240));
        assert_eq!(c.minutes_played_total(), Some(12_345));
        assert_eq!(c.minutes_played_this_session(), Some(42));
        assert_eq!(c.last_completed_story_hash(), None);
        assert!(c.extra("lastCompletedStoryHash").is_none());
        assert!(c.extra("genderType").is_none());
    }

    #[test]
    fn test_last_played() {
        let c = Character::from_raw(&flat_raw()).unwrap();
        let dt = c.last_played().unwrap();
        assert_eq!(dt.to_rfc3339(), "2015-10-05T20:12:34+00:00");
        assert_eq!(
            c.last_played_display().as_deref(),
            Some("Mon Oct  5 20:12:34 2015")
        );
    }

    #[test]
    fn test_last_played_tolerates_bad_values() {
        for bad in [json!("yesterday"), json!(""), json!(12), json!("2015-10-05 20:12:34")] {
            let mut raw = flat_raw();
            raw["dateLastPlayed"] = bad;
            let c = Character::from_raw(&raw).unwrap();
            assert_eq!(c.last_played(), None);
        }

        let mut raw = flat_raw();
        raw.as_object_mut().unwrap().remove("dateLastPlayed");
        assert_eq!(Character::from_raw(&raw).unwrap().last_played(), None);
    }

    #[test]
    fn test_progress_summary() {
        let c = Character::from_raw(&nested_raw()).unwrap();
        assert_eq!(
            c.progress_summary().unwrap(),
            "Current Progress: 123456 [Daily: 1500.0% -- Weekly: 9000.0%]"
        );

        let mut raw = nested_raw();
        raw["levelProgression"]["level"] = json!(20);
        let c = Character::from_raw(&raw).unwrap();
        assert!(c
            .progress_summary()
            .unwrap()
            .starts_with("Level 20 of 40 (12.5% till next) -- "));

        let flat = Character::from_raw(&flat_raw()).unwrap();
        assert_eq!(flat.progress_summary(), None);
    }

    #[test]
    fn test_class_type_parsing() {
        assert_eq!("Titan".parse::<ClassType>().unwrap(), ClassType::Titan);
        assert_eq!("HUNTER".parse::<ClassType>().unwrap(), ClassType::Hunter);
        assert!("paladin".parse::<ClassType>().is_err());
        assert_eq!(ClassType::from_raw(Some(&json!(1))), ClassType::Hunter);
        assert_eq!(ClassType::from_raw(Some(&json!(7))), ClassType::Unknown);
        assert_eq!(ClassType::from_raw(None), ClassType::Unknown);
        assert_eq!(ClassType::Warlock.to_string(), "warlock");
    }

    #[test]
    fn test_display() {
        let c = Character::from_raw(&nested_raw()).unwrap();
        assert_eq!(c.to_string(), "Warlock (Level 40) [ID: 2305843009200000001]");
    }
}
