//! Foodstuff configuration
//!
//! Loads the consumable list from a JSON array of records:
//!
//! ```json
//! [
//!   { "type": "food", "name": "apple", "tileIndex": 3,
//!     "effects": [ { "type": "food", "cps": 50.0, "duration": 0.1 } ] }
//! ]
//! ```
//!
//! Failure contract: a whole-file read or parse failure returns before the
//! lists are touched, so callers keep whatever they had. A bad record
//! (unknown `type` tag, wrong field shape) aborts that load partway with
//! everything before it already in place. Callers log and continue either
//! way — missing food data must never crash the session.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::game::foodstuff::{EffectTemplate, Foodstuff};
use crate::game::stats::Meter;

/// Error loading a configuration file.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    /// The file as a whole is not valid JSON.
    Parse(serde_json::Error),
    /// One record is malformed; earlier records were already consumed.
    Record {
        index: usize,
        source: serde_json::Error,
    },
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Record { index, source } => {
                write!(f, "Bad record #{}: {}", index, source)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Queue category of a foodstuff record. An unknown tag is an
/// unknown-variant deserialization error, which is the hard per-record
/// failure the contract calls for.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindDef {
    Food,
    Drink,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MeterDef {
    Food,
    Drink,
    Growth,
}

impl From<MeterDef> for Meter {
    fn from(def: MeterDef) -> Self {
        match def {
            MeterDef::Food => Meter::Food,
            MeterDef::Drink => Meter::Drink,
            MeterDef::Growth => Meter::Growth,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EffectDef {
    #[serde(rename = "type")]
    kind: MeterDef,
    cps: f32,
    duration: f32,
}

#[derive(Debug, Deserialize)]
struct FoodstuffDef {
    #[serde(rename = "type")]
    kind: KindDef,
    #[serde(default)]
    name: String,
    #[serde(rename = "tileIndex", default)]
    tile_index: u32,
    #[serde(default)]
    effects: Vec<EffectDef>,
}

impl FoodstuffDef {
    fn into_foodstuff(self) -> Foodstuff {
        Foodstuff {
            kind: match self.kind {
                KindDef::Food => Meter::Food,
                KindDef::Drink => Meter::Drink,
            },
            name: self.name,
            tile_index: self.tile_index,
            effects: self
                .effects
                .into_iter()
                .map(|e| EffectTemplate {
                    meter: e.kind.into(),
                    rate: e.cps,
                    duration: e.duration,
                })
                .collect(),
        }
    }
}

/// Load the food and drink lists from `path`, splitting records by kind.
/// See the module docs for the failure contract.
pub fn load_food_lists(
    path: &Path,
    food: &mut Vec<Foodstuff>,
    drink: &mut Vec<Foodstuff>,
) -> Result<(), ConfigError> {
    let text = fs::read_to_string(path)?;
    let records: Vec<serde_json::Value> =
        serde_json::from_str(&text).map_err(ConfigError::Parse)?;

    food.clear();
    drink.clear();
    for (index, value) in records.into_iter().enumerate() {
        let def: FoodstuffDef =
            serde_json::from_value(value).map_err(|source| ConfigError::Record { index, source })?;
        let item = def.into_foodstuff();
        match item.kind {
            Meter::Drink => drink.push(item),
            _ => food.push(item),
        }
    }
    Ok(())
}
