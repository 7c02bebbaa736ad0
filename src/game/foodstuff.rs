//! Consumable templates
//!
//! A `Foodstuff` bundles a meter category, a display tile and the effects it
//! grants when consumed. Templates are immutable once loaded from config and
//! copied by value into the queues; consuming one stamps its effect
//! templates into the effect engine at full duration.

use super::effects::Effect;
use super::stats::Meter;

/// One timed effect a foodstuff grants, before instantiation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectTemplate {
    pub meter: Meter,
    /// Units per second applied to the meter.
    pub rate: f32,
    /// Seconds the effect lasts.
    pub duration: f32,
}

/// A consumable item template.
#[derive(Debug, Clone, PartialEq)]
pub struct Foodstuff {
    /// Which queue it belongs to: `Meter::Food` or `Meter::Drink`.
    pub kind: Meter,
    pub name: String,
    /// Tile on the foods sheet.
    pub tile_index: u32,
    pub effects: Vec<EffectTemplate>,
}

impl Foodstuff {
    /// Stamp the template effects into live effects at full duration,
    /// tagged with this foodstuff's name for attribution.
    pub fn instantiate(&self) -> Vec<Effect> {
        self.effects
            .iter()
            .map(|t| Effect {
                meter: t.meter,
                rate: t.rate,
                remaining: t.duration,
                total: t.duration,
                source: Some(self.name.clone()),
            })
            .collect()
    }
}
