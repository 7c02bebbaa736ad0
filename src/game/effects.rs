//! Timed-effect engine
//!
//! The set of currently active effects, integrated onto the meters once per
//! simulation tick. Effects are unordered additive contributions: apply all
//! rates, decrement all durations, sweep the expired in one pass. An effect
//! with infinite duration never expires — the ambient hunger and thirst
//! decay are two such effects installed at game start.

use super::stats::{GameStats, Meter};

/// One live timed modifier on a meter.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub meter: Meter,
    /// Units per second.
    pub rate: f32,
    /// Seconds left; `f32::INFINITY` never expires.
    pub remaining: f32,
    pub total: f32,
    /// Attribution tag (the originating foodstuff), diagnostics only.
    pub source: Option<String>,
}

impl Effect {
    /// Permanent background effect with no source, e.g. natural hunger.
    pub fn ambient(meter: Meter, rate: f32) -> Self {
        Self {
            meter,
            rate,
            remaining: f32::INFINITY,
            total: f32::INFINITY,
            source: None,
        }
    }
}

/// The active-effect set.
#[derive(Debug, Default)]
pub struct EffectEngine {
    active: Vec<Effect>,
}

impl EffectEngine {
    pub fn new() -> Self {
        Self { active: Vec::new() }
    }

    /// Drop everything and install the ambient hunger/thirst decay.
    pub fn reset(&mut self, ambient: impl IntoIterator<Item = Effect>) {
        self.active.clear();
        self.active.extend(ambient);
    }

    pub fn push(&mut self, effect: Effect) {
        self.active.push(effect);
    }

    pub fn extend(&mut self, effects: impl IntoIterator<Item = Effect>) {
        self.active.extend(effects);
    }

    pub fn active(&self) -> &[Effect] {
        &self.active
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// One tick of integration: apply every rate, decrement every duration,
    /// then sweep effects whose remaining time reached zero.
    pub fn integrate(&mut self, stats: &mut GameStats, dt: f32) {
        for effect in &mut self.active {
            stats.apply(effect.meter, effect.rate * dt);
            effect.remaining -= dt;
        }
        self.active.retain(|e| e.remaining > 0.0);
    }
}
