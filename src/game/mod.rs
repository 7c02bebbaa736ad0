//! Simulation core
//!
//! An ECS-lite foundation: generational entity ids, sparse per-kind
//! component tables, and a rooted transform tree, driven by the fixed-tick
//! loop. On top of it sit the stat simulation (meters + timed effects), the
//! consumable queues with their double-tap gesture, and the pooled fly-to
//! tweens.
//!
//! Everything in here is platform-free and runs headless in tests; the
//! render passes that turn tables into draw calls live in `render`.

// The ECS foundation keeps its full API even where the game only needs part
// of it yet.
#![allow(dead_code)]

pub mod component;
pub mod components;
pub mod effects;
pub mod entity;
pub mod foodstuff;
pub mod queue;
pub mod stats;
pub mod transform;
pub mod tween;
pub mod world;

pub use entity::Entity;
pub use stats::{GameStats, Meter, Phase};
pub use transform::{Transform, WorldTransform};
pub use world::World;
