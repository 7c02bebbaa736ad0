//! Pooled fly-to tweens
//!
//! Consumption feedback: a sprite entity flying from its queue slot to the
//! consumption point. Slots whose remaining time hit zero are inert and get
//! reused (entity included) by the next `start`, bounding how many moving
//! sprites ever exist.
//!
//! The step re-normalizes against the *remaining* time each frame:
//! `pos += (target - pos) * (dt / remaining)`. Under uneven frame deltas
//! that is not a perfectly uniform-velocity tween, but it converges to the
//! target unconditionally and snaps exactly on the final step. Keep it this
//! way.

use macroquad::math::Vec3;

use super::components::{SheetId, SpriteComponent};
use super::entity::Entity;
use super::transform::Transform;
use super::world::World;

/// Seconds a consumption fly-to takes.
pub const TWEEN_DURATION: f32 = 0.5;

/// One pooled tween. Inert when `remaining <= 0`.
#[derive(Debug, Clone, Copy)]
pub struct TweenSlot {
    pub entity: Entity,
    pub target: Vec3,
    pub remaining: f32,
}

/// The moving-sprite pool.
#[derive(Default)]
pub struct MovingSprites {
    slots: Vec<TweenSlot>,
}

impl MovingSprites {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Begin a fly-to from `from` to `to`, reusing an inert pool slot when
    /// one exists. Returns the sprite entity carrying the animation.
    pub fn start(
        &mut self,
        world: &mut World,
        sheet: SheetId,
        tile_index: u32,
        from: Vec3,
        to: Vec3,
        duration: f32,
    ) -> Entity {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.remaining <= 0.0) {
            slot.target = to;
            slot.remaining = duration;
            world.place(slot.entity, Transform::from_position(from));
            if let Some(sprite) = world.sprites.get_mut(slot.entity) {
                sprite.sheet = sheet;
                sprite.tile_index = tile_index;
                sprite.visible = true;
            }
            return slot.entity;
        }

        let entity = world.spawn(world.root(), Some("moving_sprite"));
        world.place(entity, Transform::from_position(from));
        let mut sprite = SpriteComponent::new(sheet).centered();
        sprite.tile_index = tile_index;
        world.sprites.insert(entity, sprite);
        self.slots.push(TweenSlot {
            entity,
            target: to,
            remaining: duration,
        });
        entity
    }

    /// Advance every live tween by the frame delta. Arrivals snap exactly
    /// onto the target, hide their sprite and leave the slot inert.
    pub fn update(&mut self, world: &mut World, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for slot in &mut self.slots {
            if slot.remaining <= 0.0 {
                continue;
            }
            if dt >= slot.remaining {
                world.place(slot.entity, Transform::from_position(slot.target));
                slot.remaining = 0.0;
                if let Some(sprite) = world.sprites.get_mut(slot.entity) {
                    sprite.visible = false;
                }
            } else {
                let pos = world
                    .transform(slot.entity)
                    .map(|t| t.position)
                    .unwrap_or(slot.target);
                let next = pos + (slot.target - pos) * (dt / slot.remaining);
                world.place(slot.entity, Transform::from_position(next));
                slot.remaining -= dt;
            }
        }
    }

    /// Slots currently animating.
    pub fn live(&self) -> impl Iterator<Item = &TweenSlot> {
        self.slots.iter().filter(|s| s.remaining > 0.0)
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Total pool size, live or inert.
    pub fn pool_size(&self) -> usize {
        self.slots.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec3;

    const SHEET: SheetId = SheetId(0);

    #[test]
    fn any_positive_delta_partition_snaps_exactly_to_target() {
        let target = vec3(100.0, 50.0, 0.5);
        for deltas in [
            vec![0.2, 0.2, 0.2],
            vec![0.5],
            vec![0.13, 0.05, 0.4],
            vec![0.001; 600],
        ] {
            let mut world = World::new();
            let mut tweens = MovingSprites::new();
            let e = tweens.start(&mut world, SHEET, 1, vec3(0.0, 0.0, 0.5), target, 0.5);

            for dt in deltas {
                tweens.update(&mut world, dt);
            }
            let pos = world.transform(e).unwrap().position;
            assert_eq!(pos, target, "must snap exactly, not approximately");
            assert_eq!(tweens.live_count(), 0);
        }
    }

    #[test]
    fn partial_steps_approach_the_target() {
        let mut world = World::new();
        let mut tweens = MovingSprites::new();
        let target = vec3(100.0, 0.0, 0.0);
        let e = tweens.start(&mut world, SHEET, 0, Vec3::ZERO, target, 1.0);

        let mut last_dist = target.length();
        for _ in 0..10 {
            tweens.update(&mut world, 0.05);
            let dist = (target - world.transform(e).unwrap().position).length();
            assert!(dist < last_dist);
            last_dist = dist;
        }
        assert_eq!(tweens.live_count(), 1);
    }

    #[test]
    fn inert_slots_are_reused_entity_and_all() {
        let mut world = World::new();
        let mut tweens = MovingSprites::new();

        let a = tweens.start(&mut world, SHEET, 2, Vec3::ZERO, vec3(10.0, 0.0, 0.0), 0.1);
        tweens.update(&mut world, 0.2); // finishes
        assert!(!world.sprites.get(a).unwrap().visible);

        let b = tweens.start(&mut world, SHEET, 7, vec3(5.0, 5.0, 0.0), vec3(0.0, 0.0, 0.0), 0.1);
        assert_eq!(a, b, "inert slot must be reused");
        assert_eq!(tweens.pool_size(), 1);
        let sprite = world.sprites.get(b).unwrap();
        assert!(sprite.visible);
        assert_eq!(sprite.tile_index, 7);

        // A concurrent tween while the first is live grows the pool.
        let c = tweens.start(&mut world, SHEET, 3, Vec3::ZERO, vec3(1.0, 0.0, 0.0), 0.1);
        assert_ne!(b, c);
        assert_eq!(tweens.pool_size(), 2);
    }
}
