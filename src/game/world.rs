//! The entity world
//!
//! Central container for the entity allocator, the rooted transform tree
//! and all component tables. Component types are known at compile time, so
//! tables are plain typed fields rather than any runtime registry.
//!
//! Hierarchy rules: a single root entity exists for the lifetime of the
//! world; every other entity is spawned under a live parent and stays
//! reachable from the root. Despawning removes the whole subtree.

use macroquad::math::Vec3;

use super::component::ComponentTable;
use super::components::{AnimationComponent, SpriteComponent, TextComponent};
use super::entity::{Entity, EntityAllocator};
use super::transform::{Transform, WorldTransform};

pub struct World {
    entities: EntityAllocator,
    root: Entity,

    /// Local pose, authoritative.
    pub transforms: ComponentTable<Transform>,
    /// Derived world pose, refreshed by `update_world_transforms`.
    pub world_transforms: ComponentTable<WorldTransform>,
    /// World pose from the previous propagation pass, for render blending.
    pub prev_world_transforms: ComponentTable<WorldTransform>,

    parents: ComponentTable<Entity>,
    children: ComponentTable<Vec<Entity>>,
    names: ComponentTable<String>,

    pub sprites: ComponentTable<SpriteComponent>,
    pub texts: ComponentTable<TextComponent>,
    pub anims: ComponentTable<AnimationComponent>,
}

impl World {
    pub fn new() -> Self {
        let mut entities = EntityAllocator::new();
        let root = entities.allocate();

        let mut world = Self {
            entities,
            root,
            transforms: ComponentTable::new(),
            world_transforms: ComponentTable::new(),
            prev_world_transforms: ComponentTable::new(),
            parents: ComponentTable::new(),
            children: ComponentTable::new(),
            names: ComponentTable::new(),
            sprites: ComponentTable::new(),
            texts: ComponentTable::new(),
            anims: ComponentTable::new(),
        };
        world.transforms.insert(root, Transform::IDENTITY);
        world.world_transforms.insert(root, WorldTransform::IDENTITY);
        world
            .prev_world_transforms
            .insert(root, WorldTransform::IDENTITY);
        world.names.insert(root, "root".to_string());
        world
    }

    pub fn root(&self) -> Entity {
        self.root
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    pub fn entity_count(&self) -> u32 {
        self.entities.alive_count()
    }

    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.names.get(entity).map(String::as_str)
    }

    // =========================================================================
    // Spawning and hierarchy
    // =========================================================================

    /// Create an entity under `parent`.
    ///
    /// Panics if the parent is dead: orphan nodes are a programmer error,
    /// not a runtime condition.
    pub fn spawn(&mut self, parent: Entity, name: Option<&str>) -> Entity {
        assert!(
            self.entities.is_alive(parent),
            "spawn under dead parent entity"
        );
        let entity = self.entities.allocate();
        self.transforms.insert(entity, Transform::IDENTITY);
        self.parents.insert(entity, parent);
        self.children.add_default(parent).push(entity);
        if let Some(name) = name {
            self.names.insert(entity, name.to_string());
        }

        // Seed both world poses so the first blended frame doesn't sweep
        // the entity in from the origin.
        let world = WorldTransform::compose(
            self.world_transforms.get(parent).unwrap_or(&WorldTransform::IDENTITY),
            &Transform::IDENTITY,
        );
        self.world_transforms.insert(entity, world);
        self.prev_world_transforms.insert(entity, world);
        entity
    }

    /// Despawn an entity and its whole subtree. Root cannot be despawned.
    pub fn despawn(&mut self, entity: Entity) {
        assert!(entity != self.root, "cannot despawn the root entity");
        if !self.entities.is_alive(entity) {
            return;
        }

        // Detach from the parent's child list first.
        if let Some(parent) = self.parents.get(entity).copied() {
            if let Some(siblings) = self.children.get_mut(parent) {
                siblings.retain(|&e| e != entity);
            }
        }

        // Walk the subtree iteratively; children lists are consumed as we go.
        let mut stack = vec![entity];
        while let Some(e) = stack.pop() {
            if let Some(child_list) = self.children.remove(e) {
                stack.extend(child_list);
            }
            self.entities.free(e);
            let idx = e.index();
            self.transforms.clear_slot(idx);
            self.world_transforms.clear_slot(idx);
            self.prev_world_transforms.clear_slot(idx);
            self.parents.clear_slot(idx);
            self.names.clear_slot(idx);
            self.sprites.clear_slot(idx);
            self.texts.clear_slot(idx);
            self.anims.clear_slot(idx);
        }
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.parents.get(entity).copied()
    }

    pub fn children_of(&self, entity: Entity) -> &[Entity] {
        self.children.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Set an entity's local pose. Visible to reads immediately; the world
    /// pose refreshes on the next `update_world_transforms`.
    pub fn place(&mut self, entity: Entity, transform: Transform) {
        debug_assert!(self.entities.is_alive(entity));
        self.transforms.insert(entity, transform);
    }

    pub fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.transforms.get(entity)
    }

    pub fn world_translation(&self, entity: Entity) -> Option<Vec3> {
        self.world_transforms.get(entity).map(|w| w.translation())
    }

    /// Recompute every world transform, parent strictly before children,
    /// starting at the root. Call exactly once per frame, after all
    /// `place()` calls for that frame and before any render pass. The
    /// previous pass's poses are snapshotted for interpolation.
    pub fn update_world_transforms(&mut self) {
        let root_local = *self
            .transforms
            .get(self.root)
            .expect("root entity lost its transform");
        let mut stack = vec![(self.root, WorldTransform::from_local(&root_local))];

        while let Some((entity, world)) = stack.pop() {
            if let Some(old) = self.world_transforms.get(entity).copied() {
                self.prev_world_transforms.insert(entity, old);
            }
            self.world_transforms.insert(entity, world);

            if let Some(child_list) = self.children.get(entity) {
                for &child in child_list {
                    let local = self
                        .transforms
                        .get(child)
                        .copied()
                        .unwrap_or(Transform::IDENTITY);
                    stack.push((child, WorldTransform::compose(&world, &local)));
                }
            }
        }
    }

    // =========================================================================
    // Animation
    // =========================================================================

    /// Advance every animation timer and push the resulting frame into the
    /// entity's sprite tile.
    pub fn update_animations(&mut self, dt: f32) {
        for (idx, anim) in self.anims.iter_mut() {
            anim.elapsed += dt;
            if let Some(sprite) = self.sprites.get_index_mut(idx) {
                sprite.tile_index = anim.first_tile + anim.frame();
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
