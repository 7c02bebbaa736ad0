//! Draw-op batching and the table render passes
//!
//! Render passes walk their component table, blend each entity's previous
//! and current world translation by the loop's interpolation fraction, and
//! push plain draw ops into the batch. The batch depth-sorts everything and
//! issues the platform draw calls at a single site — tables never touch the
//! GPU themselves.

use macroquad::color::Color;
use macroquad::math::{Rect, Vec2, Vec3};
use macroquad::text::{draw_text_ex, Font, TextParams};
use macroquad::texture::{draw_texture_ex, DrawTextureParams};

use crate::game::components::{SheetId, ViewRect};
use crate::game::transform::WorldTransform;
use crate::game::world::World;

use super::sheets::SpriteLibrary;

/// One sprite tile to draw.
#[derive(Debug, Clone, Copy)]
pub struct SpriteOp {
    pub sheet: SheetId,
    pub tile_index: u32,
    pub view: ViewRect,
    /// Blended world position; z is draw depth.
    pub position: Vec3,
    pub scale: Vec2,
    pub rotation: f32,
    pub anchor: Vec2,
    pub color: Color,
}

/// One text string to draw.
#[derive(Debug, Clone)]
pub struct TextOp {
    pub text: String,
    pub position: Vec3,
    pub font_size: u16,
    pub color: Color,
}

/// Per-frame collection of draw ops.
#[derive(Default)]
pub struct SpriteBatch {
    sprites: Vec<SpriteOp>,
    texts: Vec<TextOp>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the previous frame's ops.
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.texts.clear();
    }

    pub fn push_sprite(&mut self, op: SpriteOp) {
        self.sprites.push(op);
    }

    pub fn push_text(&mut self, op: TextOp) {
        self.texts.push(op);
    }

    pub fn sprite_ops(&self) -> &[SpriteOp] {
        &self.sprites
    }

    pub fn text_ops(&self) -> &[TextOp] {
        &self.texts
    }

    /// Issue every queued op, back to front, sprites under text.
    pub fn render(&mut self, library: &SpriteLibrary, font: Option<&Font>) {
        self.sprites
            .sort_by(|a, b| a.position.z.total_cmp(&b.position.z));
        for op in &self.sprites {
            let Some(sheet) = library.get(op.sheet) else {
                continue;
            };
            let tile = sheet.tile_src(op.tile_index);
            let (top_left, dest) = place_op(op, tile);
            let src = Rect::new(
                tile.x + op.view.x * tile.w,
                tile.y + op.view.y * tile.h,
                tile.w * op.view.w,
                tile.h * op.view.h,
            );
            draw_texture_ex(
                &sheet.texture,
                top_left.x,
                top_left.y,
                op.color,
                DrawTextureParams {
                    dest_size: Some(dest),
                    source: Some(src),
                    rotation: op.rotation,
                    ..Default::default()
                },
            );
        }

        self.texts
            .sort_by(|a, b| a.position.z.total_cmp(&b.position.z));
        for op in &self.texts {
            draw_text_ex(
                &op.text,
                op.position.x,
                op.position.y,
                TextParams {
                    font,
                    font_size: op.font_size,
                    color: op.color,
                    ..Default::default()
                },
            );
        }
    }
}

/// Destination placement for a sprite op: top-left corner and size of the
/// drawn rect, after view cropping, scaling and anchoring.
fn place_op(op: &SpriteOp, tile: Rect) -> (Vec2, Vec2) {
    let dest = Vec2::new(
        tile.w * op.view.w * op.scale.x,
        tile.h * op.view.h * op.scale.y,
    );
    let top_left = Vec2::new(
        op.position.x - dest.x * op.anchor.x,
        op.position.y - dest.y * op.anchor.y,
    );
    (top_left, dest)
}

// =============================================================================
// Table render passes
// =============================================================================

/// Queue every visible sprite, blending previous/current world translation
/// by `interp`. Call after `World::update_world_transforms`.
pub fn queue_sprites(world: &World, interp: f32, batch: &mut SpriteBatch) {
    for (idx, sprite) in world.sprites.iter() {
        if !sprite.visible {
            continue;
        }
        let Some(curr) = world.world_transforms.get_index(idx) else {
            continue;
        };
        let prev = world.prev_world_transforms.get_index(idx).unwrap_or(curr);
        batch.push_sprite(SpriteOp {
            sheet: sprite.sheet,
            tile_index: sprite.tile_index,
            view: sprite.view,
            position: WorldTransform::lerp_translation(prev, curr, interp),
            scale: curr.scale(),
            rotation: curr.rotation(),
            anchor: sprite.anchor,
            color: sprite.color,
        });
    }
}

/// Queue every text component at its blended world position.
pub fn queue_texts(world: &World, interp: f32, batch: &mut SpriteBatch) {
    for (idx, text) in world.texts.iter() {
        if text.text.is_empty() {
            continue;
        }
        let Some(curr) = world.world_transforms.get_index(idx) else {
            continue;
        };
        let prev = world.prev_world_transforms.get_index(idx).unwrap_or(curr);
        batch.push_text(TextOp {
            text: text.text.clone(),
            position: WorldTransform::lerp_translation(prev, curr, interp),
            font_size: text.font_size,
            color: text.color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::{SpriteComponent, TextComponent};
    use crate::game::transform::Transform;
    use macroquad::math::{vec2, vec3};

    #[test]
    fn sprite_pass_blends_by_the_interp_fraction() {
        let mut world = World::new();
        let e = world.spawn(world.root(), None);
        world.sprites.insert(e, SpriteComponent::new(SheetId(0)));

        world.place(e, Transform::from_position(vec3(0.0, 0.0, 0.0)));
        world.update_world_transforms();
        world.place(e, Transform::from_position(vec3(100.0, 0.0, 0.0)));
        world.update_world_transforms();

        let mut batch = SpriteBatch::new();
        queue_sprites(&world, 0.25, &mut batch);
        assert_eq!(batch.sprite_ops().len(), 1);
        assert!((batch.sprite_ops()[0].position.x - 25.0).abs() < 1e-4);
    }

    #[test]
    fn hidden_sprites_and_empty_texts_are_skipped() {
        let mut world = World::new();
        let a = world.spawn(world.root(), None);
        let mut sprite = SpriteComponent::new(SheetId(0));
        sprite.visible = false;
        world.sprites.insert(a, sprite);
        world.texts.insert(a, TextComponent::default());
        world.update_world_transforms();

        let mut batch = SpriteBatch::new();
        queue_sprites(&world, 0.0, &mut batch);
        queue_texts(&world, 0.0, &mut batch);
        assert!(batch.sprite_ops().is_empty());
        assert!(batch.text_ops().is_empty());
    }

    #[test]
    fn anchoring_and_view_cropping_place_the_dest_rect() {
        let op = SpriteOp {
            sheet: SheetId(0),
            tile_index: 0,
            view: ViewRect::bottom_fraction(0.5),
            position: vec3(100.0, 100.0, 0.0),
            scale: vec2(2.0, 2.0),
            rotation: 0.0,
            anchor: vec2(0.5, 1.0),
            color: macroquad::color::WHITE,
        };
        let tile = Rect::new(0.0, 0.0, 32.0, 32.0);
        let (top_left, dest) = place_op(&op, tile);
        // Half the tile height, doubled: 32 px tall, 64 wide.
        assert_eq!(dest, vec2(64.0, 32.0));
        // Anchored bottom-center at (100, 100).
        assert_eq!(top_left, vec2(68.0, 68.0));
    }

    #[test]
    fn batch_clear_drops_previous_frame() {
        let mut batch = SpriteBatch::new();
        batch.push_text(TextOp {
            text: "hello".to_string(),
            position: vec3(0.0, 0.0, 0.0),
            font_size: 23,
            color: macroquad::color::WHITE,
        });
        batch.clear();
        assert!(batch.text_ops().is_empty());
    }
}
