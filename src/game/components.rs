//! Renderable component records
//!
//! Plain data attached to entities through the sparse tables. Behavior
//! lives in the render passes and in `World::update_animations`; nothing in
//! here touches the GPU. Sprites reference their sheet by id, re-resolved
//! through the sprite library at draw time.

use macroquad::color::{Color, WHITE};
use macroquad::math::{vec2, Vec2};

/// Identity of a sprite sheet in the session's sprite library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetId(pub usize);

/// Normalized sub-rectangle of a tile, in [0, 1]² of the tile's extent.
/// Meter bars shrink their view to the filled fraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ViewRect {
    pub const FULL: ViewRect = ViewRect {
        x: 0.0,
        y: 0.0,
        w: 1.0,
        h: 1.0,
    };

    /// The bottom `fraction` of the tile (bar fill, growing upward).
    pub fn bottom_fraction(fraction: f32) -> Self {
        let f = fraction.clamp(0.0, 1.0);
        ViewRect {
            x: 0.0,
            y: 1.0 - f,
            w: 1.0,
            h: f,
        }
    }
}

/// A tile of a sprite sheet drawn at the entity's world transform.
#[derive(Debug, Clone, Copy)]
pub struct SpriteComponent {
    pub sheet: SheetId,
    pub tile_index: u32,
    /// Anchor point within the drawn rect, (0,0) top-left to (1,1) bottom-right.
    pub anchor: Vec2,
    pub view: ViewRect,
    pub color: Color,
    pub visible: bool,
}

impl SpriteComponent {
    pub fn new(sheet: SheetId) -> Self {
        Self {
            sheet,
            tile_index: 0,
            anchor: Vec2::ZERO,
            view: ViewRect::FULL,
            color: WHITE,
            visible: true,
        }
    }

    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn centered(self) -> Self {
        self.with_anchor(vec2(0.5, 0.5))
    }
}

/// A text string drawn at the entity's world transform. The font itself is
/// session-owned and resolved at draw time.
#[derive(Debug, Clone)]
pub struct TextComponent {
    pub text: String,
    pub font_size: u16,
    pub color: Color,
}

impl Default for TextComponent {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size: 23,
            color: WHITE,
        }
    }
}

/// Per-entity animation timer driving the sprite's tile index.
#[derive(Debug, Clone, Copy)]
pub struct AnimationComponent {
    pub first_tile: u32,
    pub frame_count: u32,
    /// Seconds per frame.
    pub frame_time: f32,
    pub elapsed: f32,
    pub looping: bool,
}

impl AnimationComponent {
    /// Current frame offset from `first_tile`.
    pub fn frame(&self) -> u32 {
        if self.frame_count <= 1 || self.frame_time <= 0.0 {
            return 0;
        }
        let raw = (self.elapsed / self.frame_time) as u32;
        if self.looping {
            raw % self.frame_count
        } else {
            raw.min(self.frame_count - 1)
        }
    }
}

impl Default for AnimationComponent {
    fn default() -> Self {
        Self {
            first_tile: 0,
            frame_count: 1,
            frame_time: 0.25,
            elapsed: 0.0,
            looping: true,
        }
    }
}
