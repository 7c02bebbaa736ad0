//! Sprite sheets
//!
//! A sheet is a texture subdivided into a uniform tile grid; a tile index
//! walks it row-major. Sheets live in the session's `SpriteLibrary` and are
//! referenced by `SheetId` from sprite components — never by texture handle.

use macroquad::math::{Rect, Vec2};
use macroquad::texture::{load_texture, FilterMode, Texture2D};

use crate::game::components::SheetId;

/// A texture with a tile grid.
pub struct SpriteSheet {
    pub texture: Texture2D,
    pub columns: u32,
    pub rows: u32,
}

impl SpriteSheet {
    pub fn new(texture: Texture2D, columns: u32, rows: u32) -> Self {
        assert!(columns > 0 && rows > 0, "degenerate tile grid");
        Self {
            texture,
            columns,
            rows,
        }
    }

    /// Source rectangle of a tile, row-major; out-of-range indices wrap.
    pub fn tile_src(&self, tile_index: u32) -> Rect {
        tile_rect(self.texture.size(), self.columns, self.rows, tile_index)
    }
}

/// Tile grid math, separated from the texture handle so it tests headless.
pub(crate) fn tile_rect(sheet_size: Vec2, columns: u32, rows: u32, tile_index: u32) -> Rect {
    let tile = tile_index % (columns * rows);
    let size = Vec2::new(sheet_size.x / columns as f32, sheet_size.y / rows as f32);
    let col = tile % columns;
    let row = tile / columns;
    Rect::new(col as f32 * size.x, row as f32 * size.y, size.x, size.y)
}

/// Owns every loaded sheet; hands out ids.
#[derive(Default)]
pub struct SpriteLibrary {
    sheets: Vec<SpriteSheet>,
}

impl SpriteLibrary {
    pub fn new() -> Self {
        Self { sheets: Vec::new() }
    }

    pub fn insert(&mut self, sheet: SpriteSheet) -> SheetId {
        self.sheets.push(sheet);
        SheetId(self.sheets.len() - 1)
    }

    pub fn get(&self, id: SheetId) -> Option<&SpriteSheet> {
        self.sheets.get(id.0)
    }

    /// Load a texture by filename with the given filter and wrap it as a
    /// sheet. A missing texture is logged and replaced with a blank white
    /// pixel: the game keeps running on placeholder art.
    pub async fn load_sheet(
        &mut self,
        path: &str,
        filter: FilterMode,
        columns: u32,
        rows: u32,
    ) -> SheetId {
        let texture = match load_texture(path).await {
            Ok(texture) => {
                texture.set_filter(filter);
                texture
            }
            Err(e) => {
                eprintln!("Failed to load texture \"{}\": {}", path, e);
                Texture2D::from_rgba8(1, 1, &[255, 255, 255, 255])
            }
        };
        self.insert(SpriteSheet::new(texture, columns, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    #[test]
    fn tiles_walk_the_grid_row_major() {
        // The foods sheet layout: 8 columns x 4 rows.
        let size = vec2(256.0, 128.0);
        let first = tile_rect(size, 8, 4, 0);
        assert_eq!((first.x, first.y, first.w, first.h), (0.0, 0.0, 32.0, 32.0));

        let second = tile_rect(size, 8, 4, 1);
        assert_eq!((second.x, second.y), (32.0, 0.0));

        let second_row = tile_rect(size, 8, 4, 8);
        assert_eq!((second_row.x, second_row.y), (0.0, 32.0));

        let last = tile_rect(size, 8, 4, 31);
        assert_eq!((last.x, last.y), (224.0, 96.0));
    }

    #[test]
    fn out_of_range_tiles_wrap() {
        let size = vec2(64.0, 64.0);
        let wrapped = tile_rect(size, 2, 2, 5);
        let direct = tile_rect(size, 2, 2, 1);
        assert_eq!((wrapped.x, wrapped.y), (direct.x, direct.y));
    }
}
