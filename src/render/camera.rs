//! Orthographic camera
//!
//! World space is screen pixels, origin top-left, y down, z as draw depth.
//! The camera maps that box onto the window; re-derive it whenever the
//! viewport resizes.

use macroquad::camera::Camera2D;
use macroquad::math::vec2;

use super::viewport::Viewport;

/// Pixel-space orthographic camera covering the whole viewport.
pub fn ortho_camera(viewport: &Viewport) -> Camera2D {
    let (w, h) = viewport.size();
    Camera2D {
        // Negative y zoom keeps the world y-down like the platform's
        // default screen space.
        zoom: vec2(2.0 / w, -2.0 / h),
        target: vec2(w / 2.0, h / 2.0),
        ..Default::default()
    }
}
