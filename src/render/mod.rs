//! Presentation layer
//!
//! Everything that turns simulation state into platform draw calls:
//! viewport/resize tracking, the orthographic camera, sprite sheet loading,
//! and the draw-op batch the component-table render passes fill each frame.
//! The simulation core never imports from here.

pub mod batch;
pub mod camera;
pub mod sheets;
pub mod viewport;

pub use batch::{queue_sprites, queue_texts, SpriteBatch};
pub use camera::ortho_camera;
pub use sheets::{SpriteLibrary, SpriteSheet};
pub use viewport::{ResizeHandle, Viewport};
