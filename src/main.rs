//! Peckish: keep a growing critter fed and watered
//!
//! A fixed-tick simulation behind a variable-rate renderer: hunger, thirst
//! and growth tick away deterministically while frames blend between steps.
//! Double-tap the arrow keys to feed the creature from the two scrolling
//! queues before its meters run dry.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod config;
mod game;
mod input;
mod render;
mod screen;
mod session;
mod timing;

use macroquad::prelude::*;

use app::{App, Assets};
use render::{SpriteLibrary, Viewport};
use session::SessionSheets;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Peckish v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Crash logging first, before anything can panic.
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    let data_dir = config::data_dir();
    println!("Data directory: {}", data_dir.display());

    macroquad::rand::srand(miniquad::date::now() as u64);

    let asset_path = |file: &str| data_dir.join(file).to_string_lossy().into_owned();

    let font = match load_ttf_font(&asset_path("fonts/8bit_operator.ttf")).await {
        Ok(font) => Some(font),
        Err(e) => {
            println!("Failed to load font: {}, falling back to built-in", e);
            None
        }
    };

    let mut library = SpriteLibrary::new();
    let character = library
        .load_sheet(&asset_path("character.png"), FilterMode::Linear, 3, 1)
        .await;
    let food_bar = library
        .load_sheet(&asset_path("food_bar.png"), FilterMode::Linear, 1, 1)
        .await;
    let water_bar = library
        .load_sheet(&asset_path("water_bar.png"), FilterMode::Linear, 1, 1)
        .await;
    let bar_bg = library
        .load_sheet(&asset_path("bar_bg.png"), FilterMode::Linear, 1, 1)
        .await;
    let foods = library
        .load_sheet(&asset_path("foods.png"), FilterMode::Linear, 8, 4)
        .await;

    let assets = Assets {
        library,
        sheets: SessionSheets {
            character,
            food_bar,
            water_bar,
            bar_bg,
            foods,
        },
        font,
    };

    let mut viewport = Viewport::new(screen_width(), screen_height());
    App::new(assets, data_dir).run(&mut viewport).await;

    println!("Stopping game...");
}
