//! Application driver
//!
//! Owns the interpolated loop and the current session, dispatching Tick and
//! Frame events into it until something asks to quit. Sessions are a tagged
//! variant with explicit enter/tick/frame/exit, swapped on request — no
//! virtual dispatch, no ambient globals: everything a session may touch
//! arrives through `AppContext`.

use std::path::PathBuf;

use macroquad::camera::{set_camera, set_default_camera};
use macroquad::color::Color;
use macroquad::text::Font;
use macroquad::time::get_time;
use macroquad::window::{clear_background, next_frame, screen_height, screen_width};

use crate::input::{KeySource, MacroquadKeys};
use crate::render::camera::ortho_camera;
use crate::render::sheets::SpriteLibrary;
use crate::render::viewport::Viewport;
use crate::screen::ScreenSession;
use crate::session::{MainSession, SessionSheets};
use crate::timing::{InterpLoop, LoopConfig, LoopEvent};

const CLEAR_COLOR: Color = Color::new(0.06, 0.07, 0.1, 1.0);

/// Everything loaded at startup that sessions draw with.
pub struct Assets {
    pub library: SpriteLibrary,
    pub sheets: SessionSheets,
    pub font: Option<Font>,
}

/// Explicit context handed into session operations.
pub struct AppContext<'a> {
    pub viewport: &'a mut Viewport,
    pub keys: &'a dyn KeySource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    Screen,
    Main,
}

/// What a session's tick asked the driver to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequest {
    None,
    Switch(SessionKind),
    Quit,
}

/// The current session, dispatched by tag.
pub enum Session {
    Screen(ScreenSession),
    Main(MainSession),
}

impl Session {
    fn enter(&mut self, ctx: &mut AppContext) {
        match self {
            Session::Screen(s) => s.enter(ctx),
            Session::Main(s) => s.enter(ctx),
        }
    }

    fn exit(&mut self, ctx: &mut AppContext) {
        match self {
            Session::Screen(s) => s.exit(ctx),
            Session::Main(s) => s.exit(ctx),
        }
    }

    fn tick(&mut self, ctx: &mut AppContext, dt: f32) -> SessionRequest {
        match self {
            Session::Screen(s) => s.tick(ctx, dt),
            Session::Main(s) => s.tick(ctx, dt),
        }
    }

    fn frame(&mut self, ctx: &mut AppContext, interp: f32, frame_time_ns: u64) {
        match self {
            Session::Screen(s) => s.frame(ctx, interp, frame_time_ns),
            Session::Main(s) => s.frame(ctx, interp, frame_time_ns),
        }
    }

    fn render(&mut self, assets: &Assets) {
        let batch = match self {
            Session::Screen(s) => &mut s.batch,
            Session::Main(s) => &mut s.batch,
        };
        batch.render(&assets.library, assets.font.as_ref());
    }
}

pub struct App {
    assets: Assets,
    data_dir: PathBuf,
}

impl App {
    pub fn new(assets: Assets, data_dir: PathBuf) -> Self {
        Self { assets, data_dir }
    }

    /// Drive the loop until a session requests quit (or the window closes,
    /// which tears the whole process down through the platform layer).
    pub async fn run(self, viewport: &mut Viewport) {
        let App { assets, data_dir } = self;
        let keys = MacroquadKeys;

        let mut game_loop = InterpLoop::new(LoopConfig::sixty_hz());
        let mut session = Session::Screen(ScreenSession::new());
        session.enter(&mut AppContext {
            viewport: &mut *viewport,
            keys: &keys,
        });
        game_loop.start();

        let mut running = true;
        let mut fps_count = 0u32;
        let mut fps_time = get_time();

        while running {
            match game_loop.next_event() {
                LoopEvent::Tick => {
                    let request = session.tick(
                        &mut AppContext {
                            viewport: &mut *viewport,
                            keys: &keys,
                        },
                        game_loop.tick_seconds(),
                    );
                    match request {
                        SessionRequest::None => {}
                        SessionRequest::Quit => running = false,
                        SessionRequest::Switch(kind) => {
                            session.exit(&mut AppContext {
                                viewport: &mut *viewport,
                                keys: &keys,
                            });
                            session = match kind {
                                SessionKind::Screen => Session::Screen(ScreenSession::new()),
                                SessionKind::Main => Session::Main(MainSession::new(
                                    assets.sheets,
                                    data_dir.clone(),
                                )),
                            };
                            session.enter(&mut AppContext {
                                viewport: &mut *viewport,
                                keys: &keys,
                            });
                        }
                    }
                }
                LoopEvent::Frame => {
                    viewport.poll(screen_width(), screen_height());
                    session.frame(
                        &mut AppContext {
                            viewport: &mut *viewport,
                            keys: &keys,
                        },
                        game_loop.frame_interp(),
                        game_loop.frame_time(),
                    );

                    clear_background(CLEAR_COLOR);
                    set_camera(&ortho_camera(viewport));
                    session.render(&assets);
                    set_default_camera();
                    next_frame().await;

                    fps_count += 1;
                    if fps_count == 60 {
                        let now = get_time();
                        println!("Fps: {:.1}", 60.0 / (now - fps_time));
                        fps_time = now;
                        fps_count = 0;
                    }
                }
            }
        }
        game_loop.stop();
    }
}
