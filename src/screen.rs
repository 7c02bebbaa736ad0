//! Title screen session
//!
//! Minimal front door: the game name, the controls, and a prompt. Any start
//! input swaps to the main session; Escape quits the app from here.

use macroquad::input::KeyCode;
use macroquad::math::vec3;

use crate::app::{AppContext, SessionKind, SessionRequest};
use crate::game::components::TextComponent;
use crate::game::transform::Transform;
use crate::game::world::World;
use crate::game::Entity;
use crate::input::{InputId, Inputs};
use crate::render::batch::{queue_texts, SpriteBatch};
use crate::render::viewport::ResizeHandle;

pub struct ScreenSession {
    world: World,
    inputs: Inputs,
    start_input: InputId,
    quit_input: InputId,
    title: Entity,
    hint: Entity,
    resize: Option<ResizeHandle>,
    pub batch: SpriteBatch,
}

impl ScreenSession {
    pub fn new() -> Self {
        let mut world = World::new();
        let root = world.root();

        let title = world.spawn(root, Some("title"));
        world.texts.insert(
            title,
            TextComponent {
                text: "PECKISH".to_string(),
                font_size: 72,
                ..Default::default()
            },
        );
        let hint = world.spawn(root, Some("hint"));
        world.texts.insert(
            hint,
            TextComponent {
                text: "Double-tap UP to eat, DOWN to drink. Press UP to begin.".to_string(),
                font_size: 24,
                ..Default::default()
            },
        );

        let mut inputs = Inputs::new();
        let start_input = inputs.add_input("start");
        inputs.bind_key(start_input, KeyCode::Up);
        inputs.bind_key(start_input, KeyCode::Enter);
        inputs.bind_key(start_input, KeyCode::Space);
        let quit_input = inputs.add_input("quit");
        inputs.bind_key(quit_input, KeyCode::Escape);

        Self {
            world,
            inputs,
            start_input,
            quit_input,
            title,
            hint,
            resize: None,
            batch: SpriteBatch::new(),
        }
    }

    pub fn enter(&mut self, ctx: &mut AppContext) {
        self.resize = Some(ctx.viewport.subscribe());
        self.layout(ctx.viewport.size());
    }

    pub fn exit(&mut self, ctx: &mut AppContext) {
        if let Some(handle) = self.resize.take() {
            ctx.viewport.unsubscribe(handle);
        }
    }

    fn layout(&mut self, (w, h): (f32, f32)) {
        self.world.place(
            self.title,
            Transform::from_position(vec3(w * 0.5 - 160.0, h * 0.35, 0.5)),
        );
        self.world.place(
            self.hint,
            Transform::from_position(vec3(w * 0.5 - 330.0, h * 0.55, 0.5)),
        );
    }

    pub fn tick(&mut self, ctx: &mut AppContext, _dt: f32) -> SessionRequest {
        self.inputs.sync(ctx.keys);
        if self.inputs.just_pressed(self.quit_input) {
            return SessionRequest::Quit;
        }
        if self.inputs.just_pressed(self.start_input) {
            return SessionRequest::Switch(SessionKind::Main);
        }
        SessionRequest::None
    }

    pub fn frame(&mut self, ctx: &mut AppContext, interp: f32, _frame_time_ns: u64) {
        if let Some(handle) = &self.resize {
            if ctx.viewport.take_resized(handle) {
                self.layout(ctx.viewport.size());
            }
        }
        self.world.update_world_transforms();
        self.batch.clear();
        queue_texts(&self.world, interp, &mut self.batch);
    }
}

impl Default for ScreenSession {
    fn default() -> Self {
        Self::new()
    }
}
