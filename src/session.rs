//! The main game session
//!
//! Owns the whole live game: the entity world, the active effects, the two
//! consumable queues with their gestures, the tween pool and the narrative
//! clock. `tick` runs the fixed-step simulation, `frame` refreshes visual
//! placement and fills the draw batch.

use std::path::PathBuf;

use macroquad::input::KeyCode;
use macroquad::math::{vec2, vec3, Vec2, Vec3};
use macroquad::rand;

use crate::app::{AppContext, SessionKind, SessionRequest};
use crate::config::food::load_food_lists;
use crate::config::narrative::{Narrative, DAY_LENGTH, MSG_DELAY};
use crate::game::components::{
    AnimationComponent, SheetId, SpriteComponent, TextComponent, ViewRect,
};
use crate::game::effects::{Effect, EffectEngine};
use crate::game::foodstuff::Foodstuff;
use crate::game::queue::{
    ConsumeTrigger, DoubleTap, FoodQueue, DOUBLE_TAP_WINDOW, QUEUE_DISPLAY_SLOTS, QUEUE_TARGET_LEN,
};
use crate::game::stats::{GameStats, GrowthStage, Meter, MAX_DRINK, MAX_FOOD, START_GROWTH};
use crate::game::transform::Transform;
use crate::game::tween::{MovingSprites, TWEEN_DURATION};
use crate::game::world::World;
use crate::game::Entity;
use crate::input::{InputId, Inputs};
use crate::render::batch::{queue_sprites, queue_texts, SpriteBatch};
use crate::render::viewport::ResizeHandle;
use crate::timing::clock::ONE_SEC_NS;

/// Natural hunger, units per second.
const AMBIENT_FOOD_RATE: f32 = -4.0;
/// Natural thirst, units per second.
const AMBIENT_DRINK_RATE: f32 = -20.0;
/// Vertical spacing between queue slots, pixels.
const STACK_OFFSET: f32 = 40.0;
/// Blank tile on the foods sheet, shown past the queue's end.
const EMPTY_TILE: u32 = 31;

const FOOD_CONFIG: &str = "food.json";
const MOTD_CONFIG: &str = "motd.json";

/// Sheet ids the session draws with, resolved by the loader at startup.
#[derive(Debug, Clone, Copy)]
pub struct SessionSheets {
    pub character: SheetId,
    pub food_bar: SheetId,
    pub water_bar: SheetId,
    pub bar_bg: SheetId,
    pub foods: SheetId,
}

pub struct MainSession {
    pub world: World,
    pub inputs: Inputs,
    sheets: SessionSheets,
    data_dir: PathBuf,
    resize: Option<ResizeHandle>,

    // Entities
    character: Entity,
    journal: Entity,
    overlay: Entity,
    food_bar: Entity,
    water_bar: Entity,
    food_bar_bg: Entity,
    water_bar_bg: Entity,
    food_slots: Vec<Entity>,
    drink_slots: Vec<Entity>,

    // Inputs
    eat_input: InputId,
    drink_input: InputId,
    debug_input: InputId,
    back_input: InputId,

    // Simulation
    pub stats: GameStats,
    pub effects: EffectEngine,
    pub food_list: Vec<Foodstuff>,
    pub drink_list: Vec<Foodstuff>,
    pub food_queue: FoodQueue,
    pub drink_queue: FoodQueue,
    pub eat_tap: DoubleTap,
    pub drink_tap: DoubleTap,
    pub tweens: MovingSprites,

    // Narrative clock
    pub narrative: Narrative,
    pub day: usize,
    pub time_of_day: f32,

    // Layout
    pub consume_point: Vec3,
    char_pos: Vec3,
    food_base: Vec2,
    drink_base: Vec2,

    last_frame_time: Option<u64>,
    pub batch: SpriteBatch,
}

impl MainSession {
    pub fn new(sheets: SessionSheets, data_dir: PathBuf) -> Self {
        let mut world = World::new();
        let root = world.root();

        let character = world.spawn(root, Some("character"));
        world.sprites.insert(
            character,
            SpriteComponent::new(sheets.character).with_anchor(vec2(0.5, 1.0)),
        );
        world.anims.insert(
            character,
            AnimationComponent {
                first_tile: 1,
                frame_count: 1,
                ..Default::default()
            },
        );

        let food_bar = world.spawn(root, Some("food_bar"));
        world.sprites.insert(
            food_bar,
            SpriteComponent::new(sheets.food_bar).with_anchor(vec2(0.5, 1.0)),
        );
        let water_bar = world.spawn(root, Some("water_bar"));
        world.sprites.insert(
            water_bar,
            SpriteComponent::new(sheets.water_bar).with_anchor(vec2(0.5, 1.0)),
        );
        let mut spawn_bar_bg = |world: &mut World, name: &str| {
            let bg = world.spawn(root, Some(name));
            world.sprites.insert(
                bg,
                SpriteComponent::new(sheets.bar_bg).with_anchor(vec2(0.5, 1.0)),
            );
            bg
        };
        let food_bar_bg = spawn_bar_bg(&mut world, "food_bar_bg");
        let water_bar_bg = spawn_bar_bg(&mut world, "water_bar_bg");

        let mut spawn_slots = |world: &mut World, prefix: &str| {
            (0..QUEUE_DISPLAY_SLOTS)
                .map(|i| {
                    let slot = world.spawn(root, Some(&format!("{prefix}{i}")));
                    let mut sprite = SpriteComponent::new(sheets.foods).centered();
                    sprite.tile_index = EMPTY_TILE;
                    world.sprites.insert(slot, sprite);
                    slot
                })
                .collect::<Vec<_>>()
        };
        let food_slots = spawn_slots(&mut world, "food_slot");
        let drink_slots = spawn_slots(&mut world, "drink_slot");

        let journal = world.spawn(root, Some("journal"));
        world.texts.insert(journal, TextComponent::default());
        let overlay = world.spawn(root, Some("overlay"));
        world.texts.insert(
            overlay,
            TextComponent {
                font_size: 32,
                ..Default::default()
            },
        );

        let mut inputs = Inputs::new();
        let eat_input = inputs.add_input("eat");
        inputs.bind_key(eat_input, KeyCode::Up);
        let drink_input = inputs.add_input("drink");
        inputs.bind_key(drink_input, KeyCode::Down);
        let debug_input = inputs.add_input("debug");
        inputs.bind_key(debug_input, KeyCode::F1);
        let back_input = inputs.add_input("back");
        inputs.bind_key(back_input, KeyCode::Escape);

        Self {
            world,
            inputs,
            sheets,
            data_dir,
            resize: None,
            character,
            journal,
            overlay,
            food_bar,
            water_bar,
            food_bar_bg,
            water_bar_bg,
            food_slots,
            drink_slots,
            eat_input,
            drink_input,
            debug_input,
            back_input,
            stats: GameStats::new_game(),
            effects: EffectEngine::new(),
            food_list: Vec::new(),
            drink_list: Vec::new(),
            food_queue: FoodQueue::new(QUEUE_TARGET_LEN),
            drink_queue: FoodQueue::new(QUEUE_TARGET_LEN),
            eat_tap: DoubleTap::new(DOUBLE_TAP_WINDOW),
            drink_tap: DoubleTap::new(DOUBLE_TAP_WINDOW),
            tweens: MovingSprites::new(),
            narrative: Narrative::empty(),
            day: 0,
            time_of_day: 0.0,
            consume_point: Vec3::ZERO,
            char_pos: Vec3::ZERO,
            food_base: Vec2::ZERO,
            drink_base: Vec2::ZERO,
            last_frame_time: None,
            batch: SpriteBatch::new(),
        }
    }

    pub fn enter(&mut self, ctx: &mut AppContext) {
        self.resize = Some(ctx.viewport.subscribe());
        self.layout(ctx.viewport.size());
        self.start_game();
    }

    pub fn exit(&mut self, ctx: &mut AppContext) {
        if let Some(handle) = self.resize.take() {
            ctx.viewport.unsubscribe(handle);
        }
    }

    /// Reset everything to a fresh game: full meters, reloaded config,
    /// reseeded queues, ambient decay installed.
    pub fn start_game(&mut self) {
        self.stats = GameStats::new_game();
        self.eat_tap.reset();
        self.drink_tap.reset();
        self.day = 0;
        self.time_of_day = 0.0;

        let food_path = self.data_dir.join(FOOD_CONFIG);
        if let Err(e) = load_food_lists(&food_path, &mut self.food_list, &mut self.drink_list) {
            eprintln!(
                "Error while loading \"{}\": {} (continuing with {} foods, {} drinks)",
                food_path.display(),
                e,
                self.food_list.len(),
                self.drink_list.len()
            );
        }
        self.narrative = Narrative::load(&self.data_dir.join(MOTD_CONFIG));
        println!(
            "Starting game: {} foods, {} drinks, {} narrative days",
            self.food_list.len(),
            self.drink_list.len(),
            self.narrative.day_count()
        );

        let food_list = &self.food_list;
        self.food_queue.refill(|| draw_uniform(food_list));
        let drink_list = &self.drink_list;
        self.drink_queue.refill(|| draw_uniform(drink_list));

        self.effects.reset([
            Effect::ambient(Meter::Food, AMBIENT_FOOD_RATE),
            Effect::ambient(Meter::Drink, AMBIENT_DRINK_RATE),
        ]);
    }

    /// Derive the screen layout from the viewport size.
    fn layout(&mut self, (w, h): (f32, f32)) {
        self.char_pos = vec3(w * 0.5, h * 0.82, 0.2);
        self.consume_point = vec3(w * 0.5, h * 0.7, 0.6);
        self.food_base = vec2(w * 0.125, h * 0.2);
        self.drink_base = vec2(w * 0.875, h * 0.2);

        let bar_baseline = h * 0.72;
        self.world.place(
            self.food_bar,
            Transform::from_position(vec3(w * 0.25, bar_baseline, 0.5)),
        );
        self.world.place(
            self.water_bar,
            Transform::from_position(vec3(w * 0.75, bar_baseline, 0.5)),
        );
        // Bar backgrounds sit just behind their bars.
        self.world.place(
            self.food_bar_bg,
            Transform::from_position(vec3(w * 0.25, bar_baseline, 0.4)),
        );
        self.world.place(
            self.water_bar_bg,
            Transform::from_position(vec3(w * 0.75, bar_baseline, 0.4)),
        );
        self.world.place(
            self.journal,
            Transform::from_position(vec3(w * 0.25, h * 0.08, 0.9)),
        );
        self.world.place(
            self.overlay,
            Transform::from_position(vec3(w * 0.5 - 180.0, h * 0.45, 0.95)),
        );
    }

    /// One fixed simulation step.
    pub fn tick(&mut self, ctx: &mut AppContext, dt: f32) -> SessionRequest {
        self.inputs.sync(ctx.keys);

        if self.inputs.just_pressed(self.back_input) {
            return SessionRequest::Switch(SessionKind::Screen);
        }
        if self.inputs.just_pressed(self.debug_input) {
            self.start_game();
        }
        if self.stats.is_dead() {
            return SessionRequest::None;
        }

        self.effects.integrate(&mut self.stats, dt);

        let eat_pressed = self.inputs.just_pressed(self.eat_input);
        if self
            .eat_tap
            .update(eat_pressed, self.stats.below_max(Meter::Food), dt)
            != ConsumeTrigger::None
        {
            self.consume(Meter::Food);
        }

        let drink_pressed = self.inputs.just_pressed(self.drink_input);
        if self
            .drink_tap
            .update(drink_pressed, self.stats.below_max(Meter::Drink), dt)
            != ConsumeTrigger::None
        {
            self.consume(Meter::Drink);
        }

        self.time_of_day += dt;
        while self.time_of_day >= DAY_LENGTH {
            self.time_of_day -= DAY_LENGTH;
            self.day += 1;
        }

        self.stats.check_death();
        SessionRequest::None
    }

    /// Consume the front of a queue: apply its effects, refill the queue,
    /// and fly its tile to the consumption point.
    fn consume(&mut self, kind: Meter) {
        let popped = match kind {
            Meter::Food => {
                let list = &self.food_list;
                self.food_queue.consume_front(|| draw_uniform(list))
            }
            Meter::Drink => {
                let list = &self.drink_list;
                self.drink_queue.consume_front(|| draw_uniform(list))
            }
            Meter::Growth => None,
        };
        let Some(item) = popped else {
            return;
        };

        self.effects.extend(item.instantiate());

        let slot = match kind {
            Meter::Drink => self.drink_slots[0],
            _ => self.food_slots[0],
        };
        let from = self
            .world
            .transform(slot)
            .map(|t| t.position)
            .unwrap_or(self.consume_point);
        self.tweens.start(
            &mut self.world,
            self.sheets.foods,
            item.tile_index,
            from,
            self.consume_point,
            TWEEN_DURATION,
        );
    }

    /// One presentation step: visual placement, tween advance, transform
    /// propagation, batch fill. No platform calls; `render` issues those.
    pub fn frame(&mut self, ctx: &mut AppContext, interp: f32, frame_time_ns: u64) {
        let fd = match self.last_frame_time {
            Some(last) => (frame_time_ns.saturating_sub(last)) as f32 / ONE_SEC_NS as f32,
            None => 0.0,
        };
        self.last_frame_time = Some(frame_time_ns);

        if let Some(handle) = &self.resize {
            if ctx.viewport.take_resized(handle) {
                self.layout(ctx.viewport.size());
            }
        }

        // Creature: scale with size, tile with growth stage.
        let scale = (self.stats.size / START_GROWTH).max(0.0);
        self.world.place(
            self.character,
            Transform::from_position_scale(self.char_pos, vec2(scale, scale)),
        );
        if let Some(anim) = self.world.anims.get_mut(self.character) {
            anim.first_tile = match self.stats.growth_stage() {
                GrowthStage::Tiny => 0,
                GrowthStage::Normal => 1,
                GrowthStage::Huge => 2,
            };
        }

        // Meter bars crop to the filled fraction.
        if let Some(sprite) = self.world.sprites.get_mut(self.food_bar) {
            sprite.view = ViewRect::bottom_fraction(self.stats.food / MAX_FOOD);
        }
        if let Some(sprite) = self.world.sprites.get_mut(self.water_bar) {
            sprite.view = ViewRect::bottom_fraction(self.stats.water / MAX_DRINK);
        }

        // Queue stacks slide back as their scroll offset decays.
        self.food_queue.decay_scroll(fd);
        self.drink_queue.decay_scroll(fd);
        place_queue_slots(
            &mut self.world,
            &self.food_slots,
            &self.food_queue,
            self.food_base,
        );
        place_queue_slots(
            &mut self.world,
            &self.drink_slots,
            &self.drink_queue,
            self.drink_base,
        );

        // Journal line for the current day and time slot.
        let msg = (self.time_of_day / MSG_DELAY) as usize;
        let line = self
            .narrative
            .message(self.day, msg)
            .unwrap_or("")
            .to_string();
        if let Some(text) = self.world.texts.get_mut(self.journal) {
            text.text = line;
        }
        if let Some(text) = self.world.texts.get_mut(self.overlay) {
            text.text = if self.stats.is_dead() {
                "They didn't make it. Press F1 to start over.".to_string()
            } else {
                String::new()
            };
        }

        self.tweens.update(&mut self.world, fd);
        self.world.update_animations(fd);
        self.world.update_world_transforms();

        self.batch.clear();
        queue_sprites(&self.world, interp, &mut self.batch);
        queue_texts(&self.world, interp, &mut self.batch);
    }
}

/// Uniform draw over the eligible pool; None when no config loaded.
fn draw_uniform(list: &[Foodstuff]) -> Option<Foodstuff> {
    if list.is_empty() {
        return None;
    }
    let index = (rand::rand() as usize) % list.len();
    Some(list[index].clone())
}

/// Position a queue's display slots down from its base, shifted by the
/// scroll offset, showing the blank tile past the queue's end.
fn place_queue_slots(world: &mut World, slots: &[Entity], queue: &FoodQueue, base: Vec2) {
    for (i, &slot) in slots.iter().enumerate() {
        let y = base.y + (queue.scroll_offset() + i as f32) * STACK_OFFSET;
        world.place(slot, Transform::from_position(vec3(base.x, y, 0.5)));
        if let Some(sprite) = world.sprites.get_mut(slot) {
            sprite.tile_index = queue
                .item(i)
                .map(|item| item.tile_index)
                .unwrap_or(EMPTY_TILE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppContext;
    use crate::game::stats::Phase;
    use crate::input::fake::FakeKeys;
    use crate::render::viewport::Viewport;
    use std::io::Write;

    const DT: f32 = 1.0 / 60.0;

    fn sheets() -> SessionSheets {
        SessionSheets {
            character: SheetId(0),
            food_bar: SheetId(1),
            water_bar: SheetId(2),
            bar_bg: SheetId(3),
            foods: SheetId(4),
        }
    }

    fn write_food_config(dir: &std::path::Path, json: &str) {
        let mut file = std::fs::File::create(dir.join(FOOD_CONFIG)).unwrap();
        file.write_all(json.as_bytes()).unwrap();
    }

    fn start_session(dir: &std::path::Path) -> (MainSession, Viewport) {
        let mut session = MainSession::new(sheets(), dir.to_path_buf());
        let mut viewport = Viewport::new(1280.0, 720.0);
        let keys = FakeKeys::new();
        session.enter(&mut AppContext {
            viewport: &mut viewport,
            keys: &keys,
        });
        (session, viewport)
    }

    fn tick(session: &mut MainSession, viewport: &mut Viewport, keys: &FakeKeys) {
        session.tick(
            &mut AppContext {
                viewport,
                keys,
            },
            DT,
        );
    }

    const TWO_FOODS_ONE_DRINK: &str = r#"[
        { "type": "food", "name": "apple", "tileIndex": 1,
          "effects": [ { "type": "food", "cps": 50.0, "duration": 0.1 } ] },
        { "type": "food", "name": "bread", "tileIndex": 2,
          "effects": [ { "type": "food", "cps": 80.0, "duration": 0.1 } ] },
        { "type": "drink", "name": "water", "tileIndex": 8,
          "effects": [ { "type": "drink", "cps": 120.0, "duration": 0.1 } ] }
    ]"#;

    #[test]
    fn double_tap_consumes_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_food_config(dir.path(), TWO_FOODS_ONE_DRINK);
        let (mut session, mut viewport) = start_session(dir.path());
        let mut keys = FakeKeys::new();

        assert_eq!(session.food_queue.len(), QUEUE_TARGET_LEN);
        assert_eq!(session.stats.food, MAX_FOOD);
        let second_in_line = session.food_queue.item(1).unwrap().clone();

        // First tap.
        keys.press(KeyCode::Up);
        tick(&mut session, &mut viewport, &keys);
        keys.release(KeyCode::Up);
        tick(&mut session, &mut viewport, &keys);
        // Second tap inside the window.
        keys.press(KeyCode::Up);
        tick(&mut session, &mut viewport, &keys);

        assert_eq!(session.food_queue.len(), QUEUE_TARGET_LEN);
        assert_eq!(session.food_queue.front().unwrap(), &second_in_line);
        assert_eq!(session.tweens.live_count(), 1);
        let slot = session.tweens.live().next().unwrap();
        assert_eq!(slot.target, session.consume_point);
    }

    #[test]
    fn auto_consume_fires_only_below_max_and_applies_effects() {
        let dir = tempfile::tempdir().unwrap();
        write_food_config(dir.path(), TWO_FOODS_ONE_DRINK);
        let (mut session, mut viewport) = start_session(dir.path());
        let mut keys = FakeKeys::new();

        // A lone tap arms the gesture; ambient decay pulls food below max
        // from the first tick, so the auto-consume fires once the window
        // lapses.
        keys.press(KeyCode::Up);
        tick(&mut session, &mut viewport, &keys);
        keys.release(KeyCode::Up);

        let mut consumed_after = None;
        for i in 0..60 {
            tick(&mut session, &mut viewport, &keys);
            if session.food_queue.scroll_offset() > 0.0 {
                consumed_after = Some(i);
                break;
            }
        }
        let lapsed_ticks = consumed_after.expect("auto-consume never fired");
        assert!(
            (lapsed_ticks as f32 + 1.0) * DT > DOUBLE_TAP_WINDOW,
            "fired inside the double-tap window"
        );
        assert_eq!(session.food_queue.len(), QUEUE_TARGET_LEN);
        assert!(
            session.effects.len() > 2,
            "consumed item's effects joined the ambient pair"
        );
        assert!(session.effects.active().iter().any(|e| e.source.is_some()));

        // Exactly one consumption: the offset never climbs past one.
        for _ in 0..60 {
            tick(&mut session, &mut viewport, &keys);
        }
        assert_eq!(session.food_queue.scroll_offset(), 1.0);
    }

    #[test]
    fn death_is_terminal_and_freezes_consumption() {
        let dir = tempfile::tempdir().unwrap();
        write_food_config(dir.path(), TWO_FOODS_ONE_DRINK);
        let (mut session, mut viewport) = start_session(dir.path());
        let mut keys = FakeKeys::new();

        session.stats.water = 0.0;
        tick(&mut session, &mut viewport, &keys);
        assert_eq!(session.stats.phase, Phase::Dead);

        // Double-tapping while dead consumes nothing.
        let front = session.food_queue.front().unwrap().clone();
        keys.press(KeyCode::Up);
        tick(&mut session, &mut viewport, &keys);
        keys.release(KeyCode::Up);
        keys.press(KeyCode::Up);
        tick(&mut session, &mut viewport, &keys);
        assert_eq!(session.food_queue.front().unwrap(), &front);
        assert_eq!(session.tweens.live_count(), 0);

        // F1 starts a fresh game.
        keys.release_all();
        keys.press(KeyCode::F1);
        tick(&mut session, &mut viewport, &keys);
        assert_eq!(session.stats.phase, Phase::Playing);
        // One tick of ambient decay has already run on the fresh meters.
        assert!(session.stats.water > MAX_DRINK - 1.0);
        assert_eq!(session.effects.len(), 2);
    }

    #[test]
    fn missing_config_degrades_to_empty_queues() {
        let dir = tempfile::tempdir().unwrap();
        // No food.json at all.
        let (mut session, mut viewport) = start_session(dir.path());
        let mut keys = FakeKeys::new();

        assert!(session.food_queue.is_empty());

        // Gestures on an empty queue are harmless.
        keys.press(KeyCode::Up);
        tick(&mut session, &mut viewport, &keys);
        keys.release(KeyCode::Up);
        keys.press(KeyCode::Up);
        tick(&mut session, &mut viewport, &keys);
        assert_eq!(session.tweens.live_count(), 0);
        assert_eq!(session.effects.len(), 2, "ambient decay only");
    }

    #[test]
    fn frame_places_slots_and_blends_nothing_without_motion() {
        let dir = tempfile::tempdir().unwrap();
        write_food_config(dir.path(), TWO_FOODS_ONE_DRINK);
        let (mut session, mut viewport) = start_session(dir.path());
        let keys = FakeKeys::new();

        session.frame(
            &mut AppContext {
                viewport: &mut viewport,
                keys: &keys,
            },
            0.0,
            0,
        );

        // Every display slot queued: 2 queues x 10 slots + character +
        // 2 bars + 2 bar backgrounds.
        assert_eq!(session.batch.sprite_ops().len(), 25);

        // Slots past the queue's end show the blank tile.
        let empty_tiles = session
            .batch
            .sprite_ops()
            .iter()
            .filter(|op| op.tile_index == EMPTY_TILE)
            .count();
        assert_eq!(empty_tiles, 2 * (QUEUE_DISPLAY_SLOTS - QUEUE_TARGET_LEN));
    }

    #[test]
    fn narrative_clock_rolls_days() {
        let dir = tempfile::tempdir().unwrap();
        write_food_config(dir.path(), TWO_FOODS_ONE_DRINK);
        std::fs::write(
            dir.path().join(MOTD_CONFIG),
            br#"[["first day"], ["second day"]]"#,
        )
        .unwrap();
        let (mut session, mut viewport) = start_session(dir.path());
        let keys = FakeKeys::new();

        assert_eq!(session.narrative.day_count(), 2);
        session.time_of_day = DAY_LENGTH - DT / 2.0;
        tick(&mut session, &mut viewport, &keys);
        assert_eq!(session.day, 1);
        assert!(session.time_of_day < DAY_LENGTH);
    }
}
