//! Named input handling
//!
//! Gameplay code never reads device codes directly. It registers named
//! inputs, binds key codes to them, and asks "was this just pressed?" after
//! the per-tick sync. Edges are computed against the previous tick's state,
//! so a press is visible for exactly one tick regardless of framerate.
//!
//! The actual device poll goes through the `KeySource` seam: macroquad's
//! keyboard natively, a scripted fake in tests.

use macroquad::input::{is_key_down, KeyCode};

/// Handle to a registered named input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputId(usize);

struct InputEntry {
    name: String,
    keys: Vec<KeyCode>,
    down: bool,
    was_down: bool,
}

/// Something that can answer "is this key held right now?".
pub trait KeySource {
    fn is_down(&self, key: KeyCode) -> bool;
}

/// The live keyboard.
pub struct MacroquadKeys;

impl KeySource for MacroquadKeys {
    fn is_down(&self, key: KeyCode) -> bool {
        is_key_down(key)
    }
}

/// Registry of named inputs and their bindings.
#[derive(Default)]
pub struct Inputs {
    entries: Vec<InputEntry>,
}

impl Inputs {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a named input with no bindings yet.
    pub fn add_input(&mut self, name: &str) -> InputId {
        self.entries.push(InputEntry {
            name: name.to_string(),
            keys: Vec::new(),
            down: false,
            was_down: false,
        });
        InputId(self.entries.len() - 1)
    }

    /// Bind a key code to a named input. Multiple keys may map to one input.
    pub fn bind_key(&mut self, input: InputId, key: KeyCode) {
        self.entries[input.0].keys.push(key);
    }

    /// Display name an input was registered under.
    pub fn name(&self, input: InputId) -> &str {
        &self.entries[input.0].name
    }

    /// Snapshot device state for this tick. Call exactly once per tick,
    /// before any queries.
    pub fn sync(&mut self, source: &dyn KeySource) {
        for entry in &mut self.entries {
            entry.was_down = entry.down;
            entry.down = entry.keys.iter().any(|&k| source.is_down(k));
        }
    }

    pub fn is_down(&self, input: InputId) -> bool {
        self.entries[input.0].down
    }

    /// Pressed edge: down this tick, up the previous tick.
    pub fn just_pressed(&self, input: InputId) -> bool {
        let entry = &self.entries[input.0];
        entry.down && !entry.was_down
    }
}

#[cfg(test)]
pub mod fake {
    use std::collections::HashSet;

    use super::*;

    /// Scripted key source for tests.
    #[derive(Default)]
    pub struct FakeKeys {
        held: HashSet<KeyCode>,
    }

    impl FakeKeys {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn press(&mut self, key: KeyCode) {
            self.held.insert(key);
        }

        pub fn release(&mut self, key: KeyCode) {
            self.held.remove(&key);
        }

        pub fn release_all(&mut self) {
            self.held.clear();
        }
    }

    impl KeySource for FakeKeys {
        fn is_down(&self, key: KeyCode) -> bool {
            self.held.contains(&key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeKeys;
    use super::*;

    #[test]
    fn press_edge_lasts_exactly_one_sync() {
        let mut inputs = Inputs::new();
        let eat = inputs.add_input("eat");
        inputs.bind_key(eat, KeyCode::Up);

        let mut keys = FakeKeys::new();
        keys.press(KeyCode::Up);

        inputs.sync(&keys);
        assert!(inputs.just_pressed(eat));
        assert!(inputs.is_down(eat));

        inputs.sync(&keys);
        assert!(!inputs.just_pressed(eat), "held key is not a new edge");
        assert!(inputs.is_down(eat));

        keys.release(KeyCode::Up);
        inputs.sync(&keys);
        assert!(!inputs.is_down(eat));

        keys.press(KeyCode::Up);
        inputs.sync(&keys);
        assert!(inputs.just_pressed(eat), "re-press is a fresh edge");
    }

    #[test]
    fn multiple_bindings_merge() {
        let mut inputs = Inputs::new();
        let drink = inputs.add_input("drink");
        inputs.bind_key(drink, KeyCode::Down);
        inputs.bind_key(drink, KeyCode::S);

        let mut keys = FakeKeys::new();
        keys.press(KeyCode::S);
        inputs.sync(&keys);
        assert!(inputs.just_pressed(drink));
        assert_eq!(inputs.name(drink), "drink");
    }

    #[test]
    fn unbound_input_never_fires() {
        let mut inputs = Inputs::new();
        let debug = inputs.add_input("debug");
        let keys = FakeKeys::new();
        inputs.sync(&keys);
        assert!(!inputs.just_pressed(debug));
        assert!(!inputs.is_down(debug));
    }
}
