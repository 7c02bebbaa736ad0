//! Narrative schedule
//!
//! A nested array of display strings — messages grouped by day — shown in
//! the journal as the in-game days pass. Entirely optional: a missing or
//! malformed file leaves the schedule empty and the game quietly shows
//! nothing.

use std::fs;
use std::path::Path;

/// Seconds per in-game day.
pub const DAY_LENGTH: f32 = 30.0;
/// Seconds each journal message stays up.
pub const MSG_DELAY: f32 = 3.0;

/// Messages indexed by day, then by message-within-day.
#[derive(Debug, Default, Clone)]
pub struct Narrative {
    days: Vec<Vec<String>>,
}

impl Narrative {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load from a JSON array-of-arrays. Any failure is logged and yields
    /// the empty schedule.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error while reading \"{}\": {}", path.display(), e);
                return Self::empty();
            }
        };
        match serde_json::from_str::<Vec<Vec<String>>>(&text) {
            Ok(days) => Self { days },
            Err(e) => {
                eprintln!("Error while parsing \"{}\": {}", path.display(), e);
                Self::empty()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Message for a day/slot pair, if the schedule goes that far.
    pub fn message(&self, day: usize, msg: usize) -> Option<&str> {
        self.days.get(day)?.get(msg).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn indexes_day_then_message() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[["day one", "still day one"], ["day two"]]"#)
            .unwrap();

        let narrative = Narrative::load(file.path());
        assert_eq!(narrative.day_count(), 2);
        assert_eq!(narrative.message(0, 1), Some("still day one"));
        assert_eq!(narrative.message(1, 0), Some("day two"));
        assert_eq!(narrative.message(1, 1), None);
        assert_eq!(narrative.message(5, 0), None);
    }

    #[test]
    fn missing_file_loads_empty() {
        let narrative = Narrative::load(Path::new("/no/such/motd.json"));
        assert!(narrative.is_empty());
        assert_eq!(narrative.message(0, 0), None);
    }

    #[test]
    fn malformed_file_loads_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not: an array }").unwrap();
        let narrative = Narrative::load(file.path());
        assert!(narrative.is_empty());
    }
}
