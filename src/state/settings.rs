//! Timer settings and coercion of raw user input

use serde::{Deserialize, Serialize};

use super::Mode;

/// Bounds and fallback for a numeric settings field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBounds {
    pub fallback: u32,
    pub min: u32,
    pub max: u32,
}

pub const FOCUS_MINUTES: FieldBounds = FieldBounds { fallback: 25, min: 1, max: 120 };
pub const BREAK_MINUTES: FieldBounds = FieldBounds { fallback: 5, min: 1, max: 60 };
pub const LONG_BREAK_MINUTES: FieldBounds = FieldBounds { fallback: 15, min: 1, max: 120 };
pub const LONG_BREAK_INTERVAL: FieldBounds = FieldBounds { fallback: 4, min: 2, max: 10 };
pub const SOUND_VOLUME: FieldBounds = FieldBounds { fallback: 50, min: 0, max: 100 };

/// User-configurable timer behaviour
///
/// Deserialization goes through [`SettingsUpdate`] so every field is coerced
/// into its bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SettingsUpdate")]
pub struct Settings {
    pub focus_minutes: u32,
    pub break_minutes: u32,
    pub long_break_minutes: u32,
    /// Number of focus sessions between long breaks
    pub long_break_interval: u32,
    pub auto_start: bool,
    pub sound_enabled: bool,
    /// Tone volume, 0-100
    pub sound_volume: u8,
    pub notifications_enabled: bool,
}

impl Settings {
    /// Duration in seconds of a regular interval in the given mode
    pub fn duration_for(&self, mode: Mode) -> u64 {
        let minutes = match mode {
            Mode::Focus => self.focus_minutes,
            Mode::Break => self.break_minutes,
        };
        u64::from(minutes) * 60
    }

    pub fn long_break_seconds(&self) -> u64 {
        u64::from(self.long_break_minutes) * 60
    }

    /// Whether `sessions` completed focus sessions land on a long break
    pub fn is_long_break_due(&self, sessions: u32) -> bool {
        sessions > 0 && sessions % self.long_break_interval == 0
    }

    /// Apply a partial update, coercing every raw field
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(input) = &update.focus_minutes {
            self.focus_minutes = input.coerce(FOCUS_MINUTES);
        }
        if let Some(input) = &update.break_minutes {
            self.break_minutes = input.coerce(BREAK_MINUTES);
        }
        if let Some(input) = &update.long_break_minutes {
            self.long_break_minutes = input.coerce(LONG_BREAK_MINUTES);
        }
        if let Some(input) = &update.long_break_interval {
            self.long_break_interval = input.coerce(LONG_BREAK_INTERVAL);
        }
        if let Some(input) = &update.sound_volume {
            // SOUND_VOLUME.max fits in a u8
            self.sound_volume = input.coerce(SOUND_VOLUME) as u8;
        }
        if let Some(auto_start) = update.auto_start {
            self.auto_start = auto_start;
        }
        if let Some(sound_enabled) = update.sound_enabled {
            self.sound_enabled = sound_enabled;
        }
        if let Some(notifications_enabled) = update.notifications_enabled {
            self.notifications_enabled = notifications_enabled;
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: FOCUS_MINUTES.fallback,
            break_minutes: BREAK_MINUTES.fallback,
            long_break_minutes: LONG_BREAK_MINUTES.fallback,
            long_break_interval: LONG_BREAK_INTERVAL.fallback,
            auto_start: false,
            sound_enabled: true,
            sound_volume: SOUND_VOLUME.fallback as u8,
            notifications_enabled: true,
        }
    }
}

impl From<SettingsUpdate> for Settings {
    fn from(update: SettingsUpdate) -> Self {
        let mut settings = Settings::default();
        settings.apply(&update);
        settings
    }
}

/// Raw value typed by the user into a numeric field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Number(f64),
    Text(String),
}

impl FieldInput {
    /// Coerce to a value within `bounds`.
    ///
    /// Missing input yields the fallback, as does zero when the field has a
    /// positive minimum. Anything else is clamped.
    pub fn coerce(&self, bounds: FieldBounds) -> u32 {
        let parsed = match self {
            FieldInput::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            FieldInput::Number(_) => None,
            FieldInput::Text(s) => parse_leading_int(s),
        };

        match parsed {
            None => bounds.fallback,
            Some(0) if bounds.min > 0 => bounds.fallback,
            Some(n) => n.clamp(i64::from(bounds.min), i64::from(bounds.max)) as u32,
        }
    }
}

impl From<&str> for FieldInput {
    fn from(s: &str) -> Self {
        FieldInput::Text(s.to_string())
    }
}

impl From<u32> for FieldInput {
    fn from(n: u32) -> Self {
        FieldInput::Number(f64::from(n))
    }
}

/// Parse the leading integer of `s`, ignoring trailing characters
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    // Saturate absurdly long inputs; they clamp to the max anyway
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Partial settings edit as submitted by a client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub focus_minutes: Option<FieldInput>,
    pub break_minutes: Option<FieldInput>,
    pub long_break_minutes: Option<FieldInput>,
    pub long_break_interval: Option<FieldInput>,
    pub auto_start: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub sound_volume: Option<FieldInput>,
    pub notifications_enabled: Option<bool>,
}
