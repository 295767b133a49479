//! Timer state structure and its serializable snapshot

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::Settings;

/// Interval kind the timer is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Focus,
    Break,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Focus => "focus",
            Mode::Break => "break",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" => Ok(Mode::Focus),
            "break" => Ok(Mode::Break),
            other => Err(format!("Unknown timer mode: {}", other)),
        }
    }
}

/// Live countdown state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    pub mode: Mode,
    pub remaining_seconds: u64,
    pub running: bool,
    pub completed_focus_sessions: u32,
}

impl TimerState {
    /// Paused focus interval at the configured length
    pub fn new(settings: &Settings) -> Self {
        Self {
            mode: Mode::Focus,
            remaining_seconds: settings.duration_for(Mode::Focus),
            running: false,
            completed_focus_sessions: 0,
        }
    }
}

/// Point-in-time view of the timer handed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub remaining_seconds: u64,
    pub display: String,
    pub running: bool,
    pub completed_focus_sessions: u32,
    pub label: String,
    pub settings: Settings,
}

impl TimerSnapshot {
    pub fn new(state: &TimerState, settings: &Settings) -> Self {
        Self {
            mode: state.mode,
            remaining_seconds: state.remaining_seconds,
            display: format_time(state.remaining_seconds),
            running: state.running,
            completed_focus_sessions: state.completed_focus_sessions,
            label: mode_label(state.mode, state.completed_focus_sessions, settings).to_string(),
            settings: settings.clone(),
        }
    }
}

/// Format seconds as `MM:SS`
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Heading shown for the current interval
pub fn mode_label(mode: Mode, completed_focus_sessions: u32, settings: &Settings) -> &'static str {
    match mode {
        Mode::Focus => "FOCUS TIME",
        Mode::Break if settings.is_long_break_due(completed_focus_sessions) => "LONG BREAK",
        Mode::Break => "BREAK TIME",
    }
}
