//! State management module
//! 
//! This module contains the interval state machine, its settings, and the
//! shared application state that drives it.

pub mod settings;
pub mod timer_state;
pub mod machine;
pub mod app_state;

// Re-export main types
pub use settings::{FieldInput, Settings, SettingsUpdate};
pub use timer_state::{Mode, TimerSnapshot, TimerState};
pub use machine::{Completion, TimerMachine};
pub use app_state::AppState;
