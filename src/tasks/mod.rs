//! Background tasks module
//! 
//! This module contains the tick source and the task that feeds timer events
//! into the application state.

pub mod ticker;
pub mod timer_events;

// Re-export main types and functions
pub use ticker::{IntervalTicker, TickSource};
pub use timer_events::{timer_event_task, TimerEvent};
