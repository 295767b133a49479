//! Focus Timer - A focus/break interval timer served over a local HTTP API
//! 
//! This library provides the interval state machine, the tick source that
//! drives it, and the notification and tone side effects of completing an
//! interval.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
