//! Side-effect collaborators module
//! 
//! This module contains the desktop notifier and the completion tone player.

pub mod notifier;
pub mod tone;

// Re-export main types
pub use notifier::{DesktopNotifier, Notifier, Permission};
pub use tone::{synthesize_tone, CommandTonePlayer, SilentTonePlayer, TonePlayer};
