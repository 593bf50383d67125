//! `PASW` - `PulseAudio` Switcher
//!
//! Switches the default audio sink from a keyboard shortcut and moves every
//! running stream to it. Uses `pacmd` for audio control.
//!
//! # Features
//! - Cycle to the next sink in server order
//! - Jump to the first sink whose name contains a substring
//! - Rotate among a group of names, remembering the position across runs
//! - Desktop notifications that replace each other instead of stacking

pub mod cli;
pub mod config;
pub mod pulse;
pub mod selector;
pub mod notification;
pub mod state;
pub mod commands;
pub mod style;

// Re-export commonly used types for convenience
pub use cli::Args;
pub use config::Config;
pub use state::GroupState;
