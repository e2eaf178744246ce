//! # Chaos CLI
//!
//! - **`chaosctl`** - edits the engine's chaos configuration through its
//!   admin API and follows the traffic feed
//! - **`chaos-runner`** - starts the engine binary that ships alongside it

pub mod cli;
pub mod commands;
pub mod launcher;
pub mod logging;
pub mod render;
