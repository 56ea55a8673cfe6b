//! CLI subcommand implementations.

pub mod export;
pub mod focus;
pub mod plan;
pub mod pomodoro;
pub mod progress;
pub mod resources;
pub mod user;
pub mod util;
