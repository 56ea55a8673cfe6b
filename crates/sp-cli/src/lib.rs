//! Study planner CLI library.
//!
//! This crate provides the command-line interface for the study planner.

mod cli;
pub mod commands;
mod config;
pub mod context;
pub mod journal;

pub use cli::{
    BlockAction, Cli, Commands, ExportAction, FocusAction, PlanAction, PomodoroAction,
    ProgressAction, UserAction,
};
pub use config::Config;
