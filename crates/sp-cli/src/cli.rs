//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::commands::focus::FocusLogArgs;
use crate::commands::plan::GenerateArgs;
use crate::commands::pomodoro::PomodoroLogArgs;

/// Personal study planner.
///
/// Builds a daily study-hours plan from subject priorities and difficulty,
/// tracks progress, and keeps focus and pomodoro session logs.
#[derive(Debug, Parser)]
#[command(name = "sp", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Username to act as.
    #[arg(short, long, global = true, env = "SP_USER")]
    pub user: Option<String>,

    /// Password for `--user`.
    #[arg(long, global = true, env = "SP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage accounts.
    #[command(subcommand)]
    User(UserAction),

    /// Generate or show the study plan.
    #[command(subcommand)]
    Plan(PlanAction),

    /// Record and review hours studied.
    #[command(subcommand)]
    Progress(ProgressAction),

    /// Log deep-focus sessions and manage the block list.
    #[command(subcommand)]
    Focus(FocusAction),

    /// Log pomodoro work and break sessions.
    #[command(subcommand)]
    Pomodoro(PomodoroAction),

    /// Recommend learning resources for the planned subjects.
    Resources {
        /// Seed for reproducible picks.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Export the plan as a weekly CSV schedule or a text report.
    #[command(subcommand)]
    Export(ExportAction),
}

/// Account actions.
#[derive(Debug, Subcommand)]
pub enum UserAction {
    /// Create a new account.
    Register {
        /// Username for the new account.
        username: String,
        /// Password for the new account.
        #[arg(value_name = "PASSWORD")]
        new_password: String,
    },
    /// Check the `--user`/`--password` credentials.
    Login,
}

/// Plan actions.
#[derive(Debug, Subcommand)]
pub enum PlanAction {
    /// Generate a new plan and replace the stored one.
    Generate(GenerateArgs),
    /// Show the stored plan.
    Show {
        /// Recompute review intervals up to this deadline (YYYY-MM-DD).
        #[arg(long)]
        deadline: Option<NaiveDate>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Progress actions.
#[derive(Debug, Subcommand)]
pub enum ProgressAction {
    /// Record hours studied for a subject.
    Record {
        /// Subject name.
        #[arg(long)]
        subject: String,
        /// Hours studied.
        #[arg(long)]
        hours: f64,
        /// Day studied (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show recent progress records.
    History {
        /// Maximum number of records.
        #[arg(long, default_value_t = 7)]
        limit: usize,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Compare hours studied on a day with the plan.
    Today {
        /// Day to check (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Focus actions.
#[derive(Debug, Subcommand)]
pub enum FocusAction {
    /// Record a completed focus session.
    Log(FocusLogArgs),
    /// Show focus analytics.
    Stats,
    /// Manage the distracting-site block list.
    #[command(subcommand)]
    Block(BlockAction),
}

/// Block list actions.
#[derive(Debug, Subcommand)]
pub enum BlockAction {
    /// Add a site to the block list.
    Add { site: String },
    /// Remove a site from the block list.
    Remove { site: String },
    /// List blocked sites, one per line.
    List,
}

/// Pomodoro actions.
#[derive(Debug, Subcommand)]
pub enum PomodoroAction {
    /// Record a completed pomodoro session.
    Log(PomodoroLogArgs),
    /// Show pomodoro totals and recent sessions.
    Stats,
}

/// Export actions.
#[derive(Debug, Subcommand)]
pub enum ExportAction {
    /// Weekly schedule as CSV.
    Csv,
    /// Plain-text study report.
    Report {
        /// Goal date shown in the report (YYYY-MM-DD).
        #[arg(long)]
        deadline: NaiveDate,
        /// Seed for reproducible resource picks.
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_plan_generate() {
        let cli = Cli::try_parse_from([
            "sp",
            "--user",
            "ada",
            "plan",
            "generate",
            "--subject",
            "Math:high:hard",
            "--subject",
            "Art:low:easy",
            "--motivation",
            "8",
            "--energy",
            "high",
            "--hours",
            "3.5",
            "--deadline",
            "2030-01-01",
        ])
        .unwrap();

        assert_eq!(cli.user.as_deref(), Some("ada"));
        let Some(Commands::Plan(PlanAction::Generate(args))) = cli.command else {
            panic!("expected plan generate");
        };
        assert_eq!(args.subjects.len(), 2);
        assert_eq!(args.subjects[0].name, "Math");
        assert_eq!(args.motivation, 8);
        assert_eq!(args.energy, sp_core::Energy::High);
    }

    #[test]
    fn register_password_does_not_clash_with_global() {
        let cli = Cli::try_parse_from(["sp", "user", "register", "ada", "secret"]).unwrap();

        assert!(cli.password.is_none());
        let Some(Commands::User(UserAction::Register {
            username,
            new_password,
        })) = cli.command
        else {
            panic!("expected user register");
        };
        assert_eq!(username, "ada");
        assert_eq!(new_password, "secret");
    }

    #[test]
    fn parses_progress_today() {
        let cli = Cli::try_parse_from(["sp", "progress", "today", "--date", "2025-01-20"]).unwrap();

        let Some(Commands::Progress(ProgressAction::Today { date, json })) = cli.command else {
            panic!("expected progress today");
        };
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 20));
        assert!(!json);
    }

    #[test]
    fn rejects_unknown_energy() {
        let result = Cli::try_parse_from([
            "sp",
            "plan",
            "generate",
            "--subject",
            "Math:high:hard",
            "--energy",
            "extreme",
            "--hours",
            "2",
            "--deadline",
            "2030-01-01",
        ]);
        assert!(result.is_err());
    }
}
