use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sp_cli::commands::{export, focus, plan, pomodoro, progress, resources, user};
use sp_cli::context::SessionContext;
use sp_cli::{
    BlockAction, Cli, Commands, Config, ExportAction, FocusAction, PlanAction, PomodoroAction,
    ProgressAction, UserAction,
};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(sp_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = sp_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

/// Opens the database and authenticates the `--user`/`--password` pair.
fn login(cli: &Cli) -> Result<SessionContext> {
    let (db, config) = open_database(cli.config.as_deref())?;
    SessionContext::login(
        db,
        cli.user.as_deref(),
        cli.password.as_deref(),
        Local::now().date_naive(),
        config.data_dir,
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Some(Commands::User(UserAction::Register {
            username,
            new_password,
        })) => {
            let (mut db, _config) = open_database(cli.config.as_deref())?;
            user::register(&mut out, &mut db, username, new_password)?;
        }
        Some(Commands::User(UserAction::Login)) => {
            let ctx = login(&cli)?;
            user::login(&mut out, &ctx)?;
        }
        Some(Commands::Plan(action)) => {
            let mut ctx = login(&cli)?;
            match action {
                PlanAction::Generate(args) => plan::generate(&mut out, &mut ctx, args)?,
                PlanAction::Show { deadline, json } => {
                    plan::show(&mut out, &ctx, *deadline, *json)?;
                }
            }
        }
        Some(Commands::Progress(action)) => {
            let mut ctx = login(&cli)?;
            match action {
                ProgressAction::Record {
                    subject,
                    hours,
                    date,
                } => progress::record(&mut out, &mut ctx, subject, *hours, *date)?,
                ProgressAction::History { limit, json } => {
                    progress::history(&mut out, &ctx, *limit, *json)?;
                }
                ProgressAction::Today { date, json } => {
                    progress::today(&mut out, &ctx, *date, *json)?;
                }
            }
        }
        Some(Commands::Focus(action)) => {
            let ctx = login(&cli)?;
            match action {
                FocusAction::Log(args) => focus::log(&mut out, &ctx, args)?,
                FocusAction::Stats => focus::stats(&mut out, &ctx)?,
                FocusAction::Block(BlockAction::Add { site }) => {
                    focus::block_add(&mut out, &ctx, site)?;
                }
                FocusAction::Block(BlockAction::Remove { site }) => {
                    focus::block_remove(&mut out, &ctx, site)?;
                }
                FocusAction::Block(BlockAction::List) => focus::block_list(&mut out, &ctx)?,
            }
        }
        Some(Commands::Pomodoro(action)) => {
            let ctx = login(&cli)?;
            match action {
                PomodoroAction::Log(args) => pomodoro::log(&mut out, &ctx, args)?,
                PomodoroAction::Stats => pomodoro::stats(&mut out, &ctx)?,
            }
        }
        Some(Commands::Resources { seed }) => {
            let ctx = login(&cli)?;
            resources::run(&mut out, &ctx, *seed)?;
        }
        Some(Commands::Export(action)) => {
            let ctx = login(&cli)?;
            match action {
                ExportAction::Csv => export::csv(&mut out, &ctx)?,
                ExportAction::Report { deadline, seed } => {
                    export::report(&mut out, &ctx, *deadline, *seed)?;
                }
            }
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    out.flush()?;
    Ok(())
}
