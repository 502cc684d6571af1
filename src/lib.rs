//! rAttendance library root.
//! Exposes the CLI parser, the high-level run() function, and the
//! attendance logic (clubs, members, sessions, geofenced check-ins).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod identity;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Club { action } => cli::commands::club::handle(action, cfg),
        Commands::Member { action } => cli::commands::member::handle(action, cfg),
        Commands::Session { action } => cli::commands::session::handle(action, cfg),
        Commands::Checkin { .. } => cli::commands::checkin::handle(&cli.command, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // load config once, then apply command-line overrides
    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(custom_tokens) = &cli.tokens {
        cfg.tokens_file = custom_tokens.clone();
    }

    dispatch(&cli, &cfg)
}
