use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::export::ExportLogic;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        club,
        force,
    } = cmd
    {
        let mut pool = DbPool::open(&cfg.database)?;
        let club = club.as_deref().or(cfg.default_club.as_deref());
        ExportLogic::export(&mut pool, *format, file, club, *force)?;
    }
    Ok(())
}
