pub mod backup;
pub mod checkin;
pub mod club;
pub mod config;
pub mod db;
pub mod export;
pub mod init;
pub mod log;
pub mod member;
pub mod session;

use crate::config::Config;
use crate::errors::AppResult;
use crate::identity::TokenRegistry;
use std::path::Path;

/// Load the token registry configured for this run.
pub(crate) fn load_resolver(cfg: &Config) -> AppResult<TokenRegistry> {
    TokenRegistry::load(Path::new(&cfg.tokens_file))
}
