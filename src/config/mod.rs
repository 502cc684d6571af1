use crate::core::geofence::DEFAULT_RADIUS_M;
use crate::errors::{AppError, AppResult};
use crate::utils::path::resolve_in;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub mod migrate;

/// Overrides the configuration directory (useful for tests and containers).
pub const HOME_ENV: &str = "RATTENDANCE_HOME";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_tokens_file")]
    pub tokens_file: String,
    #[serde(default = "default_radius")]
    pub geofence_radius_m: f64,
    #[serde(default)]
    pub default_club: Option<String>,
    #[serde(default = "default_show_distance")]
    pub show_distance: bool,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}
fn default_tokens_file() -> String {
    Config::config_dir()
        .join("tokens.yml")
        .to_string_lossy()
        .to_string()
}
fn default_radius() -> f64 {
    DEFAULT_RADIUS_M
}
fn default_show_distance() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            tokens_file: default_tokens_file(),
            geofence_radius_m: default_radius(),
            default_club: None,
            show_distance: default_show_distance(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if let Ok(custom) = env::var(HOME_ENV)
            && !custom.trim().is_empty()
        {
            return PathBuf::from(custom);
        }

        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rattendance")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rattendance")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rattendance.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rattendance.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        let cfg = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                AppError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            serde_yaml::from_str(&content)?
        } else {
            Config::default()
        };

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> AppResult<()> {
        if !self.geofence_radius_m.is_finite() || self.geofence_radius_m <= 0.0 {
            return Err(AppError::Config(format!(
                "geofence_radius_m must be a positive number, got {}",
                self.geofence_radius_m
            )));
        }
        if self.database.trim().is_empty() {
            return Err(AppError::Config("database path cannot be empty".into()));
        }
        Ok(())
    }

    /// Club used when a command omits `--club`.
    pub fn club_or_default<'a>(&'a self, club: &'a Option<String>) -> AppResult<&'a str> {
        club.as_deref()
            .or(self.default_club.as_deref())
            .ok_or_else(|| {
                AppError::InvalidInput("no --club given and no default_club configured".into())
            })
    }

    /// Initialize configuration and database files
    pub fn init_all(
        custom_db: Option<String>,
        custom_tokens: Option<String>,
        is_test: bool,
    ) -> AppResult<Config> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let db_path = match custom_db {
            Some(name) => resolve_in(&dir, &name),
            None => Self::database_file(),
        };
        let tokens_path = match custom_tokens {
            Some(name) => resolve_in(&dir, &name),
            None => PathBuf::from(default_tokens_file()),
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            tokens_file: tokens_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        // Create empty DB file if not exists
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        if !db_path.exists() {
            fs::File::create(&db_path)?;
        }

        Ok(config)
    }
}
