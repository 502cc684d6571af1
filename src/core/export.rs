use crate::core::clubs::require_club;
use crate::db::log::ttlog_quiet;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::member::MemberExport;
use crate::ui::messages::{info, success};
use clap::ValueEnum;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// Export the member roster of one club (or of all clubs).
    pub fn export(
        pool: &mut DbPool,
        format: ExportFormat,
        file: &str,
        club: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);
        if path.exists() && !force {
            return Err(AppError::Conflict(format!(
                "output file {} (use --force to overwrite)",
                path.display()
            )));
        }

        let rows = Self::collect(pool, club)?;

        info(format!(
            "Exporting {} members to {}: {}",
            rows.len(),
            format.as_str().to_uppercase(),
            path.display()
        ));

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        ttlog_quiet(
            &pool.conn,
            "export",
            &path.to_string_lossy(),
            &format!("Exported {} members as {}", rows.len(), format.as_str()),
        );

        success(format!(
            "{} export completed: {}",
            format.as_str().to_uppercase(),
            path.display()
        ));
        Ok(rows.len())
    }

    fn collect(pool: &mut DbPool, club: Option<&str>) -> AppResult<Vec<MemberExport>> {
        let clubs = match club {
            Some(name) => vec![require_club(&pool.conn, name)?],
            None => queries::list_clubs(&pool.conn)?,
        };

        let mut out = Vec::new();
        for c in &clubs {
            for m in queries::list_members(&pool.conn, Some(c.id))? {
                out.push(MemberExport::from_member(&c.name, &m));
            }
        }
        Ok(out)
    }
}

/// Export JSON pretty-printed.
fn export_json(rows: &[MemberExport], path: &Path) -> AppResult<()> {
    let json_data = serde_json::to_string_pretty(rows)
        .map_err(|e| AppError::Export(format!("JSON serialization error: {e}")))?;

    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;
    Ok(())
}

/// Export CSV (header included thanks to serde).
fn export_csv(rows: &[MemberExport], path: &Path) -> AppResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    for item in rows {
        wtr.serialize(item)?;
    }

    wtr.flush()?;
    Ok(())
}
