/// Local SQLite store: session and working-hours drafts.
mod drafts;
mod migrations;
mod session;

use anyhow::Result;
use rusqlite::Connection;

pub use drafts::{delete_draft, load_draft, query_drafts, save_draft};
pub use session::{clear_session, load_session, save_session};

/// Opens (or creates) the SQLite database and runs migrations.
pub fn init(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

#[cfg(test)]
pub fn init_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrations::run_migrations(&conn)?;
    Ok(conn)
}

/// Returns the default database path inside the user's data directory.
/// Falls back to `./screenboard.db` when no data dir is found.
pub fn default_db_path() -> String {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join("screenboard");
        std::fs::create_dir_all(&app_dir).ok();
        app_dir.join("screenboard.db").to_string_lossy().into_owned()
    } else {
        "screenboard.db".to_string()
    }
}

fn parse_datetime<Tz: chrono::TimeZone>(raw: &str, zone: &Tz) -> Result<chrono::DateTime<Tz>> {
    Ok(chrono::DateTime::parse_from_rfc3339(raw)
        .map_err(|err| anyhow::anyhow!("Failed to parse datetime '{raw}': {err}"))?
        .with_timezone(zone))
}
