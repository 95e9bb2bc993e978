/// Database migrations and schema management.
use anyhow::Result;
use rusqlite::Connection;

/// Creates the schema if it doesn't exist yet.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS session (
            id          INTEGER PRIMARY KEY CHECK (id = 1),
            token       TEXT    NOT NULL,
            email       TEXT    NOT NULL,
            name        TEXT    NOT NULL,
            created_at  TEXT    NOT NULL,
            expires_at  TEXT    NOT NULL
        );

        CREATE TABLE IF NOT EXISTS hours_drafts (
            screen_id   TEXT    PRIMARY KEY,
            rules       TEXT    NOT NULL,
            updated_at  TEXT    NOT NULL
        );
        ",
    )?;
    Ok(())
}
