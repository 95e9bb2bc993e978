/// Persisted login session (single row).
use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension};

use super::parse_datetime;
use crate::session::Session;
use crate::types::User;

pub fn save_session(session: &Session, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO session (id, token, email, name, created_at, expires_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5)",
        (
            &session.token,
            &session.user.email,
            &session.user.name,
            session.created_at.to_rfc3339(),
            session.expires_at.to_rfc3339(),
        ),
    )?;
    Ok(())
}

/// Returns the stored session unless it expired before `now`; expired rows are removed.
pub fn load_session(now: DateTime<Utc>, conn: &Connection) -> Result<Option<Session>> {
    let row = conn
        .query_row(
            "SELECT token, email, name, created_at, expires_at FROM session WHERE id = 1",
            [],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;
    let Some((token, email, name, created_at, expires_at)) = row else {
        return Ok(None);
    };
    let session = Session {
        token,
        user: User { email, name },
        created_at: parse_datetime(&created_at, &Utc)?,
        expires_at: parse_datetime(&expires_at, &Utc)?,
    };
    if session.is_expired(now) {
        tracing::info!("stored session for {} expired", session.user.email);
        clear_session(conn)?;
        return Ok(None);
    }
    Ok(Some(session))
}

pub fn clear_session(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM session", [])?;
    Ok(())
}
