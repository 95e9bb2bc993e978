/// Working-hours drafts: local edits waiting to be submitted.
use anyhow::Result;
use chrono::{Local, Utc};
use rusqlite::{Connection, OptionalExtension};

use super::parse_datetime;
use crate::hours::{WorkingHours, json_string_to_working_hours};
use crate::types::HoursDraft;

pub fn save_draft(screen_id: &str, hours: &WorkingHours, conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT INTO hours_drafts (screen_id, rules, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(screen_id) DO UPDATE
         SET rules = excluded.rules, updated_at = excluded.updated_at",
        (screen_id, hours.to_json_string()?, Utc::now().to_rfc3339()),
    )?;
    tracing::debug!("saved working hours draft for screen {screen_id}");
    Ok(())
}

pub fn load_draft(screen_id: &str, conn: &Connection) -> Result<Option<HoursDraft>> {
    let row = conn
        .query_row(
            "SELECT screen_id, rules, updated_at FROM hours_drafts WHERE screen_id = ?1",
            [screen_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;
    row.map(|(screen_id, rules, updated_at)| to_draft(screen_id, &rules, &updated_at))
        .transpose()
}

/// Returns whether a draft existed.
pub fn delete_draft(screen_id: &str, conn: &Connection) -> Result<bool> {
    let removed = conn.execute("DELETE FROM hours_drafts WHERE screen_id = ?1", [screen_id])?;
    Ok(removed > 0)
}

pub fn query_drafts(conn: &Connection) -> Result<Vec<HoursDraft>> {
    let mut stmt =
        conn.prepare("SELECT screen_id, rules, updated_at FROM hours_drafts ORDER BY screen_id")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;
    let mut drafts = Vec::new();
    for row in rows {
        let (screen_id, rules, updated_at) = row?;
        drafts.push(to_draft(screen_id, &rules, &updated_at)?);
    }
    Ok(drafts)
}

fn to_draft(screen_id: String, rules: &str, updated_at: &str) -> Result<HoursDraft> {
    Ok(HoursDraft {
        screen_id,
        hours: json_string_to_working_hours(Some(rules)),
        updated_at: parse_datetime(updated_at, &Local)?,
    })
}
