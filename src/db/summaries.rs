use crate::domain::SummaryResult;
use crate::errors::RewriteError;
use rusqlite::{params, Connection, OptionalExtension};

/// One summary per listing; the row id mirrors the listing id.
pub fn upsert_summary(
    conn: &Connection,
    listing_id: i64,
    summary: &SummaryResult,
) -> Result<(), RewriteError> {
    conn.execute(
        r#"
        INSERT INTO property_summaries (id, property_id, summary)
        VALUES (?1, ?1, ?2)
        ON CONFLICT(id) DO UPDATE SET
            summary = excluded.summary
        "#,
        params![listing_id, summary.summary],
    )
    .map_err(|e| RewriteError::DbError(e.to_string()))?;
    Ok(())
}

pub fn get_summary(
    conn: &Connection,
    listing_id: i64,
) -> Result<Option<SummaryResult>, RewriteError> {
    conn.query_row(
        "SELECT summary FROM property_summaries WHERE property_id = ?1",
        params![listing_id],
        |row| Ok(SummaryResult { summary: row.get(0)? }),
    )
    .optional()
    .map_err(|e| RewriteError::DbError(e.to_string()))
}
