use crate::errors::RewriteError;
use rusqlite::{params, Connection};

#[derive(Debug)]
pub struct RewriteRun {
    pub id: i64,
    pub start_from: i64,
    pub batch_size: i64,
    pub started_at: i64,
    pub finished_at: Option<i64>,
    pub processed: Option<i64>,
    pub failed: Option<i64>,
    pub success: bool,
    pub error_message: Option<String>,
}

pub fn start_rewrite_run(
    conn: &Connection,
    start_from: i64,
    batch_size: usize,
    now: i64,
) -> Result<i64, RewriteError> {
    conn.execute(
        "INSERT INTO rewrite_runs (start_from, batch_size, started_at, success) VALUES (?, ?, ?, 0)",
        params![start_from, batch_size as i64, now],
    )
    .map_err(|e| RewriteError::DbError(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

pub fn end_rewrite_run(
    conn: &Connection,
    run_id: i64,
    now: i64,
    processed: usize,
    failed: usize,
    error: Option<String>,
) -> Result<(), RewriteError> {
    conn.execute(
        "UPDATE rewrite_runs SET finished_at = ?, processed = ?, failed = ?, success = ?, error_message = ? WHERE id = ?",
        params![now, processed as i64, failed as i64, error.is_none(), error, run_id],
    )
    .map_err(|e| RewriteError::DbError(e.to_string()))?;
    Ok(())
}

pub fn get_recent_runs(conn: &Connection, limit: usize) -> Result<Vec<RewriteRun>, RewriteError> {
    let mut stmt = conn
        .prepare(
            "SELECT id, start_from, batch_size, started_at, finished_at, processed, failed, success, error_message \
             FROM rewrite_runs ORDER BY started_at DESC, id DESC LIMIT ?",
        )
        .map_err(|e| RewriteError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![limit as i64], |row| {
            Ok(RewriteRun {
                id: row.get(0)?,
                start_from: row.get(1)?,
                batch_size: row.get(2)?,
                started_at: row.get(3)?,
                finished_at: row.get(4)?,
                processed: row.get(5)?,
                failed: row.get(6)?,
                success: row.get(7)?,
                error_message: row.get(8)?,
            })
        })
        .map_err(|e| RewriteError::DbError(e.to_string()))?;

    let mut runs = Vec::new();
    for r in rows {
        runs.push(r.map_err(|e| RewriteError::DbError(e.to_string()))?);
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::init_test_db;

    #[test]
    fn run_lifecycle_is_recorded() {
        let mut db = init_test_db();
        db.with_conn(|conn| {
            let first = start_rewrite_run(conn, 0, 10, 100)?;
            end_rewrite_run(conn, first, 160, 8, 2, None)?;

            let second = start_rewrite_run(conn, 50, 5, 200)?;

            let runs = get_recent_runs(conn, 10)?;
            assert_eq!(runs.len(), 2);

            assert_eq!(runs[0].id, second);
            assert_eq!(runs[0].start_from, 50);
            assert!(runs[0].finished_at.is_none());
            assert!(!runs[0].success);

            assert_eq!(runs[1].id, first);
            assert_eq!(runs[1].finished_at, Some(160));
            assert_eq!(runs[1].processed, Some(8));
            assert_eq!(runs[1].failed, Some(2));
            assert!(runs[1].success);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn aborted_run_keeps_error() {
        let mut db = init_test_db();
        db.with_conn(|conn| {
            let id = start_rewrite_run(conn, 0, 10, 100)?;
            end_rewrite_run(conn, id, 101, 0, 0, Some("disk full".into()))?;

            let runs = get_recent_runs(conn, 1)?;
            assert!(!runs[0].success);
            assert_eq!(runs[0].error_message.as_deref(), Some("disk full"));
            Ok(())
        })
        .unwrap();
    }
}
