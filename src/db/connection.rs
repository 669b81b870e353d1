use rusqlite::Connection;
use std::path::Path;
use tracing::info;

use crate::errors::RewriteError;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// The batch job's single SQLite connection.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RewriteError> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| RewriteError::DbError(format!("Open DB failed: {e}")))?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, RewriteError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RewriteError::DbError(format!("Open DB failed: {e}")))?;
        Ok(Self { conn })
    }

    /// Provides a mutable connection to the closure.
    pub fn with_conn<F, T>(&mut self, f: F) -> Result<T, RewriteError>
    where
        F: FnOnce(&mut Connection) -> Result<T, RewriteError>,
    {
        f(&mut self.conn)
    }
}

/// Apply the bundled schema. Existing tables are left as they are.
pub fn init_db(db: &mut Database) -> Result<(), RewriteError> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|e| RewriteError::DbError(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })?;

    info!("Database schema ready");
    Ok(())
}
