use crate::domain::ListingRecord;
use crate::errors::RewriteError;
use rusqlite::{params, Connection};

/// Up to `limit` listing ids with `id >= from_id`, in id order. Rows are
/// decoded one at a time by `get_listing`, so a malformed row fails alone.
pub fn fetch_listing_ids(
    conn: &Connection,
    from_id: i64,
    limit: usize,
) -> Result<Vec<i64>, RewriteError> {
    let mut stmt = conn
        .prepare("SELECT id FROM hotels WHERE id >= ?1 ORDER BY id LIMIT ?2")
        .map_err(|e| RewriteError::DbError(e.to_string()))?;

    let rows = stmt
        .query_map(params![from_id, limit as i64], |row| row.get(0))
        .map_err(|e| RewriteError::DbError(e.to_string()))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row.map_err(|e| RewriteError::DbError(e.to_string()))?);
    }

    Ok(ids)
}

pub fn get_listing(conn: &Connection, id: i64) -> Result<ListingRecord, RewriteError> {
    conn.query_row(
        r#"
        SELECT
            id,             -- 0
            property_title, -- 1
            location,       -- 2
            room_type,      -- 3
            price,          -- 4
            rating          -- 5
        FROM hotels
        WHERE id = ?1
        "#,
        params![id],
        |row| {
            Ok(ListingRecord {
                id: row.get(0)?,
                title: row.get(1)?,
                location: row.get(2)?,
                room_type: row.get(3)?,
                price: row.get(4)?,
                rating: row.get(5)?,
            })
        },
    )
    .map_err(|e| RewriteError::DbError(format!("listing {id}: {e}")))
}

pub fn count_listings_from(conn: &Connection, from_id: i64) -> Result<i64, RewriteError> {
    conn.query_row(
        "SELECT COUNT(*) FROM hotels WHERE id >= ?1",
        params![from_id],
        |row| row.get(0),
    )
    .map_err(|e| RewriteError::DbError(e.to_string()))
}

pub fn update_listing_title(conn: &Connection, id: i64, title: &str) -> Result<(), RewriteError> {
    let changed = conn
        .execute(
            "UPDATE hotels SET property_title = ?1 WHERE id = ?2",
            params![title, id],
        )
        .map_err(|e| RewriteError::DbError(e.to_string()))?;

    if changed == 0 {
        return Err(RewriteError::DbError(format!("listing {id} not found")));
    }
    Ok(())
}
