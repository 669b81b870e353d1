use crate::domain::ReviewResult;
use crate::errors::RewriteError;
use crate::processor::{RATING_MAX, RATING_MIN};
use rusqlite::{params, Connection, OptionalExtension};

/// One review per listing; the row id mirrors the listing id.
pub fn upsert_review(
    conn: &Connection,
    listing_id: i64,
    review: &ReviewResult,
) -> Result<(), RewriteError> {
    if !(RATING_MIN..=RATING_MAX).contains(&review.rating) {
        return Err(RewriteError::DbError(format!(
            "rating {} outside [{RATING_MIN}, {RATING_MAX}] for listing {listing_id}",
            review.rating
        )));
    }

    conn.execute(
        r#"
        INSERT INTO property_reviews (id, property_id, rating, review)
        VALUES (?1, ?1, ?2, ?3)
        ON CONFLICT(id) DO UPDATE SET
            rating = excluded.rating,
            review = excluded.review
        "#,
        params![listing_id, review.rating, review.review],
    )
    .map_err(|e| RewriteError::DbError(e.to_string()))?;
    Ok(())
}

pub fn get_review(
    conn: &Connection,
    listing_id: i64,
) -> Result<Option<ReviewResult>, RewriteError> {
    conn.query_row(
        "SELECT rating, review FROM property_reviews WHERE property_id = ?1",
        params![listing_id],
        |row| {
            Ok(ReviewResult {
                rating: row.get(0)?,
                review: row.get(1)?,
            })
        },
    )
    .optional()
    .map_err(|e| RewriteError::DbError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::utils::{init_test_db, insert_listing};

    #[test]
    fn upsert_and_read_back() {
        let mut db = init_test_db();
        db.with_conn(|conn| {
            insert_listing(conn, 1, "Room", None);

            let review = ReviewResult {
                rating: 4.0,
                review: "Nice.".into(),
            };
            upsert_review(conn, 1, &review)?;
            assert_eq!(get_review(conn, 1)?, Some(review));

            let again = ReviewResult {
                rating: 2.5,
                review: "Meh.".into(),
            };
            upsert_review(conn, 1, &again)?;
            assert_eq!(get_review(conn, 1)?, Some(again));
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let mut db = init_test_db();
        db.with_conn(|conn| {
            insert_listing(conn, 1, "Room", None);

            let err = upsert_review(
                conn,
                1,
                &ReviewResult {
                    rating: 6.0,
                    review: "too good".into(),
                },
            );
            assert!(matches!(err, Err(RewriteError::DbError(_))));
            assert!(get_review(conn, 1)?.is_none());
            Ok(())
        })
        .unwrap();
    }
}
