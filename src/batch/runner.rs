// runner.rs
use crate::batch::BatchReport;
use crate::db::listings::{
    count_listings_from, fetch_listing_ids, get_listing, update_listing_title,
};
use crate::db::reviews::upsert_review;
use crate::db::runs::{end_rewrite_run, start_rewrite_run};
use crate::db::summaries::upsert_summary;
use crate::db::Database;
use crate::domain::ListingRecord;
use crate::errors::RewriteError;
use crate::gemini::TextGenerator;
use crate::processor::ResponseProcessor;
use chrono::Utc;
use tracing::{debug, error, info};

/// Walks the listings table in id order and enriches one listing at a time.
pub struct BatchRunner<'a, G: TextGenerator + ?Sized> {
    db: &'a mut Database,
    processor: ResponseProcessor<'a, G>,
}

impl<'a, G: TextGenerator + ?Sized> BatchRunner<'a, G> {
    pub fn new(db: &'a mut Database, processor: ResponseProcessor<'a, G>) -> Self {
        Self { db, processor }
    }

    /// Process every listing with `id >= start_from`, fetching `batch_size`
    /// rows at a time. Per-listing failures land in the report; only
    /// database failures outside a listing's own transaction abort the run.
    pub fn run(&mut self, start_from: i64, batch_size: usize) -> Result<BatchReport, RewriteError> {
        let batch_size = batch_size.max(1);
        let started_at = Utc::now().timestamp();

        let (run_id, total) = self.db.with_conn(|conn| {
            let run_id = start_rewrite_run(conn, start_from, batch_size, started_at)?;
            let total = count_listings_from(conn, start_from)?;
            Ok((run_id, total))
        })?;

        info!(
            run_id,
            start_from,
            batch_size,
            total,
            "Starting property rewrite process"
        );

        let mut report = BatchReport::new(total.max(0) as usize);
        let result = self.process_from(start_from, batch_size, &mut report);

        let finished_at = Utc::now().timestamp();
        let abort_reason = result.as_ref().err().map(|e| e.to_string());
        self.db.with_conn(|conn| {
            end_rewrite_run(
                conn,
                run_id,
                finished_at,
                report.processed,
                report.failed(),
                abort_reason,
            )
        })?;

        result.map(|_| report)
    }

    fn process_from(
        &mut self,
        start_from: i64,
        batch_size: usize,
        report: &mut BatchReport,
    ) -> Result<(), RewriteError> {
        let mut cursor = start_from;

        loop {
            let page = self
                .db
                .with_conn(|conn| fetch_listing_ids(conn, cursor, batch_size))?;

            let Some(&last) = page.last() else {
                break;
            };
            cursor = last + 1;
            debug!(listings = page.len(), next_cursor = cursor, "Fetched page");

            for &id in &page {
                let outcome = self
                    .db
                    .with_conn(|conn| get_listing(conn, id))
                    .and_then(|listing| self.process_listing(&listing));

                match outcome {
                    Ok(()) => report.record_success(),
                    Err(e) => {
                        let msg = format!("Error processing property {id}: {e}");
                        error!(listing_id = id, "{msg}");
                        report.record_failure(msg);
                    }
                }

                info!(
                    "Processed {}/{} properties. Errors: {}",
                    report.processed,
                    report.total,
                    report.failed()
                );
            }

            if page.len() < batch_size {
                break;
            }
        }

        Ok(())
    }

    /// Rewrite, summarize and review one listing, then write all three
    /// results in a single transaction.
    pub fn process_listing(&mut self, listing: &ListingRecord) -> Result<(), RewriteError> {
        let rewrite = self.processor.rewrite(listing)?;
        debug!(
            listing_id = listing.id,
            title = %rewrite.title,
            description = %rewrite.description,
            "Rewrote listing"
        );

        // Summary and review describe the listing under its new title.
        let rewritten = listing.with_title(&rewrite.title);
        let summary = self.processor.summarize(&rewritten)?;
        let review = self.processor.review(&rewritten)?;

        self.db.with_conn(|conn| {
            let tx = conn
                .transaction()
                .map_err(|e| RewriteError::DbError(e.to_string()))?;

            update_listing_title(&tx, listing.id, &rewrite.title)?;
            upsert_summary(&tx, listing.id, &summary)?;
            upsert_review(&tx, listing.id, &review)?;

            tx.commit()
                .map_err(|e| RewriteError::DbError(e.to_string()))
        })
    }
}
