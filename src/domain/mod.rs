pub mod listing;

pub use listing::{ListingRecord, ReviewResult, RewriteResult, SummaryResult};
