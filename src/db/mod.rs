pub mod connection;
pub mod listings;
pub mod reviews;
pub mod runs;
pub mod summaries;

pub use connection::{init_db, Database};
