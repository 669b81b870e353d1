mod report;
mod runner;

pub use report::BatchReport;
pub use runner::BatchRunner;
