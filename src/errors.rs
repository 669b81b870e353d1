// errors.rs
use thiserror::Error;

use crate::gemini::GeminiError;
use crate::processor::ParseError;

/// Errors originating from either the rewrite logic
/// (parsing model output, remote calls) or downstream layers (DB).
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("Database Error: {0}")]
    DbError(String),

    #[error("Gemini Error: {0}")]
    Gemini(#[from] GeminiError),

    #[error("Parse Error: {0}")]
    Parse(#[from] ParseError),

    #[error("Config Error: {0}")]
    Config(String),
}
