mod client;
mod gemini_error;
mod models;

pub use client::{GeminiClient, TextGenerator};
pub use gemini_error::GeminiError;
