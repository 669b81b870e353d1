use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited ({status}): {message}")]
    RateLimited { status: u16, message: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response decode error: {0}")]
    Decode(String),

    #[error("Response contained no text")]
    EmptyResponse,

    #[error("Client config error: {0}")]
    Config(String),
}

impl GeminiError {
    /// True when the failure signals an exhausted request quota.
    ///
    /// Besides the dedicated variant, the error text is checked for a
    /// standalone `429`, `RESOURCE_EXHAUSTED` or `rate limit`.
    pub fn is_rate_limited(&self) -> bool {
        let text = match self {
            GeminiError::RateLimited { .. } => return true,
            GeminiError::Api { status: 429, .. } => return true,
            GeminiError::Network(msg) | GeminiError::Decode(msg) => msg,
            GeminiError::Api { message, .. } => message,
            GeminiError::EmptyResponse | GeminiError::Config(_) => return false,
        };

        static STATUS_429: OnceLock<Regex> = OnceLock::new();
        let status_429 = STATUS_429.get_or_init(|| Regex::new(r"\b429\b").expect("valid 429 regex"));

        let lower = text.to_lowercase();
        status_429.is_match(&lower)
            || lower.contains("resource_exhausted")
            || lower.contains("rate limit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_variant_is_rate_limited() {
        let err = GeminiError::RateLimited {
            status: 429,
            message: "quota".into(),
        };
        assert!(err.is_rate_limited());
    }

    #[test]
    fn rate_limit_detected_in_message_text() {
        let err = GeminiError::Network("upstream said: 429 Too Many Requests".into());
        assert!(err.is_rate_limited());

        let err = GeminiError::Api {
            status: 503,
            message: "Rate Limit reached for project".into(),
        };
        assert!(err.is_rate_limited());
    }

    #[test]
    fn other_failures_are_not_rate_limited() {
        let err = GeminiError::Api {
            status: 400,
            message: "API key not valid".into(),
        };
        assert!(!err.is_rate_limited());
        assert!(!GeminiError::EmptyResponse.is_rate_limited());
        assert!(!GeminiError::Network("connection reset".into()).is_rate_limited());
    }

    #[test]
    fn digits_containing_429_are_not_rate_limits() {
        let err = GeminiError::Network("error sending request to 10.0.0.1:14290".into());
        assert!(!err.is_rate_limited());

        let err = GeminiError::Api {
            status: 500,
            message: "read 4291 bytes from model-429x".into(),
        };
        assert!(!err.is_rate_limited());

        let err = GeminiError::Network("status=429: too many requests".into());
        assert!(err.is_rate_limited());
    }
}
