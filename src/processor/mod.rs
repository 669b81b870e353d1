mod parse;
mod parse_error;
mod processor;
mod prompts;
mod retry;

pub use parse::{
    parse_rating_review, parse_titled_response, Field, ParsedFields, RATING_MAX, RATING_MIN,
};
pub use parse_error::ParseError;
pub use processor::ResponseProcessor;
pub use retry::{call_with_retry, call_with_retry_and_sleep, RetryPolicy};
