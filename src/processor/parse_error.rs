use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("response is missing the {0} field")]
    MissingField(String),

    #[error("rating is not a number: '{0}'")]
    InvalidRating(String),
}
