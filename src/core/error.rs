use thiserror::Error;

/// Errors raised by the matching core
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
