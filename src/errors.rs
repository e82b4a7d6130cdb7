//! Error types shared by every module of the crate.

use std::io;
use thiserror::Error;

/// Rejection reasons for user-typed numbers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no numbers given")]
    Empty,

    #[error("not a number: {0}")]
    NotANumber(String),

    #[error("expected 6 numbers, got {0}")]
    WrongCount(usize),

    #[error("number out of range 1-60: {0}")]
    OutOfRange(i64),

    #[error("duplicate number: {0}")]
    Duplicate(u8),

    #[error("invalid contest number: {0}")]
    InvalidContest(String),
}

/// Failures talking to the draw-results API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("upstream request timed out")]
    Timeout,

    #[error("upstream transport error: {0}")]
    Transport(String),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("contest {0} not found")]
    ContestNotFound(u32),

    #[error("malformed upstream payload: {0}")]
    Malformed(String),

    #[error("upstream payload has no drawn numbers")]
    MissingNumbers,
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO / storage
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Domain
    // ---------------------------
    #[error("Invalid input: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Results unavailable: {0}")]
    Fetch(#[from] FetchError),

    // ---------------------------
    // Config
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;
