//! Tracker error taxonomy.
//! Every failure is terminal for the run; classification only decides the
//! message the user sees.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("authentication failed: incorrect username or API token")]
    AuthRejected,

    #[error("authentication failed: forbidden, check your permissions")]
    Forbidden,

    #[error("tracker endpoint not found: check the server URL")]
    NotFound,

    #[error("invalid date format: {0}. Please use 'YYYY-MM-DD'")]
    InvalidDate(String),

    #[error("tracker error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("configuration error: {0}")]
    Config(String),
}
