//! Error types for chatmark I/O.
//!
//! Rendering itself never fails; these cover reading input and message
//! history files.

use thiserror::Error;

/// Errors that can occur while loading text to render.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid message history: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UTF-8 decoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type Result<T> = std::result::Result<T, Error>;
