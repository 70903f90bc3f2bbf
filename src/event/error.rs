//! Wide event error types

use thiserror::Error;

/// Errors surfaced when flushing a wide event.
///
/// A `Serialization` error does not mean the record was lost: the offending
/// value is stringified in place and the rest of the record is still written.
#[derive(Error, Debug)]
pub enum WideEventError {
    #[error("Failed to serialize '{field}': {message}")]
    Serialization { field: String, message: String },

    #[error("Failed to write event: {0}")]
    Io(#[from] std::io::Error),
}
