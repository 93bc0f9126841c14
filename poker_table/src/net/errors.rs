//! Network error types for framing and serialization.

use thiserror::Error;

/// Errors that can occur while reading or writing a framed message.
#[derive(Debug, Error)]
pub enum NetError {
    /// The underlying stream failed or closed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to encode a message.
    #[error("failed to encode message: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    /// Failed to decode a message.
    #[error("failed to decode message: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    /// Message size exceeded maximum allowed.
    #[error("message size {actual} exceeds maximum {max}")]
    MessageTooLarge { actual: usize, max: usize },
}

/// Result type for framed network operations.
pub type Result<T> = std::result::Result<T, NetError>;
