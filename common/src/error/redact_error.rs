use crate::ErrorLocation;

use thiserror::Error as ThisError;

/// Raised when something tries to serialize a [`crate::RedactedSecret`].
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Secret Serialization Refused: {message} {location}")]
    Serialization {
        message: String,
        location: ErrorLocation,
    },
}
