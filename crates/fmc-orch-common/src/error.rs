//! Error types for resource lifecycle operations.
//!
//! This module defines the errors shared by every FMC resource crate.
//! All errors implement `std::error::Error` via `thiserror`.

use thiserror::Error;

/// Result type alias for resource lifecycle operations.
pub type FmcResult<T> = Result<T, FmcError>;

/// Errors that can occur while driving a resource through its lifecycle.
#[derive(Debug, Error)]
pub enum FmcError {
    /// The operation is deliberately not supported for this resource.
    #[error("{operation} not implemented")]
    Unsupported {
        /// The refused operation (e.g., "update").
        operation: String,
    },

    /// The operation needs a remote identifier but the record has none.
    #[error("{resource} has no identifier; it is not managed yet")]
    Unmanaged {
        /// The resource kind.
        resource: String,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl FmcError {
    /// Creates an unsupported operation error.
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Creates an unmanaged resource error.
    pub fn unmanaged(resource: impl Into<String>) -> Self {
        Self::Unmanaged {
            resource: resource.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_display() {
        let err = FmcError::unsupported("update");
        assert_eq!(err.to_string(), "update not implemented");
    }

    #[test]
    fn test_unmanaged_display() {
        let err = FmcError::unmanaged("access rule");
        assert!(err.to_string().starts_with("access rule has no identifier"));
    }
}
