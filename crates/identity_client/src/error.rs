//! Identity client error types

use thiserror::Error;

/// Errors raised by a `GroupService` call
#[derive(Debug, Error)]
pub enum IdentityClientError {
    /// Service cannot be reached
    #[error("identity service unavailable: {message}")]
    Unavailable { message: String },

    /// Referenced group does not exist
    #[error("group '{group_id}' not found")]
    NotFound { group_id: String },

    /// Group name already taken in the domain
    #[error("group '{name}' already exists in domain '{domain_id}'")]
    Conflict { name: String, domain_id: String },

    /// Request rejected before reaching the service
    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl IdentityClientError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn not_found(group_id: impl Into<String>) -> Self {
        Self::NotFound {
            group_id: group_id.into(),
        }
    }

    pub fn conflict(name: impl Into<String>, domain_id: impl Into<String>) -> Self {
        Self::Conflict {
            name: name.into(),
            domain_id: domain_id.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, IdentityClientError>;
