//! Producer error types

use contracts::Operation;
use identity_client::IdentityClientError;
use thiserror::Error;

/// Producer-specific errors
///
/// Every variant is scoped to a single message: the producer turns it into a
/// fault on that message and moves on.
#[derive(Debug, Error)]
pub enum ProducerError {
    /// Operation header missing (and no endpoint default) or not recognized
    #[error("{}", describe_unsupported(.operation))]
    UnsupportedOperation { operation: Option<String> },

    /// Required header absent or blank
    #[error("missing required header '{header}'")]
    MissingHeader { header: String },

    /// Body holds a different payload than the operation needs
    #[error("expected {expected} body, found {found}")]
    InvalidBody {
        expected: &'static str,
        found: &'static str,
    },

    /// Client call returned an error
    #[error("{operation} failed: {source}")]
    RemoteCall {
        operation: Operation,
        #[source]
        source: IdentityClientError,
    },

    /// Client call completed but reported failure
    #[error("{action} failed: {message} (code {code})")]
    RemoteActionFailure {
        action: String,
        message: String,
        code: u16,
    },

    /// Route queue full - message rejected
    #[error("route queue full, message rejected")]
    QueueFull,

    /// Route worker no longer running
    #[error("route closed")]
    RouteClosed,
}

fn describe_unsupported(operation: &Option<String>) -> String {
    match operation {
        Some(name) => format!("unsupported operation '{name}'"),
        None => "unsupported operation: no operation specified".to_string(),
    }
}

impl ProducerError {
    pub fn unsupported(operation: Option<&str>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.map(str::to_string),
        }
    }

    pub fn missing_header(header: impl Into<String>) -> Self {
        Self::MissingHeader {
            header: header.into(),
        }
    }

    pub fn remote_call(operation: Operation, source: IdentityClientError) -> Self {
        Self::RemoteCall { operation, source }
    }

    /// Short label used for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedOperation { .. } => "unsupported_operation",
            Self::MissingHeader { .. } => "missing_header",
            Self::InvalidBody { .. } => "invalid_body",
            Self::RemoteCall { .. } => "remote_call",
            Self::RemoteActionFailure { .. } => "remote_action_failure",
            Self::QueueFull => "queue_full",
            Self::RouteClosed => "route_closed",
        }
    }
}
