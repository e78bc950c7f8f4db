use http::StatusCode;
use thiserror::Error;

/// Failures raised while resolving a request context.
///
/// Only the host is mandatory; every other field degrades to a typed default
/// instead of producing an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("request host could not be determined and no override is configured")]
    HostUnresolved,
    #[error("invalid host override: {message}")]
    InvalidOverride { message: String },
    #[error("malformed route: {message}")]
    MalformedRoute { message: String },
}

impl ContextError {
    pub fn invalid_override(message: impl Into<String>) -> Self {
        ContextError::InvalidOverride {
            message: message.into(),
        }
    }

    pub fn malformed_route(message: impl Into<String>) -> Self {
        ContextError::MalformedRoute {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ContextError::HostUnresolved => StatusCode::BAD_REQUEST,
            ContextError::InvalidOverride { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ContextError::MalformedRoute { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}
