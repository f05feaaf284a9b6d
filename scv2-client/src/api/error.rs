//! Error taxonomy for the Sales/Service Cloud V2 client
//!
//! Three families of failure are kept apart:
//! - configuration errors, raised while a request or batch is being assembled
//! - validation errors, raised when an endpoint is not registered for a service
//! - transport errors, raised by the session while talking to the tenant

use thiserror::Error;

use crate::api::catalog::{EndpointId, ServiceId};
use crate::api::request::Method;

/// Boxed cause carried by transport errors
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Crate-wide result alias
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Programmer-facing errors raised before any I/O happens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Request type is required")]
    MissingRequestType,

    #[error("Resource ID is required for {method} requests")]
    MissingResourceId { method: Method },

    #[error("Payload is required for {method} requests")]
    MissingPayload { method: Method },

    #[error("ETag (If-Match header) is required for PATCH requests")]
    MissingETag,

    #[error("Missing required path parameter: {name}")]
    MissingPathParameter { name: String },

    #[error("Request ID '{0}' is already in use")]
    DuplicateRequestId(String),

    #[error("Parent request '{depends_on}' of request '{id}' not found")]
    UnknownDependency { id: String, depends_on: String },

    #[error(
        "Endpoint {endpoint} doesn't support {method} method. Supported methods are: {}",
        join_methods(.supported)
    )]
    UnsupportedMethod {
        endpoint: EndpointId,
        method: Method,
        supported: Vec<Method>,
    },

    #[error("Invalid request specification: {0}")]
    InvalidRequestSpec(String),

    #[error("Invalid transform: {0}")]
    InvalidTransform(String),

    #[error("Unsupported request type: {0}")]
    UnsupportedRequestType(String),

    #[error("Invalid session configuration: {0}")]
    InvalidSessionConfig(String),
}

fn join_methods(methods: &[Method]) -> String {
    methods
        .iter()
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// The endpoint is not part of the endpoint set registered for the service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Endpoint {endpoint} is not defined on service {service}")]
    InvalidEndpoint {
        service: ServiceId,
        endpoint: EndpointId,
    },
}

/// Failures raised by the transport session, always carrying their cause
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(#[source] BoxError),

    #[error("Request timed out: {0}")]
    Timeout(#[source] BoxError),

    #[error("Request error: {0}")]
    Request(#[source] BoxError),
}

/// Any failure the client can report
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The tenant answered, but with a non-success status
    #[error("HTTP {status} returned by {method} {path}")]
    Status {
        method: Method,
        path: String,
        status: u16,
        body: serde_json::Value,
    },
}

impl Error {
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// The configuration error behind this error, if any
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unsupported_method_lists_supported_methods() {
        let err = ConfigError::UnsupportedMethod {
            endpoint: EndpointId::SurveyDesign,
            method: Method::Post,
            supported: vec![Method::Get, Method::Delete],
        };

        assert_eq!(
            err.to_string(),
            "Endpoint SurveyDesign doesn't support POST method. Supported methods are: GET,DELETE"
        );
    }

    #[test]
    fn test_transport_error_keeps_cause() {
        let err = TransportError::Timeout("deadline elapsed".into());

        assert_eq!(err.to_string(), "Request timed out: deadline elapsed");
        assert_eq!(err.source().unwrap().to_string(), "deadline elapsed");
    }

    #[test]
    fn test_error_kinds_stay_distinct() {
        let config: Error = ConfigError::MissingETag.into();
        let validation: Error = ValidationError::InvalidEndpoint {
            service: ServiceId::Lead,
            endpoint: EndpointId::Accounts,
        }
        .into();
        let transport: Error = TransportError::Connection("refused".into()).into();

        assert!(config.is_config() && !config.is_validation());
        assert!(validation.is_validation() && !validation.is_config());
        assert!(transport.is_transport());
        assert_eq!(config.as_config(), Some(&ConfigError::MissingETag));
        assert_eq!(
            validation.to_string(),
            "Endpoint Accounts is not defined on service lead-service"
        );
    }
}
