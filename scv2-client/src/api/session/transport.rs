//! The transport boundary consumed by the request and batch layers

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use super::Response;
use crate::api::catalog::{EndpointId, ServiceId, catalog};
use crate::api::error::{TransportError, ValidationError};
use crate::api::request::Method;

/// Addressing shared by every call shape
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub service: ServiceId,
    pub endpoint: EndpointId,
    /// Path below the service segment, resource id included
    pub path: String,
    pub query: BTreeMap<String, String>,
    /// Per-request headers on top of the session defaults
    pub headers: BTreeMap<String, String>,
}

/// A method-specific call, ready for the wire
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get {
        envelope: Envelope,
    },
    Post {
        envelope: Envelope,
        payload: Value,
    },
    Patch {
        envelope: Envelope,
        payload: Value,
        etag: String,
    },
    Put {
        envelope: Envelope,
        payload: Value,
    },
    Delete {
        envelope: Envelope,
    },
}

impl Call {
    pub fn method(&self) -> Method {
        match self {
            Self::Get { .. } => Method::Get,
            Self::Post { .. } => Method::Post,
            Self::Patch { .. } => Method::Patch,
            Self::Put { .. } => Method::Put,
            Self::Delete { .. } => Method::Delete,
        }
    }

    pub fn envelope(&self) -> &Envelope {
        match self {
            Self::Get { envelope }
            | Self::Post { envelope, .. }
            | Self::Patch { envelope, .. }
            | Self::Put { envelope, .. }
            | Self::Delete { envelope } => envelope,
        }
    }

    pub fn path(&self) -> &str {
        &self.envelope().path
    }

    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Post { payload, .. }
            | Self::Patch { payload, .. }
            | Self::Put { payload, .. } => Some(payload),
            Self::Get { .. } | Self::Delete { .. } => None,
        }
    }

    pub fn etag(&self) -> Option<&str> {
        match self {
            Self::Patch { etag, .. } => Some(etag),
            _ => None,
        }
    }
}

/// An authenticated connection able to perform exchanges with the tenant
#[async_trait]
pub trait Transport: Send + Sync {
    /// Check that `endpoint` is registered for `service`
    fn validate(&self, service: ServiceId, endpoint: EndpointId) -> Result<(), ValidationError> {
        if catalog().is_valid_endpoint(service, endpoint) {
            Ok(())
        } else {
            Err(ValidationError::InvalidEndpoint { service, endpoint })
        }
    }

    /// Perform one exchange
    async fn execute(&self, call: Call) -> Result<Response, TransportError>;

    /// Release the underlying connection; calling it again is a no-op
    fn close(&self);
}
