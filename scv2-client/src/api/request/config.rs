//! Typed, per-method request descriptions
//!
//! A [`RequestConfig`] is what batch entries are declared with and what a
//! dependent-request transform returns. It is turned into a [`Request`] through
//! the same builder validation as a hand-built request.

use serde_json::Value;
use std::collections::BTreeMap;

use super::{Method, QueryOptions, Request, RequestBuilder};
use crate::api::catalog::{EndpointId, ServiceId};
use crate::api::error::ConfigError;

/// The service, endpoint and path parameters a request addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub service: ServiceId,
    pub endpoint: EndpointId,
    pub path_params: BTreeMap<String, String>,
}

impl Target {
    pub fn new(service: ServiceId, endpoint: EndpointId) -> Self {
        Self {
            service,
            endpoint,
            path_params: BTreeMap::new(),
        }
    }

    pub fn with_path_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path_params.insert(name.into(), value.to_string());
        self
    }
}

impl From<(ServiceId, EndpointId)> for Target {
    fn from((service, endpoint): (ServiceId, EndpointId)) -> Self {
        Self::new(service, endpoint)
    }
}

/// A request description with the fields each method takes
#[derive(Debug, Clone, PartialEq)]
pub enum RequestConfig {
    Get {
        target: Target,
        resource_id: Option<String>,
        query: QueryOptions,
    },
    Post {
        target: Target,
        payload: Value,
    },
    Patch {
        target: Target,
        resource_id: String,
        payload: Value,
        etag: String,
    },
    Put {
        target: Target,
        resource_id: Option<String>,
        payload: Value,
    },
    Delete {
        target: Target,
        resource_id: String,
    },
}

impl RequestConfig {
    /// GET of a collection, without query options
    pub fn get(target: impl Into<Target>) -> Self {
        Self::Get {
            target: target.into(),
            resource_id: None,
            query: QueryOptions::default(),
        }
    }

    /// GET of a single record
    pub fn get_one(target: impl Into<Target>, resource_id: impl Into<String>) -> Self {
        Self::Get {
            target: target.into(),
            resource_id: Some(resource_id.into()),
            query: QueryOptions::default(),
        }
    }

    /// GET of a collection with query options
    pub fn query(target: impl Into<Target>, query: QueryOptions) -> Self {
        Self::Get {
            target: target.into(),
            resource_id: None,
            query,
        }
    }

    pub fn post(target: impl Into<Target>, payload: Value) -> Self {
        Self::Post {
            target: target.into(),
            payload,
        }
    }

    pub fn patch(
        target: impl Into<Target>,
        resource_id: impl Into<String>,
        payload: Value,
        etag: impl Into<String>,
    ) -> Self {
        Self::Patch {
            target: target.into(),
            resource_id: resource_id.into(),
            payload,
            etag: etag.into(),
        }
    }

    pub fn put(target: impl Into<Target>, resource_id: Option<String>, payload: Value) -> Self {
        Self::Put {
            target: target.into(),
            resource_id,
            payload,
        }
    }

    pub fn delete(target: impl Into<Target>, resource_id: impl Into<String>) -> Self {
        Self::Delete {
            target: target.into(),
            resource_id: resource_id.into(),
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::Get { .. } => Method::Get,
            Self::Post { .. } => Method::Post,
            Self::Patch { .. } => Method::Patch,
            Self::Put { .. } => Method::Put,
            Self::Delete { .. } => Method::Delete,
        }
    }

    pub fn target(&self) -> &Target {
        match self {
            Self::Get { target, .. }
            | Self::Post { target, .. }
            | Self::Patch { target, .. }
            | Self::Put { target, .. }
            | Self::Delete { target, .. } => target,
        }
    }

    /// Validate through [`RequestBuilder`] and produce the immutable request
    pub fn into_request(self) -> Result<Request, ConfigError> {
        let method = self.method();
        let mut builder = RequestBuilder::new();

        let target = match self {
            Self::Get {
                target,
                resource_id,
                query,
            } => {
                builder.method(method, target.service, target.endpoint)?;
                if let Some(resource_id) = resource_id {
                    builder.with_resource_id(resource_id);
                }
                query.apply(&mut builder);
                target
            }
            Self::Post { target, payload } => {
                builder
                    .method(method, target.service, target.endpoint)?
                    .with_payload(payload);
                target
            }
            Self::Patch {
                target,
                resource_id,
                payload,
                etag,
            } => {
                builder
                    .method(method, target.service, target.endpoint)?
                    .with_resource_id(resource_id)
                    .with_payload(payload)
                    .with_etag(etag);
                target
            }
            Self::Put {
                target,
                resource_id,
                payload,
            } => {
                builder
                    .method(method, target.service, target.endpoint)?
                    .with_payload(payload);
                if let Some(resource_id) = resource_id {
                    builder.with_resource_id(resource_id);
                }
                target
            }
            Self::Delete {
                target,
                resource_id,
            } => {
                builder
                    .method(method, target.service, target.endpoint)?
                    .with_resource_id(resource_id);
                target
            }
        };

        builder.with_path_params(target.path_params).build()
    }
}
