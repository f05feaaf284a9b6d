//! The immutable, fully-resolved request value

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::Method;
use crate::api::catalog::{EndpointId, ServiceId};

/// Name of the concurrency token header
pub const IF_MATCH: &str = "If-Match";

/// One fully-resolved call against the API
///
/// Only produced by [`RequestBuilder::build`](super::RequestBuilder::build), which
/// guarantees the per-method requirements hold. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub(super) method: Method,
    pub(super) service: ServiceId,
    pub(super) endpoint: EndpointId,
    pub(super) resolved_path: String,
    /// Whether the endpoint template had placeholders
    pub(super) templated: bool,
    pub(super) resource_id: Option<String>,
    pub(super) params: BTreeMap<String, String>,
    pub(super) payload: Option<Value>,
    pub(super) headers: BTreeMap<String, String>,
}

impl Request {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn service(&self) -> ServiceId {
        self.service
    }

    pub fn endpoint(&self) -> EndpointId {
        self.endpoint
    }

    /// Endpoint path after placeholder substitution, without the resource id
    pub fn resolved_path(&self) -> &str {
        &self.resolved_path
    }

    pub fn resource_id(&self) -> Option<&str> {
        self.resource_id.as_deref()
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Value of the `If-Match` header
    pub fn etag(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(IF_MATCH))
            .map(|(_, v)| v.as_str())
    }

    /// Path below the service segment as it goes on the wire
    ///
    /// The resource id becomes an extra segment unless the endpoint template
    /// already encodes the record through a placeholder.
    pub fn wire_path(&self) -> String {
        match &self.resource_id {
            Some(id) if !self.templated && !id.is_empty() => {
                format!("{}/{}", self.resolved_path, urlencoding::encode(id))
            }
            _ => self.resolved_path.clone(),
        }
    }
}
