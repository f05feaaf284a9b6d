//! Fluent assembly of a single validated [`Request`]

use serde_json::Value;
use std::collections::BTreeMap;

use super::query::join_fields;
use super::request::IF_MATCH;
use super::{Method, QueryParameter, Request};
use crate::api::catalog::{EndpointId, PathTemplate, ServiceId, catalog};
use crate::api::error::ConfigError;

#[derive(Debug, Clone, Copy)]
struct Selection {
    method: Method,
    service: ServiceId,
    endpoint: EndpointId,
    template: PathTemplate,
}

/// Builder for [`Request`] values
///
/// Selecting a method (`get`, `post`, ...) starts a new request: it resolves the
/// endpoint's path template for that method and clears every other slot. The
/// remaining calls fill slots; `build` validates and snapshots them without
/// resetting, so the same builder can be built again or reused by selecting a
/// method anew.
///
/// ```no_run
/// # use scv2_client::api::{RequestBuilder, ServiceId, EndpointId};
/// # fn main() -> Result<(), scv2_client::api::ConfigError> {
/// let request = RequestBuilder::new()
///     .get(ServiceId::Lead, EndpointId::Leads)?
///     .filter("qualificationLevel eq 'HOT'")
///     .select(["id", "name"])
///     .top(50)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    selection: Option<Selection>,
    resource_id: Option<String>,
    path_params: BTreeMap<String, String>,
    params: BTreeMap<String, String>,
    payload: Option<Value>,
    headers: BTreeMap<String, String>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn select_method(
        &mut self,
        method: Method,
        service: ServiceId,
        endpoint: EndpointId,
    ) -> Result<&mut Self, ConfigError> {
        *self = Self::default();
        let template = catalog().resolve_template(endpoint, method)?;
        self.selection = Some(Selection {
            method,
            service,
            endpoint,
            template,
        });
        Ok(self)
    }

    pub fn get(
        &mut self,
        service: ServiceId,
        endpoint: EndpointId,
    ) -> Result<&mut Self, ConfigError> {
        self.select_method(Method::Get, service, endpoint)
    }

    pub fn post(
        &mut self,
        service: ServiceId,
        endpoint: EndpointId,
    ) -> Result<&mut Self, ConfigError> {
        self.select_method(Method::Post, service, endpoint)
    }

    pub fn patch(
        &mut self,
        service: ServiceId,
        endpoint: EndpointId,
    ) -> Result<&mut Self, ConfigError> {
        self.select_method(Method::Patch, service, endpoint)
    }

    pub fn put(
        &mut self,
        service: ServiceId,
        endpoint: EndpointId,
    ) -> Result<&mut Self, ConfigError> {
        self.select_method(Method::Put, service, endpoint)
    }

    pub fn delete(
        &mut self,
        service: ServiceId,
        endpoint: EndpointId,
    ) -> Result<&mut Self, ConfigError> {
        self.select_method(Method::Delete, service, endpoint)
    }

    /// Select any method by value
    pub fn method(
        &mut self,
        method: Method,
        service: ServiceId,
        endpoint: EndpointId,
    ) -> Result<&mut Self, ConfigError> {
        self.select_method(method, service, endpoint)
    }

    pub fn with_resource_id(&mut self, resource_id: impl Into<String>) -> &mut Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Value for a `{name}` placeholder of the endpoint template
    pub fn with_path_param(&mut self, name: impl Into<String>, value: impl ToString) -> &mut Self {
        self.path_params.insert(name.into(), value.to_string());
        self
    }

    pub(crate) fn with_path_params(&mut self, params: BTreeMap<String, String>) -> &mut Self {
        self.path_params.extend(params);
        self
    }

    /// Generic query parameter; later calls with the same key win
    pub fn with_param(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    pub fn with_query_param(
        &mut self,
        param: QueryParameter,
        value: impl Into<String>,
    ) -> &mut Self {
        self.with_param(param.key(), value.into())
    }

    pub fn filter(&mut self, expression: impl Into<String>) -> &mut Self {
        self.with_query_param(QueryParameter::Filter, expression)
    }

    pub fn select<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_query_param(QueryParameter::Select, join_fields(fields))
    }

    pub fn orderby(&mut self, expression: impl Into<String>) -> &mut Self {
        self.with_query_param(QueryParameter::OrderBy, expression)
    }

    pub fn search(&mut self, query: impl Into<String>) -> &mut Self {
        self.with_query_param(QueryParameter::Search, query)
    }

    pub fn top(&mut self, count: u32) -> &mut Self {
        self.with_query_param(QueryParameter::Top, count.to_string())
    }

    pub fn skip(&mut self, count: u32) -> &mut Self {
        self.with_query_param(QueryParameter::Skip, count.to_string())
    }

    pub fn exclude<I, S>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_query_param(QueryParameter::Exclude, join_fields(fields))
    }

    pub fn expand<I, S>(&mut self, relations: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with_query_param(QueryParameter::Expand, join_fields(relations))
    }

    pub fn count(&mut self, count: bool) -> &mut Self {
        self.with_query_param(QueryParameter::Count, count.to_string())
    }

    pub fn with_payload(&mut self, payload: Value) -> &mut Self {
        self.payload = Some(payload);
        self
    }

    /// Set a per-request header; any spelling of `If-Match` replaces the etag
    pub fn with_header(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let mut key = key.into();
        if key.eq_ignore_ascii_case(IF_MATCH) {
            self.headers.retain(|k, _| !k.eq_ignore_ascii_case(IF_MATCH));
            key = IF_MATCH.to_string();
        }
        self.headers.insert(key, value.into());
        self
    }

    /// Concurrency token, sent as `If-Match`
    pub fn with_etag(&mut self, etag: impl Into<String>) -> &mut Self {
        self.with_header(IF_MATCH, etag)
    }

    fn has_etag(&self) -> bool {
        self.headers
            .iter()
            .any(|(k, v)| k.eq_ignore_ascii_case(IF_MATCH) && !v.is_empty())
    }

    /// Validate the slots and produce an immutable request
    ///
    /// Checks run in this order: method selected, path placeholders resolved,
    /// resource id for PATCH/DELETE, payload for POST/PATCH/PUT, `If-Match` for PATCH.
    pub fn build(&self) -> Result<Request, ConfigError> {
        let selection = self.selection.ok_or(ConfigError::MissingRequestType)?;
        let method = selection.method;

        let resolved_path = selection.template.resolve(&self.path_params)?;

        let resource_id = self.resource_id.clone().filter(|id| !id.is_empty());
        if method.requires_resource_id() && resource_id.is_none() {
            return Err(ConfigError::MissingResourceId { method });
        }

        if method.requires_payload() && self.payload.as_ref().is_none_or(is_empty_payload) {
            return Err(ConfigError::MissingPayload { method });
        }

        if method.requires_etag() && !self.has_etag() {
            return Err(ConfigError::MissingETag);
        }

        Ok(Request {
            method,
            service: selection.service,
            endpoint: selection.endpoint,
            resolved_path,
            templated: selection.template.has_placeholders(),
            resource_id,
            params: self.params.clone(),
            payload: self.payload.clone(),
            headers: self.headers.clone(),
        })
    }
}

/// Null, `{}`, `[]` and `""` do not count as a body
pub(crate) fn is_empty_payload(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
