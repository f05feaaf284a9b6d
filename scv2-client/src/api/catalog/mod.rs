//! Endpoint catalog
//!
//! A closed table mapping each service to the endpoints it declares, and each
//! endpoint to a path template per HTTP method. The table is built once, on first
//! use, and is read-only afterwards, so it can be shared freely across threads.

pub mod endpoints;
pub mod services;
pub mod template;

pub use endpoints::EndpointId;
pub use services::ServiceId;
pub use template::PathTemplate;

use once_cell::sync::Lazy;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

use crate::api::error::ConfigError;
use crate::api::request::Method;
use endpoints::Routes;

static CATALOG: Lazy<Catalog> = Lazy::new(Catalog::build);

/// The process-wide endpoint catalog
pub fn catalog() -> &'static Catalog {
    &CATALOG
}

/// Completeness problems found by [`Catalog::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("service {0} declares no endpoints")]
    EmptyService(ServiceId),
    #[error("endpoint {0} has no path template")]
    NoRoutes(EndpointId),
    #[error("endpoint {0} has an empty template for {1}")]
    EmptyTemplate(EndpointId, Method),
}

#[derive(Debug, Clone)]
struct EndpointEntry {
    service: ServiceId,
    templates: BTreeMap<Method, PathTemplate>,
}

/// Precomputed service -> endpoint -> (method -> template) table
#[derive(Debug, Clone)]
pub struct Catalog {
    services: HashMap<ServiceId, BTreeSet<EndpointId>>,
    endpoints: HashMap<EndpointId, EndpointEntry>,
}

impl Catalog {
    fn build() -> Self {
        let mut services: HashMap<ServiceId, BTreeSet<EndpointId>> = HashMap::new();
        let mut endpoints = HashMap::new();

        for service in ServiceId::ALL {
            services.entry(service).or_default();
        }

        for &endpoint in EndpointId::ALL {
            let templates = match endpoint.routes() {
                Routes::Uniform(path) => Method::ALL
                    .iter()
                    .map(|&method| (method, PathTemplate::new(path)))
                    .collect(),
                Routes::PerMethod(routes) => routes
                    .iter()
                    .map(|&(method, path)| (method, PathTemplate::new(path)))
                    .collect(),
            };

            let service = endpoint.service();
            services.entry(service).or_default().insert(endpoint);
            endpoints.insert(endpoint, EndpointEntry { service, templates });
        }

        Self {
            services,
            endpoints,
        }
    }

    /// True iff `endpoint` belongs to the endpoint set registered for `service`
    pub fn is_valid_endpoint(&self, service: ServiceId, endpoint: EndpointId) -> bool {
        self.services
            .get(&service)
            .is_some_and(|set| set.contains(&endpoint))
    }

    /// Path template of `endpoint` for `method`
    pub fn resolve_template(
        &self,
        endpoint: EndpointId,
        method: Method,
    ) -> Result<PathTemplate, ConfigError> {
        self.endpoints
            .get(&endpoint)
            .and_then(|entry| entry.templates.get(&method).copied())
            .ok_or_else(|| ConfigError::UnsupportedMethod {
                endpoint,
                method,
                supported: self.supported_methods(endpoint),
            })
    }

    /// Methods for which `endpoint` has a template, in GET, POST, PATCH, PUT, DELETE order
    pub fn supported_methods(&self, endpoint: EndpointId) -> Vec<Method> {
        self.endpoints
            .get(&endpoint)
            .map(|entry| entry.templates.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Endpoints declared by `service`
    pub fn endpoints(&self, service: ServiceId) -> impl Iterator<Item = EndpointId> + '_ {
        self.services
            .get(&service)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// The service owning `endpoint`
    pub fn service_of(&self, endpoint: EndpointId) -> Option<ServiceId> {
        self.endpoints.get(&endpoint).map(|entry| entry.service)
    }

    /// Check the table for completeness
    pub fn validate(&self) -> Result<(), CatalogError> {
        for service in ServiceId::ALL {
            if self.services.get(&service).is_none_or(|set| set.is_empty()) {
                return Err(CatalogError::EmptyService(service));
            }
        }

        for &endpoint in EndpointId::ALL {
            let Some(entry) = self.endpoints.get(&endpoint) else {
                return Err(CatalogError::NoRoutes(endpoint));
            };
            if entry.templates.is_empty() {
                return Err(CatalogError::NoRoutes(endpoint));
            }
            if let Some((&method, _)) = entry
                .templates
                .iter()
                .find(|(_, t)| t.as_str().is_empty())
            {
                return Err(CatalogError::EmptyTemplate(endpoint, method));
            }
        }

        Ok(())
    }
}
