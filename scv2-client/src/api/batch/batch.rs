//! Named collection of requests, some depending on others

use serde_json::Value;
use std::collections::HashMap;

use super::entry::{BatchEntry, EntryKind, Transform};
use super::executor::{BatchExecutor, BatchOptions};
use super::result::BatchResult;
use crate::api::catalog::{EndpointId, ServiceId};
use crate::api::error::ConfigError;
use crate::api::request::{QueryOptions, RequestConfig, Target};
use crate::api::session::{Response, Transport};

/// A batch of requests executed together
///
/// Entries are validated when added, so a batch that was assembled without
/// error only fails per entry at run time. Ids are unique; the id to position
/// index is rebuilt on every removal.
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    entries: Vec<BatchEntry>,
    index: HashMap<String, usize>,
}

impl BatchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_id(&self, id: &str) -> Result<(), ConfigError> {
        if id.is_empty() {
            return Err(ConfigError::InvalidRequestSpec(
                "request id cannot be empty".to_string(),
            ));
        }
        if self.index.contains_key(id) {
            return Err(ConfigError::DuplicateRequestId(id.to_string()));
        }
        Ok(())
    }

    fn push(&mut self, entry: BatchEntry) -> &mut Self {
        log::debug!("Added batch entry '{}' (priority {})", entry.id, entry.priority);
        self.index.insert(entry.id.clone(), self.entries.len());
        self.entries.push(entry);
        self
    }

    /// Add a direct request described by `config`
    pub fn add(
        &mut self,
        id: impl Into<String>,
        config: RequestConfig,
        priority: i32,
    ) -> Result<&mut Self, ConfigError> {
        let id = id.into();
        self.check_id(&id)?;
        let request = config.into_request()?;

        Ok(self.push(BatchEntry {
            id,
            priority,
            kind: EntryKind::Direct(request),
        }))
    }

    pub fn add_get(
        &mut self,
        id: impl Into<String>,
        service: ServiceId,
        endpoint: EndpointId,
        priority: i32,
        resource_id: Option<&str>,
        query: QueryOptions,
    ) -> Result<&mut Self, ConfigError> {
        let config = RequestConfig::Get {
            target: Target::new(service, endpoint),
            resource_id: resource_id.map(str::to_string),
            query,
        };
        self.add(id, config, priority)
    }

    pub fn add_post(
        &mut self,
        id: impl Into<String>,
        service: ServiceId,
        endpoint: EndpointId,
        payload: Value,
        priority: i32,
    ) -> Result<&mut Self, ConfigError> {
        self.add(id, RequestConfig::post((service, endpoint), payload), priority)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_patch(
        &mut self,
        id: impl Into<String>,
        service: ServiceId,
        endpoint: EndpointId,
        resource_id: impl Into<String>,
        payload: Value,
        etag: Option<&str>,
        priority: i32,
    ) -> Result<&mut Self, ConfigError> {
        let config = RequestConfig::patch(
            (service, endpoint),
            resource_id,
            payload,
            etag.unwrap_or_default(),
        );
        self.add(id, config, priority)
    }

    pub fn add_put(
        &mut self,
        id: impl Into<String>,
        service: ServiceId,
        endpoint: EndpointId,
        resource_id: Option<&str>,
        payload: Value,
        priority: i32,
    ) -> Result<&mut Self, ConfigError> {
        let config =
            RequestConfig::put((service, endpoint), resource_id.map(str::to_string), payload);
        self.add(id, config, priority)
    }

    pub fn add_delete(
        &mut self,
        id: impl Into<String>,
        service: ServiceId,
        endpoint: EndpointId,
        resource_id: impl Into<String>,
        priority: i32,
    ) -> Result<&mut Self, ConfigError> {
        self.add(id, RequestConfig::delete((service, endpoint), resource_id), priority)
    }

    /// Add a request computed from the response of `depends_on`
    ///
    /// The parent must already be in the batch. `transform` runs once the parent
    /// has succeeded, and never otherwise.
    pub fn add_dependent<F>(
        &mut self,
        id: impl Into<String>,
        depends_on: impl Into<String>,
        transform: F,
        priority: i32,
    ) -> Result<&mut Self, ConfigError>
    where
        F: Fn(&Response) -> anyhow::Result<RequestConfig> + Send + Sync + 'static,
    {
        let id = id.into();
        let depends_on = depends_on.into();
        self.check_id(&id)?;

        if !self.index.contains_key(&depends_on) {
            return Err(ConfigError::UnknownDependency { id, depends_on });
        }

        Ok(self.push(BatchEntry {
            id,
            priority,
            kind: EntryKind::Dependent {
                depends_on,
                transform: Transform::new(transform),
            },
        }))
    }

    /// Remove an entry, renumbering the positions of the ones after it
    ///
    /// Dependents of the removed entry stay in the batch and end up skipped as
    /// unresolved when it runs.
    pub fn remove(&mut self, id: &str) -> Option<BatchEntry> {
        let position = self.index.remove(id)?;
        let entry = self.entries.remove(position);

        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.id.clone(), i))
            .collect();

        Some(entry)
    }

    pub fn get(&self, id: &str) -> Option<&BatchEntry> {
        self.position(id).map(|i| &self.entries[i])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in insertion order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.id.as_str())
    }

    pub fn entries(&self) -> &[BatchEntry] {
        &self.entries
    }

    /// Run every entry with default options
    pub async fn execute<T>(&self, transport: &T) -> BatchResult
    where
        T: Transport + ?Sized,
    {
        BatchExecutor::new(transport).run(self).await
    }

    pub async fn execute_with<T>(&self, transport: &T, options: BatchOptions) -> BatchResult
    where
        T: Transport + ?Sized,
    {
        BatchExecutor::new(transport).with_options(options).run(self).await
    }
}
