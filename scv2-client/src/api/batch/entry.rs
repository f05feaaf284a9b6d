//! Batch entries and dependent-request transforms

use std::fmt;
use std::sync::Arc;

use crate::api::error::ConfigError;
use crate::api::request::{Method, Request, RequestConfig};
use crate::api::session::Response;

type TransformFn = dyn Fn(&Response) -> anyhow::Result<RequestConfig> + Send + Sync;

/// Computes a dependent request from its parent's response
///
/// Must be a pure function of the response; it is called at most once, and
/// never when the parent did not succeed.
#[derive(Clone)]
pub struct Transform(Arc<TransformFn>);

impl Transform {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Response) -> anyhow::Result<RequestConfig> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Run the transform and validate its output like a fresh request
    pub fn apply(&self, parent: &Response) -> Result<Request, ConfigError> {
        let config = (self.0)(parent).map_err(|e| ConfigError::InvalidTransform(format!("{e:#}")))?;
        config.into_request()
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// How an entry obtains its request
#[derive(Debug, Clone)]
pub enum EntryKind {
    /// A request fixed at add time
    Direct(Request),
    /// A request computed from the response of `depends_on`
    Dependent {
        depends_on: String,
        transform: Transform,
    },
}

/// One named request in a batch
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub id: String,
    /// Higher runs first within a round
    pub priority: i32,
    pub kind: EntryKind,
}

impl BatchEntry {
    pub fn depends_on(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Dependent { depends_on, .. } => Some(depends_on),
            EntryKind::Direct(_) => None,
        }
    }

    pub fn is_dependent(&self) -> bool {
        matches!(self.kind, EntryKind::Dependent { .. })
    }

    /// Method of a direct entry; dependents only know theirs after the transform runs
    pub fn method(&self) -> Option<Method> {
        match &self.kind {
            EntryKind::Direct(request) => Some(request.method()),
            EntryKind::Dependent { .. } => None,
        }
    }

    pub fn request(&self) -> Option<&Request> {
        match &self.kind {
            EntryKind::Direct(request) => Some(request),
            EntryKind::Dependent { .. } => None,
        }
    }
}
