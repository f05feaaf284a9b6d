//! Sales/Service Cloud V2 REST API client
//!
//! Layered the same way from the bottom up: the endpoint catalog, the request
//! model and builder, the dispatcher mapping requests onto transport calls, the
//! reqwest-backed session, and batch orchestration on top.

pub mod batch;
pub mod catalog;
pub mod dispatch;
pub mod error;
pub mod request;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{
    BatchEntry, BatchExecutor, BatchOptions, BatchRequest, BatchResult, EntryKind, Outcome,
    SkipReason, Transform,
};
pub use catalog::{Catalog, CatalogError, EndpointId, PathTemplate, ServiceId, catalog};
pub use dispatch::{dispatch, to_call};
pub use error::{BoxError, ConfigError, Error, Result, TransportError, ValidationError};
pub use request::{
    IF_MATCH, Method, QueryOptions, QueryParameter, Request, RequestBuilder, RequestConfig, Target,
};
pub use session::{
    Call, Envelope, Response, Session, SessionConfig, SessionConfigBuilder, Transport,
};
