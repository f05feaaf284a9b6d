//! Request model and builder
//!
//! Follows the same split as the operations: an immutable [`Request`] value, a
//! fluent [`RequestBuilder`] producing it, and a typed [`RequestConfig`] for places
//! that describe a request without driving a builder (batches, transforms).

pub mod builder;
pub mod config;
pub mod method;
pub mod query;
pub mod request;

pub use builder::RequestBuilder;
pub use config::{RequestConfig, Target};
pub use method::{Method, QueryParameter};
pub use query::QueryOptions;
pub use request::{IF_MATCH, Request};
