//! Transport session
//!
//! [`Transport`] is the seam the request and batch layers talk to; [`Session`]
//! is its reqwest-backed implementation.

pub mod config;
pub mod response;
pub mod session;
pub mod transport;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use response::Response;
pub use session::Session;
pub use transport::{Call, Envelope, Transport};
