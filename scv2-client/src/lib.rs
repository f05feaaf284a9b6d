//! Typed client for the SAP Sales/Service Cloud V2 REST API
//!
//! Requests are assembled against a closed catalog of services and endpoints,
//! validated before any I/O, and executed through a [`Transport`](api::Transport)
//! session either one at a time or as a batch with priorities and dependent
//! requests.
//!
//! ```no_run
//! use scv2_client::api::{
//!     BatchRequest, EndpointId, QueryOptions, RequestConfig, ServiceId, Session,
//! };
//!
//! # async fn run() -> anyhow::Result<()> {
//! let session = Session::from_env()?;
//!
//! let mut batch = BatchRequest::new();
//! batch.add_get(
//!     "accounts",
//!     ServiceId::Account,
//!     EndpointId::Accounts,
//!     0,
//!     None,
//!     QueryOptions::new().filter("lifeCycleStatus eq 'ACTIVE'").top(1),
//! )?;
//! batch.add_dependent(
//!     "contacts",
//!     "accounts",
//!     |response| {
//!         let id = response
//!             .str_field("/value/0/id")
//!             .ok_or_else(|| anyhow::anyhow!("no account returned"))?;
//!         Ok(RequestConfig::query(
//!             (ServiceId::ContactPerson, EndpointId::ContactPersons),
//!             QueryOptions::new().filter(format!("accountId eq '{}'", id)),
//!         ))
//!     },
//!     0,
//! )?;
//!
//! let result = batch.execute(&session).await;
//! for (id, outcome) in result.iter() {
//!     println!("{}: {:?}", id, outcome.is_success());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
