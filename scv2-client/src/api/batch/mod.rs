//! Batch orchestration
//!
//! A [`BatchRequest`] collects named requests, some of them computed from the
//! response of another entry, and runs them with a [`BatchExecutor`] in priority
//! and dependency order. Per-entry failures end up in the [`BatchResult`]; only
//! add-time mistakes are reported as errors.

pub mod batch;
pub mod entry;
pub mod executor;
pub mod result;

pub use batch::BatchRequest;
pub use entry::{BatchEntry, EntryKind, Transform};
pub use executor::{BatchExecutor, BatchOptions};
pub use result::{BatchResult, Outcome, SkipReason};
