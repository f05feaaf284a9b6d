//! Batch execution
//!
//! Each step takes the highest-priority ready entry (insertion order within a
//! priority), runs it, records its outcome and promotes the dependents of a
//! success, so a promoted dependent competes with everything still waiting.
//! With `max_concurrent > 1` a step takes the whole top-priority tier instead.
//! A dependent's transform is invoked at promotion; a failure marks every
//! descendant skipped before any of them could start. A dependent is linked to
//! the entry with its parent id only when that entry comes earlier in the
//! batch. Whatever is still pending when nothing is ready never had its parent
//! resolved.

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, VecDeque};

use super::batch::BatchRequest;
use super::entry::{BatchEntry, EntryKind};
use super::result::{BatchResult, Outcome, SkipReason};
use crate::api::dispatch::dispatch;
use crate::api::error::Error;
use crate::api::request::Request;
use crate::api::session::{Response, Transport};

/// Execution settings for a batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Requests of one priority tier allowed in flight at once; `1` runs
    /// entries strictly one at a time
    pub max_concurrent: usize,
    /// Record non-2xx responses as failures
    pub fail_on_error_status: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            max_concurrent: 1,
            fail_on_error_status: true,
        }
    }
}

impl BatchOptions {
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }

    pub fn with_fail_on_error_status(mut self, enabled: bool) -> Self {
        self.fail_on_error_status = enabled;
        self
    }
}

/// Runs a [`BatchRequest`] against a transport
pub struct BatchExecutor<'a, T: ?Sized> {
    transport: &'a T,
    options: BatchOptions,
}

impl<'a, T> BatchExecutor<'a, T>
where
    T: Transport + ?Sized,
{
    pub fn new(transport: &'a T) -> Self {
        Self {
            transport,
            options: BatchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn run(&self, batch: &BatchRequest) -> BatchResult {
        let entries = batch.entries();
        let mut state = RunState::new(entries);

        let sequential = self.options.max_concurrent <= 1;
        info!("Executing batch of {} requests", entries.len());

        loop {
            let tier = state.next_tier(sequential);
            let Some((first, _)) = tier.first() else {
                break;
            };

            debug!(
                "Running {} request(s) at priority {}",
                tier.len(),
                entries[*first].priority
            );

            for (idx, _) in &tier {
                state.result.execution_order.push(entries[*idx].id.clone());
            }

            let outcomes: Vec<(usize, Result<Response, Error>)> = stream::iter(tier)
                .map(|(idx, request)| async move { (idx, self.execute_one(&request).await) })
                .buffered(self.options.max_concurrent.max(1))
                .collect()
                .await;

            for (idx, outcome) in outcomes {
                state.settle(idx, outcome);
            }
        }

        let result = state.finish();
        info!(
            "Batch finished: {} succeeded, {} failed, {} skipped",
            result.succeeded().len(),
            result.failed().len(),
            result.skipped().len()
        );
        result
    }

    async fn execute_one(&self, request: &Request) -> Result<Response, Error> {
        let response = dispatch(self.transport, request).await?;

        if self.options.fail_on_error_status && !response.is_success() {
            return Err(Error::Status {
                method: request.method(),
                path: request.wire_path(),
                status: response.status,
                body: response.body,
            });
        }

        Ok(response)
    }
}

struct RunState<'b> {
    entries: &'b [BatchEntry],
    /// Parent position -> dependent positions, in insertion order
    children: HashMap<usize, Vec<usize>>,
    pending: BTreeSet<usize>,
    ready: Vec<(usize, Request)>,
    result: BatchResult,
}

impl<'b> RunState<'b> {
    fn new(entries: &'b [BatchEntry]) -> Self {
        let positions: HashMap<&str, usize> = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.id.as_str(), idx))
            .collect();

        let mut children: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut pending = BTreeSet::new();
        let mut ready = Vec::new();

        for (idx, entry) in entries.iter().enumerate() {
            match &entry.kind {
                EntryKind::Direct(request) => ready.push((idx, request.clone())),
                EntryKind::Dependent { depends_on, .. } => {
                    // A parent added after its dependent is a different entry
                    // reusing a removed id
                    match positions.get(depends_on.as_str()) {
                        Some(&parent) if parent < idx => {
                            children.entry(parent).or_default().push(idx)
                        }
                        _ => debug!("'{}' has no parent '{}' before it", entry.id, depends_on),
                    }
                    pending.insert(idx);
                }
            }
        }

        Self {
            entries,
            children,
            pending,
            ready,
            result: BatchResult::default(),
        }
    }

    /// Remove and return the ready entries sharing the highest priority, or
    /// only the first of them when `sequential`
    fn next_tier(&mut self, sequential: bool) -> Vec<(usize, Request)> {
        let entries = self.entries;
        self.ready
            .sort_by_key(|(idx, _)| (Reverse(entries[*idx].priority), *idx));

        let Some(top) = self.ready.first().map(|(idx, _)| entries[*idx].priority) else {
            return Vec::new();
        };

        let split = if sequential {
            1
        } else {
            self.ready
                .iter()
                .position(|(idx, _)| entries[*idx].priority != top)
                .unwrap_or(self.ready.len())
        };

        self.ready.drain(..split).collect()
    }

    fn settle(&mut self, idx: usize, outcome: Result<Response, Error>) {
        let entries = self.entries;
        let id = entries[idx].id.as_str();

        match outcome {
            Ok(response) => {
                debug!("Request '{}' succeeded with status {}", id, response.status);
                self.promote_children(idx, &response);
                self.record(id, Outcome::Success(response));
            }
            Err(error) => {
                warn!("Request '{}' failed: {}", id, error);
                self.record(id, Outcome::Failed(error));
                self.skip_descendants(idx);
            }
        }
    }

    fn promote_children(&mut self, parent: usize, response: &Response) {
        let entries = self.entries;
        let Some(children) = self.children.get(&parent).cloned() else {
            return;
        };

        for child in children {
            if !self.pending.remove(&child) {
                continue;
            }

            let entry = &entries[child];
            let EntryKind::Dependent { transform, .. } = &entry.kind else {
                continue;
            };

            match transform.apply(response) {
                Ok(request) => {
                    debug!("Promoted '{}' after '{}'", entry.id, entries[parent].id);
                    self.ready.push((child, request));
                }
                Err(error) => {
                    warn!("Transform of '{}' failed: {}", entry.id, error);
                    self.record(&entry.id, Outcome::Failed(error.into()));
                    self.skip_descendants(child);
                }
            }
        }
    }

    fn skip_descendants(&mut self, root: usize) {
        let entries = self.entries;
        let ancestor = entries[root].id.as_str();
        let mut queue = VecDeque::from([root]);

        while let Some(parent) = queue.pop_front() {
            let Some(children) = self.children.get(&parent).cloned() else {
                continue;
            };

            for child in children {
                if !self.pending.remove(&child) {
                    continue;
                }

                let id = entries[child].id.as_str();
                warn!("Skipping '{}': ancestor '{}' failed", id, ancestor);
                self.record(
                    id,
                    Outcome::Skipped(SkipReason::AncestorFailed {
                        ancestor: ancestor.to_string(),
                    }),
                );
                queue.push_back(child);
            }
        }
    }

    fn record(&mut self, id: &str, outcome: Outcome) {
        self.result.outcomes.insert(id.to_string(), outcome);
    }

    fn finish(mut self) -> BatchResult {
        let entries = self.entries;
        let unresolved = std::mem::take(&mut self.pending);

        for idx in unresolved {
            let entry = &entries[idx];
            let Some(depends_on) = entry.depends_on() else {
                continue;
            };

            warn!(
                "Skipping '{}': dependency '{}' was never resolved",
                entry.id, depends_on
            );
            self.record(
                &entry.id,
                Outcome::Skipped(SkipReason::UnresolvedDependency {
                    depends_on: depends_on.to_string(),
                }),
            );
        }

        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::catalog::{EndpointId, ServiceId};
    use crate::api::error::{ConfigError, TransportError, ValidationError};
    use crate::api::request::{QueryOptions, RequestConfig};
    use crate::api::testing::StubTransport;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn add_account_get(batch: &mut BatchRequest, id: &str, priority: i32) {
        batch
            .add_get(
                id,
                ServiceId::Account,
                EndpointId::Accounts,
                priority,
                Some(id),
                QueryOptions::new(),
            )
            .unwrap();
    }

    /// Dependent on `parent` that GETs the contact persons of the parent's account
    fn add_contacts_of(batch: &mut BatchRequest, id: &str, parent: &str, calls: Arc<AtomicUsize>) {
        batch
            .add_dependent(
                id,
                parent,
                move |response: &Response| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let path = response
                        .str_field("/value/path")
                        .ok_or_else(|| anyhow::anyhow!("no path in parent response"))?;
                    Ok(RequestConfig::query(
                        (ServiceId::ContactPerson, EndpointId::ContactPersons),
                        QueryOptions::new().filter(format!("accountPath eq '{}'", path)),
                    ))
                },
                0,
            )
            .unwrap();
    }

    #[tokio::test]
    async fn test_priority_then_dependency_order() {
        init();
        let transport = StubTransport::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut batch = BatchRequest::new();
        add_account_get(&mut batch, "A", 0);
        add_account_get(&mut batch, "B", 5);
        add_contacts_of(&mut batch, "C", "A", calls.clone());

        let result = batch.execute(&transport).await;

        assert_eq!(result.execution_order(), ["B", "A", "C"]);
        assert_eq!(
            transport.paths(),
            vec!["accounts/B", "accounts/A", "contactPersons"]
        );
        assert!(result.is_complete_success());
        assert_eq!(result.len(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let contacts = &transport.calls()[2];
        assert_eq!(
            contacts.envelope().query["$filter"],
            "accountPath eq 'accounts/A'"
        );
    }

    #[tokio::test]
    async fn test_failed_parent_skips_dependent_without_transform() {
        init();
        let transport = StubTransport::new();
        transport.fail(
            "accounts/A",
            TransportError::Connection("connection refused".into()),
        );
        let calls = Arc::new(AtomicUsize::new(0));

        let mut batch = BatchRequest::new();
        add_account_get(&mut batch, "A", 0);
        add_account_get(&mut batch, "B", 5);
        add_contacts_of(&mut batch, "C", "A", calls.clone());

        let result = batch.execute(&transport).await;

        assert!(matches!(
            result.get("A"),
            Some(Outcome::Failed(Error::Transport(TransportError::Connection(_))))
        ));
        assert!(result.get("B").unwrap().is_success());
        assert_eq!(
            result.get("C").unwrap().skip_reason(),
            Some(&SkipReason::AncestorFailed {
                ancestor: "A".to_string()
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(result.execution_order(), ["B", "A"]);
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn test_skip_propagates_transitively() {
        init();
        let transport = StubTransport::new();
        transport.respond("accounts/A", Response::new(500, json!({"error": "boom"})));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut batch = BatchRequest::new();
        add_account_get(&mut batch, "A", 0);
        add_contacts_of(&mut batch, "C", "A", calls.clone());
        add_contacts_of(&mut batch, "D", "C", calls.clone());
        add_account_get(&mut batch, "E", 0);

        let result = batch.execute(&transport).await;

        assert!(matches!(
            result.get("A"),
            Some(Outcome::Failed(Error::Status { status: 500, .. }))
        ));
        for id in ["C", "D"] {
            assert_eq!(
                result.get(id).unwrap().skip_reason(),
                Some(&SkipReason::AncestorFailed {
                    ancestor: "A".to_string()
                }),
                "{id}"
            );
        }
        assert!(result.get("E").unwrap().is_success());
        assert_eq!(result.skipped(), vec!["C", "D"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_error_status_can_be_accepted() {
        let transport = StubTransport::new();
        transport.respond("accounts/A", Response::new(404, json!({"error": "not found"})));

        let mut batch = BatchRequest::new();
        add_account_get(&mut batch, "A", 0);

        let options = BatchOptions::default().with_fail_on_error_status(false);
        let result = batch.execute_with(&transport, options).await;

        assert_eq!(result.response("A").unwrap().status, 404);
    }

    #[tokio::test]
    async fn test_patch_without_etag_never_reaches_transport() {
        let transport = StubTransport::new();
        let mut batch = BatchRequest::new();

        let err = batch
            .add_patch(
                "P",
                ServiceId::Opportunity,
                EndpointId::Opportunities,
                "O-1",
                json!({"name": "Renewal"}),
                None,
                0,
            )
            .unwrap_err();

        assert_eq!(err, ConfigError::MissingETag);

        let result = batch.execute(&transport).await;
        assert!(result.is_empty());
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_transform_output_fails_dependent() {
        init();
        let transport = StubTransport::new();

        let mut batch = BatchRequest::new();
        add_account_get(&mut batch, "A", 0);
        batch
            .add_dependent(
                "C",
                "A",
                |_: &Response| {
                    Ok(RequestConfig::patch(
                        (ServiceId::Account, EndpointId::Accounts),
                        "A",
                        json!({"x": 1}),
                        "",
                    ))
                },
                0,
            )
            .unwrap();
        batch
            .add_dependent(
                "D",
                "C",
                |_: &Response| Ok(RequestConfig::get((ServiceId::Account, EndpointId::Accounts))),
                0,
            )
            .unwrap();

        let result = batch.execute(&transport).await;

        assert!(matches!(
            result.get("C"),
            Some(Outcome::Failed(Error::Config(ConfigError::MissingETag)))
        ));
        assert_eq!(
            result.get("D").unwrap().skip_reason(),
            Some(&SkipReason::AncestorFailed {
                ancestor: "C".to_string()
            })
        );
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_dependent_of_removed_parent_is_unresolved() {
        init();
        let transport = StubTransport::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut batch = BatchRequest::new();
        add_account_get(&mut batch, "A", 0);
        add_contacts_of(&mut batch, "C", "A", calls.clone());
        batch.remove("A");

        let result = batch.execute(&transport).await;

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.get("C").unwrap().skip_reason(),
            Some(&SkipReason::UnresolvedDependency {
                depends_on: "A".to_string()
            })
        );
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_readded_parent_id_does_not_adopt_dependent() {
        init();
        let transport = StubTransport::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut batch = BatchRequest::new();
        add_account_get(&mut batch, "A", 0);
        add_contacts_of(&mut batch, "C", "A", calls.clone());
        batch.remove("A");
        batch
            .add_get(
                "A",
                ServiceId::Lead,
                EndpointId::Leads,
                0,
                Some("other"),
                QueryOptions::new(),
            )
            .unwrap();

        let result = batch.execute(&transport).await;

        assert!(result.get("A").unwrap().is_success());
        assert_eq!(
            result.get("C").unwrap().skip_reason(),
            Some(&SkipReason::UnresolvedDependency {
                depends_on: "A".to_string()
            })
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(transport.paths(), vec!["leads/other"]);
    }

    #[tokio::test]
    async fn test_cycle_is_unresolved() {
        let transport = StubTransport::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut batch = BatchRequest::new();
        add_account_get(&mut batch, "A", 0);
        add_contacts_of(&mut batch, "B", "A", calls.clone());
        batch.remove("A");
        add_contacts_of(&mut batch, "A", "B", calls.clone());

        let result = batch.execute(&transport).await;

        assert_eq!(result.skipped(), vec!["A", "B"]);
        assert!(matches!(
            result.get("A").unwrap().skip_reason(),
            Some(SkipReason::UnresolvedDependency { .. })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_endpoint_is_captured_per_entry() {
        let transport = StubTransport::new();

        let mut batch = BatchRequest::new();
        batch
            .add_get("bad", ServiceId::Lead, EndpointId::Accounts, 0, None, QueryOptions::new())
            .unwrap();
        add_account_get(&mut batch, "good", 0);

        let result = batch.execute(&transport).await;

        assert!(matches!(
            result.get("bad"),
            Some(Outcome::Failed(Error::Validation(
                ValidationError::InvalidEndpoint { .. }
            )))
        ));
        assert!(result.get("good").unwrap().is_success());
        assert_eq!(transport.paths(), vec!["accounts/good"]);
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order_with_concurrency() {
        let transport = StubTransport::new();

        let mut batch = BatchRequest::new();
        for (id, priority) in [("a", 1), ("b", 3), ("c", 1), ("d", 3), ("e", 2)] {
            add_account_get(&mut batch, id, priority);
        }

        let options = BatchOptions::default().with_max_concurrent(4);
        let result = batch.execute_with(&transport, options).await;

        assert_eq!(result.execution_order(), ["b", "d", "e", "a", "c"]);
        assert_eq!(
            result.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            vec!["a", "b", "c", "d", "e"]
        );
    }

    #[tokio::test]
    async fn test_promoted_dependent_outranks_remaining_entries() {
        let transport = StubTransport::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let mut batch = BatchRequest::new();
        add_account_get(&mut batch, "A", 5);
        add_account_get(&mut batch, "B", 0);
        batch
            .add_dependent(
                "C",
                "A",
                move |_: &Response| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(RequestConfig::get((ServiceId::Lead, EndpointId::Leads)))
                },
                9,
            )
            .unwrap();

        let result = batch.execute(&transport).await;

        assert_eq!(result.execution_order(), ["A", "C", "B"]);
    }

    #[tokio::test]
    async fn test_sequential_run_rechecks_readiness_within_a_tier() {
        init();
        let transport = StubTransport::new();

        let mut batch = BatchRequest::new();
        add_account_get(&mut batch, "A", 5);
        add_account_get(&mut batch, "B", 5);
        batch
            .add_dependent(
                "C",
                "A",
                |_: &Response| Ok(RequestConfig::get((ServiceId::Lead, EndpointId::Leads))),
                9,
            )
            .unwrap();

        let result = batch.execute(&transport).await;
        assert_eq!(result.execution_order(), ["A", "C", "B"]);

        let options = BatchOptions::default().with_max_concurrent(2);
        let result = batch.execute_with(&transport, options).await;
        assert_eq!(result.execution_order(), ["A", "B", "C"]);
    }
}
