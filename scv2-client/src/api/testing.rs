//! In-memory transport used by the unit tests

use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use super::error::TransportError;
use super::session::{Call, Response, Transport};

/// Records every call and answers from a per-path script
///
/// Paths without a scripted answer get `200 {"value": {"path": <path>}}`.
#[derive(Default)]
pub(crate) struct StubTransport {
    calls: Mutex<Vec<Call>>,
    scripted: Mutex<HashMap<String, VecDeque<Result<Response, TransportError>>>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, path: &str, response: Response) -> &Self {
        self.script(path, Ok(response))
    }

    pub(crate) fn fail(&self, path: &str, error: TransportError) -> &Self {
        self.script(path, Err(error))
    }

    fn script(&self, path: &str, answer: Result<Response, TransportError>) -> &Self {
        self.scripted
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(answer);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| call.path().to_string())
            .collect()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn execute(&self, call: Call) -> Result<Response, TransportError> {
        let path = call.path().to_string();
        self.calls.lock().unwrap().push(call);

        let scripted = self
            .scripted
            .lock()
            .unwrap()
            .get_mut(&path)
            .and_then(VecDeque::pop_front);

        scripted.unwrap_or_else(|| Ok(Response::new(200, json!({"value": {"path": path}}))))
    }

    fn close(&self) {}
}
