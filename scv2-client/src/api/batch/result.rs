//! Per-entry outcomes of a batch run

use std::collections::BTreeMap;
use std::fmt;

use crate::api::error::Error;
use crate::api::session::Response;

/// Why an entry never ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `ancestor` failed or was skipped itself, somewhere up the dependency chain
    AncestorFailed { ancestor: String },
    /// The parent never produced a response (cycle, or parent removed)
    UnresolvedDependency { depends_on: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AncestorFailed { ancestor } => write!(f, "ancestor '{}' failed", ancestor),
            Self::UnresolvedDependency { depends_on } => {
                write!(f, "dependency '{}' was never resolved", depends_on)
            }
        }
    }
}

/// Terminal state of one entry
#[derive(Debug)]
pub enum Outcome {
    Success(Response),
    Failed(Error),
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped(_))
    }

    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Success(response) => Some(response),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Self::Skipped(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Outcome of every submitted entry, exactly once each
///
/// Iteration is ordered by id, independent of completion order.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub(super) outcomes: BTreeMap<String, Outcome>,
    pub(super) execution_order: Vec<String>,
}

impl BatchResult {
    pub fn get(&self, id: &str) -> Option<&Outcome> {
        self.outcomes.get(id)
    }

    pub fn response(&self, id: &str) -> Option<&Response> {
        self.get(id).and_then(Outcome::response)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.outcomes.iter().map(|(id, outcome)| (id.as_str(), outcome))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Ids in the order they were sent to the transport
    pub fn execution_order(&self) -> &[String] {
        &self.execution_order
    }

    pub fn succeeded(&self) -> Vec<&str> {
        self.ids_where(Outcome::is_success)
    }

    pub fn failed(&self) -> Vec<&str> {
        self.ids_where(Outcome::is_failed)
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.ids_where(Outcome::is_skipped)
    }

    pub fn is_complete_success(&self) -> bool {
        self.outcomes.values().all(Outcome::is_success)
    }

    pub fn into_outcomes(self) -> BTreeMap<String, Outcome> {
        self.outcomes
    }

    fn ids_where(&self, predicate: impl Fn(&Outcome) -> bool) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| predicate(outcome))
            .map(|(id, _)| id.as_str())
            .collect()
    }
}
