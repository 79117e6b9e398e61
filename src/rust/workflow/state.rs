use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, warn};

use super::error::WorkflowError;

/// The two remote operations the client can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Classify,
    Retrain,
}

impl Operation {
    /// Indicator shown while a request of this kind is outstanding.
    pub fn progress_label(&self) -> &'static str {
        match self {
            Self::Classify => "Classifying opinions...",
            Self::Retrain => "Retraining model...",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classify => f.write_str("classify"),
            Self::Retrain => f.write_str("retrain"),
        }
    }
}

/// Lifecycle of one workflow.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WorkflowState<T> {
    #[default]
    Idle,
    InFlight {
        request_id: u64,
    },
    Succeeded(T),
    Failed(WorkflowError),
}

impl<T> WorkflowState<T> {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }

    pub fn result(&self) -> Option<&T> {
        match self {
            Self::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&WorkflowError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// State record for one workflow.
///
/// At most one request is in flight at a time. Starting a request hands out
/// an [`InFlight`] ticket; the state only changes again when that ticket is
/// settled or dropped.
#[derive(Debug)]
pub struct Workflow<T> {
    operation: Operation,
    state: Mutex<WorkflowState<T>>,
    next_request_id: AtomicU64,
}

impl<T: Clone> Workflow<T> {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            state: Mutex::new(WorkflowState::Idle),
            next_request_id: AtomicU64::new(1),
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> WorkflowState<T> {
        self.lock().clone()
    }

    pub fn is_in_flight(&self) -> bool {
        self.lock().is_in_flight()
    }

    /// Moves to `InFlight`, or refuses if a request is already outstanding.
    /// A refusal leaves the outstanding request's state untouched.
    pub(crate) fn begin(&self) -> Result<InFlight<'_, T>, WorkflowError> {
        let mut state = self.lock();
        if state.is_in_flight() {
            warn!("Rejected overlapping {} request", self.operation);
            return Err(WorkflowError::AlreadyInFlight(self.operation));
        }
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        *state = WorkflowState::InFlight { request_id };
        debug!("{} request {} in flight", self.operation, request_id);
        Ok(InFlight {
            workflow: self,
            request_id,
            settled: false,
        })
    }

    fn lock(&self) -> MutexGuard<'_, WorkflowState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies `next` only if `request_id` is still the outstanding request.
    fn transition(&self, request_id: u64, next: WorkflowState<T>) -> bool {
        let mut state = self.lock();
        match *state {
            WorkflowState::InFlight { request_id: current } if current == request_id => {
                *state = next;
                true
            }
            _ => false,
        }
    }
}

/// Handle for the one outstanding request of a [`Workflow`].
///
/// Dropping it without settling (the calling future was dropped) returns
/// the workflow to `Idle`.
#[derive(Debug)]
pub(crate) struct InFlight<'a, T: Clone> {
    workflow: &'a Workflow<T>,
    request_id: u64,
    settled: bool,
}

impl<T: Clone> InFlight<'_, T> {
    pub(crate) fn request_id(&self) -> u64 {
        self.request_id
    }

    /// Records the outcome and hands it back to the caller.
    pub(crate) fn settle(mut self, outcome: Result<T, WorkflowError>) -> Result<T, WorkflowError> {
        self.settled = true;
        let next = match &outcome {
            Ok(result) => WorkflowState::Succeeded(result.clone()),
            Err(err) => WorkflowState::Failed(err.clone()),
        };
        if self.workflow.transition(self.request_id, next) {
            debug!(
                "{} request {} settled ({})",
                self.workflow.operation,
                self.request_id,
                if outcome.is_ok() { "succeeded" } else { "failed" }
            );
        }
        outcome
    }
}

impl<T: Clone> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if !self.settled && self.workflow.transition(self.request_id, WorkflowState::Idle) {
            warn!(
                "{} request {} abandoned before completion",
                self.workflow.operation, self.request_id
            );
        }
    }
}
