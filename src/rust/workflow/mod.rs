//! Request orchestration for the classify and retrain workflows.

mod error;
mod orchestrator;
mod state;

pub use error::{FailureKind, WorkflowError};
pub use orchestrator::{ClassifyInput, Orchestrator};
pub use state::{Operation, Workflow, WorkflowState};
