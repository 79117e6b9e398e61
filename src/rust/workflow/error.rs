use crate::input::InputError;
use crate::presenter::PresentError;
use crate::service::ServiceError;

use super::state::Operation;

/// Broad category of a workflow failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Rejected locally, no remote call was made
    Validation,
    /// The service could not be reached or sent something unreadable
    Transport,
    /// The service was reached and reported a failure of its own
    Application,
}

/// Why a workflow ended up `Failed`. Every failure carries a message fit
/// to show to the operator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkflowError {
    #[error("Nothing to classify: add at least one opinion")]
    EmptyBatch,
    #[error("No file selected")]
    MissingFile,
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("A {0} request is already in progress")]
    AlreadyInFlight(Operation),
    /// Could not reach the server, or it answered with something unusable
    #[error("Could not reach the server: {0}")]
    Transport(String),
    /// The server rejected the request with this message
    #[error("Server rejected the request: {0}")]
    Rejected(String),
}

impl WorkflowError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::EmptyBatch | Self::MissingFile | Self::Input(_) | Self::AlreadyInFlight(_) => {
                FailureKind::Validation
            }
            Self::Transport(_) => FailureKind::Transport,
            Self::Rejected(_) => FailureKind::Application,
        }
    }
}

impl From<ServiceError> for WorkflowError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Status {
                message: Some(message),
                ..
            } => Self::Rejected(message),
            ServiceError::Status { status, message: None } => {
                Self::Transport(format!("server responded with HTTP {}", status))
            }
            ServiceError::Unreachable(reason)
            | ServiceError::MalformedBody(reason)
            | ServiceError::InvalidRequest(reason) => Self::Transport(reason),
        }
    }
}

impl From<PresentError> for WorkflowError {
    fn from(err: PresentError) -> Self {
        match err {
            PresentError::Malformed(reason) => Self::Transport(format!("malformed response: {}", reason)),
            PresentError::Application(message) => Self::Rejected(message),
        }
    }
}
