use log::{error, info};

use super::error::WorkflowError;
use super::state::{Operation, Workflow, WorkflowState};
use crate::input::{self, TextBatch, UploadedFile};
use crate::models::{ClassificationOutcome, RetrainMetrics};
use crate::presenter;
use crate::service::{ModelService, PredictRequest};

/// What to classify. Both variants are owned snapshots taken when the
/// operator starts the request.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyInput {
    /// Manually typed entries, sent as-is
    Manual(Vec<String>),
    /// The selected csv/xlsx/xls file, normalized before sending. `None`
    /// when file mode is active but nothing was selected.
    File(Option<UploadedFile>),
}

impl ClassifyInput {
    fn into_batch(self) -> Result<TextBatch, WorkflowError> {
        match self {
            Self::Manual(entries) => Ok(input::from_manual_entries(entries)),
            Self::File(Some(file)) => Ok(input::from_upload(&file)?),
            Self::File(None) => Err(WorkflowError::MissingFile),
        }
    }
}

/// Drives the classify and retrain workflows against a [`ModelService`].
///
/// The two workflows are independent: each has its own state record and
/// each allows one request in flight, but a classify and a retrain may be
/// outstanding at the same time. All failures end up in the workflow's
/// state as well as in the returned `Result`.
///
/// ```no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use sdg_classify::{ClassifyInput, HttpModelService, Orchestrator, ServiceConfig};
///
/// let service = HttpModelService::new(ServiceConfig::from_env())?;
/// let orchestrator = Orchestrator::new(service);
/// let outcomes = orchestrator
///     .classify(ClassifyInput::Manual(vec!["More bike lanes please".into()]))
///     .await?;
/// for outcome in &outcomes {
///     println!("{}", outcome);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Orchestrator<S> {
    service: S,
    classify: Workflow<Vec<ClassificationOutcome>>,
    retrain: Workflow<RetrainMetrics>,
}

impl<S: ModelService> Orchestrator<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            classify: Workflow::new(Operation::Classify),
            retrain: Workflow::new(Operation::Retrain),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn classify_state(&self) -> WorkflowState<Vec<ClassificationOutcome>> {
        self.classify.state()
    }

    pub fn retrain_state(&self) -> WorkflowState<RetrainMetrics> {
        self.retrain.state()
    }

    pub fn is_in_flight(&self, operation: Operation) -> bool {
        match operation {
            Operation::Classify => self.classify.is_in_flight(),
            Operation::Retrain => self.retrain.is_in_flight(),
        }
    }

    /// Normalizes `input` and asks the service to classify it.
    ///
    /// An empty batch, a missing file or an unreadable file fails locally
    /// without a remote call. A second call while one is outstanding is refused with
    /// [`WorkflowError::AlreadyInFlight`] and leaves the state alone.
    pub async fn classify(
        &self,
        input: ClassifyInput,
    ) -> Result<Vec<ClassificationOutcome>, WorkflowError> {
        let ticket = self.classify.begin()?;

        let batch = match input.into_batch() {
            Ok(batch) if batch.is_empty() => return ticket.settle(Err(WorkflowError::EmptyBatch)),
            Ok(batch) => batch,
            Err(err) => return ticket.settle(Err(err)),
        };

        let request = PredictRequest::from(batch);
        info!(
            "Classify request {}: {} entries",
            ticket.request_id(),
            request.texts.len()
        );

        let outcome = match self.service.predict(&request).await {
            Ok(body) => presenter::normalize_predictions(&body).map_err(WorkflowError::from),
            Err(err) => Err(WorkflowError::from(err)),
        };
        if let Err(err) = &outcome {
            error!("Classify request {} failed: {}", ticket.request_id(), err);
        }
        ticket.settle(outcome)
    }

    /// Sends the raw file to the service for retraining.
    ///
    /// The file is not normalized; the service reads the original format.
    /// A missing file fails locally, and overlapping retrain submissions are
    /// refused so the live model is never retrained twice at once.
    pub async fn retrain(&self, file: Option<UploadedFile>) -> Result<RetrainMetrics, WorkflowError> {
        let ticket = self.retrain.begin()?;

        let Some(file) = file else {
            return ticket.settle(Err(WorkflowError::MissingFile));
        };

        info!(
            "Retrain request {}: {} (sha256 {})",
            ticket.request_id(),
            file.file_name(),
            file.fingerprint()
        );

        let outcome = match self.service.retrain(&file).await {
            Ok(body) => presenter::interpret_retrain(&body).map_err(WorkflowError::from),
            Err(err) => Err(WorkflowError::from(err)),
        };
        match &outcome {
            Ok(metrics) => info!("Retrain request {} finished: {}", ticket.request_id(), metrics),
            Err(err) => error!("Retrain request {} failed: {}", ticket.request_id(), err),
        }
        ticket.settle(outcome)
    }
}
