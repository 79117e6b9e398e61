//! Client core for classifying free-text opinions about the Sustainable
//! Development Goals with a remote model, and for retraining that model.
//!
//! Three layers, used in order:
//! - [`input`] turns manual entries, CSV files or spreadsheets into a [`TextBatch`]
//! - [`Orchestrator`] runs the classify and retrain workflows against a [`ModelService`]
//! - [`presenter`] maps whatever the service returns onto [`ClassificationOutcome`]
//!   and [`RetrainMetrics`]
//!
//! # Basic Usage
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use sdg_classify::{
//!     presenter, HttpModelService, Operation, Orchestrator, ServiceConfig, Session,
//! };
//!
//! let orchestrator = Orchestrator::new(HttpModelService::new(ServiceConfig::from_env())?);
//! let mut session = Session::new();
//! session.select(Operation::Classify);
//! session.update_entry(0, "Public transport should be free");
//!
//! let outcomes = orchestrator.classify(session.classify_input()).await?;
//! for line in presenter::describe_outcomes(&outcomes) {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Spreadsheets
//!
//! Only the first worksheet of an xlsx/xls workbook is read. Text cells are
//! collected row by row; every other sheet is ignored.

pub mod config;
pub mod input;
pub mod models;
pub mod presenter;
pub mod service;
pub mod session;
pub mod workflow;

pub use config::ServiceConfig;
pub use input::{CsvEncoding, InputError, SourceFormat, TextBatch, UploadedFile};
pub use models::{ClassificationOutcome, RetrainMetrics};
pub use service::{HttpModelService, ModelService, PredictRequest, ServiceError};
pub use session::{ClassifyMode, Displayed, Session};
pub use workflow::{
    ClassifyInput, FailureKind, Operation, Orchestrator, Workflow, WorkflowError, WorkflowState,
};

/// Installs `env_logger`, configured through `RUST_LOG`.
pub fn init_logger() {
    env_logger::init();
}
