//! The boundary to the remote classification service.
//!
//! Workflows only depend on [`ModelService`]; [`HttpModelService`] is the
//! production implementation over reqwest.

mod error;
mod http;

use std::future::Future;

use serde::Serialize;
use serde_json::Value;

use crate::input::{TextBatch, UploadedFile};

pub use error::ServiceError;
pub use http::HttpModelService;

/// Body of a predict call: `{"texts": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictRequest {
    pub texts: Vec<String>,
}

impl From<TextBatch> for PredictRequest {
    fn from(batch: TextBatch) -> Self {
        Self {
            texts: batch.into_texts(),
        }
    }
}

/// The two remote operations the client drives.
///
/// Implementations return the decoded JSON body of a 2xx response and map
/// everything else onto [`ServiceError`]. Interpreting the body is left to
/// the presenter.
pub trait ModelService {
    /// `POST /predict` with a JSON body.
    fn predict(
        &self,
        request: &PredictRequest,
    ) -> impl Future<Output = Result<Value, ServiceError>> + Send;

    /// `POST /retrain` with the raw file as a multipart `file` field.
    fn retrain(
        &self,
        file: &UploadedFile,
    ) -> impl Future<Output = Result<Value, ServiceError>> + Send;
}
