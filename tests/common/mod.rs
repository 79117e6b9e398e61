#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use env_logger::{Builder, Env};
use sdg_classify::{ModelService, PredictRequest, ServiceError, UploadedFile};
use serde_json::Value;
use tokio::sync::Semaphore;

pub fn init() {
    let _ = Builder::from_env(Env::default().default_filter_or("warn"))
        .is_test(true)
        .try_init();
}

/// A call the mock received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Predict(Vec<String>),
    Retrain { file_name: String, bytes: Vec<u8> },
}

/// In-memory service that records calls and replays queued responses.
///
/// With a gate, every call waits for a permit before answering, which keeps
/// it in flight for as long as the test needs.
#[derive(Default)]
pub struct MockService {
    calls: Mutex<Vec<Call>>,
    predict_responses: Mutex<VecDeque<Result<Value, ServiceError>>>,
    retrain_responses: Mutex<VecDeque<Result<Value, ServiceError>>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls block until [`Semaphore::add_permits`] is called on the returned gate.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let service = Self {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (service, gate)
    }

    pub fn on_predict(self, response: Result<Value, ServiceError>) -> Self {
        self.predict_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn on_retrain(self, response: Result<Value, ServiceError>) -> Self {
        self.retrain_responses.lock().unwrap().push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

impl ModelService for MockService {
    async fn predict(&self, request: &PredictRequest) -> Result<Value, ServiceError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Predict(request.texts.clone()));
        self.wait_for_gate().await;
        self.predict_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Unreachable("no response queued".into())))
    }

    async fn retrain(&self, file: &UploadedFile) -> Result<Value, ServiceError> {
        self.calls.lock().unwrap().push(Call::Retrain {
            file_name: file.file_name().to_string(),
            bytes: file.bytes().to_vec(),
        });
        self.wait_for_gate().await;
        self.retrain_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Unreachable("no response queued".into())))
    }
}
