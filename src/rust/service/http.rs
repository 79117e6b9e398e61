use log::{debug, error, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::Value;

use super::{ModelService, PredictRequest, ServiceError};
use crate::config::ServiceConfig;
use crate::input::UploadedFile;

/// [`ModelService`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpModelService {
    client: Client,
    config: ServiceConfig,
}

impl HttpModelService {
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ServiceError::InvalidRequest(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    async fn read_body(response: Response) -> Result<Value, ServiceError> {
        let status = response.status();
        debug!("Service response status: {}", status);

        if !status.is_success() {
            let text = match response.text().await {
                Ok(text) => text,
                Err(err) => {
                    warn!("Could not read the HTTP {} error body: {}", status, err);
                    String::new()
                }
            };
            let message = extract_error_message(&text);
            error!("Service responded with HTTP {}: {:?}", status, message);
            return Err(ServiceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ServiceError::MalformedBody(e.to_string()))
    }
}

impl ModelService for HttpModelService {
    async fn predict(&self, request: &PredictRequest) -> Result<Value, ServiceError> {
        let url = self.config.predict_url();
        info!("POST {} ({} texts)", url, request.texts.len());
        let response = self
            .client
            .post(&url)
            .timeout(self.config.request_timeout)
            .json(request)
            .send()
            .await?;
        Self::read_body(response).await
    }

    async fn retrain(&self, file: &UploadedFile) -> Result<Value, ServiceError> {
        let url = self.config.retrain_url();
        info!("POST {} (file {}, {} bytes)", url, file.file_name(), file.bytes().len());
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.file_name().to_string())
            .mime_str(file.mime_type())?;
        let form = Form::new().part("file", part);
        let response = self
            .client
            .post(&url)
            .timeout(self.config.retrain_timeout)
            .multipart(form)
            .send()
            .await?;
        Self::read_body(response).await
    }
}

/// Pulls the `error` field out of an error body, if it is JSON and has one.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    crate::presenter::error_message(value.as_object()?)
}
