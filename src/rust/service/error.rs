/// Failures at the remote-service boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    /// The request never got a response: connection refused, DNS, timeout
    #[error("Could not reach the service: {0}")]
    Unreachable(String),
    /// The service answered with a non-2xx status
    #[error("Service responded with HTTP {status}{}", detail(.message))]
    Status { status: u16, message: Option<String> },
    /// The service answered 2xx but the body is not JSON
    #[error("Malformed response body: {0}")]
    MalformedBody(String),
    /// The request could not be assembled
    #[error("Could not build request: {0}")]
    InvalidRequest(String),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ServiceError::InvalidRequest(err.to_string())
        } else if err.is_decode() {
            ServiceError::MalformedBody(err.to_string())
        } else {
            ServiceError::Unreachable(err.to_string())
        }
    }
}
