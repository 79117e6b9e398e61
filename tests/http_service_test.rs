use std::time::Duration;

use sdg_classify::{
    ClassifyInput, FailureKind, HttpModelService, ModelService, Orchestrator, PredictRequest,
    ServiceConfig, ServiceError, UploadedFile, WorkflowError,
};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves one canned HTTP response and hands back the raw request it received.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request_is_complete(&request) {
                break;
            }
        }

        let response = format!(
            "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&request).into_owned()
    });

    (base_url, handle)
}

fn request_is_complete(request: &[u8]) -> bool {
    let text = String::from_utf8_lossy(request);
    let Some(header_end) = text.find("\r\n\r\n") else {
        return false;
    };
    let content_length = text[..header_end]
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);
    request.len() >= header_end + 4 + content_length
}

fn service_for(base_url: &str) -> HttpModelService {
    let config = ServiceConfig::default()
        .with_base_url(base_url)
        .with_request_timeout(Duration::from_secs(5));
    HttpModelService::new(config).unwrap()
}

#[tokio::test]
async fn test_predict_posts_texts_as_json() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, server) = serve_once(
        "HTTP/1.1 200 OK",
        r#"[{"label": "ODS 11", "probability": 0.64}]"#,
    )
    .await;
    let service = service_for(&base_url);

    let body = service
        .predict(&PredictRequest { texts: vec!["Safer streets".into()] })
        .await?;

    assert_eq!(body, json!([{"label": "ODS 11", "probability": 0.64}]));
    let request = server.await?;
    assert!(request.starts_with("POST /api/predict "));
    assert!(request.contains(r#"{"texts":["Safer streets"]}"#));
    Ok(())
}

#[tokio::test]
async fn test_error_status_carries_server_message() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, server) = serve_once(
        "HTTP/1.1 422 Unprocessable Entity",
        r#"{"error": "texts must not be empty"}"#,
    )
    .await;
    let orchestrator = Orchestrator::new(service_for(&base_url));

    let err = orchestrator
        .classify(ClassifyInput::Manual(vec!["".into()]))
        .await
        .unwrap_err();

    assert_eq!(err, WorkflowError::Rejected("texts must not be empty".into()));
    server.await?;
    Ok(())
}

#[tokio::test]
async fn test_error_status_without_message() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, server) = serve_once("HTTP/1.1 503 Service Unavailable", "{}").await;
    let service = service_for(&base_url);

    let result = service.predict(&PredictRequest { texts: vec!["x".into()] }).await;

    assert_eq!(result, Err(ServiceError::Status { status: 503, message: None }));
    server.await?;
    Ok(())
}

#[tokio::test]
async fn test_non_json_success_body_is_malformed() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, server) = serve_once("HTTP/1.1 200 OK", "<html>hello</html>").await;
    let orchestrator = Orchestrator::new(service_for(&base_url));

    let err = orchestrator
        .classify(ClassifyInput::Manual(vec!["x".into()]))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), FailureKind::Transport);
    server.await?;
    Ok(())
}

#[tokio::test]
async fn test_closed_port_is_unreachable() -> Result<(), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let base_url = format!("http://{}/api", listener.local_addr()?);
    drop(listener);
    let orchestrator = Orchestrator::new(service_for(&base_url));

    let err = orchestrator
        .classify(ClassifyInput::Manual(vec!["x".into()]))
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::Transport(_)));
    Ok(())
}

#[tokio::test]
async fn test_retrain_uploads_file_as_multipart() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, server) = serve_once(
        "HTTP/1.1 200 OK",
        r#"{"precision": 0.9, "recall": 0.8, "f1_score": 0.85}"#,
    )
    .await;
    let orchestrator = Orchestrator::new(service_for(&base_url));
    let payload = "text,label\nClean rivers,ODS 6\n";
    let file = UploadedFile::new("train.csv", payload.as_bytes().to_vec())?;

    let metrics = orchestrator.retrain(Some(file)).await?;

    assert_eq!(metrics.f1_score, 0.85);
    let request = server.await?;
    assert!(request.starts_with("POST /api/retrain "));
    assert!(request.contains(r#"name="file"; filename="train.csv""#));
    assert!(request.contains("Content-Type: text/csv"));
    assert!(request.contains(&format!("\r\n\r\n{}\r\n", payload)));
    Ok(())
}

#[tokio::test]
async fn test_retrain_error_status_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let (base_url, server) = serve_once(
        "HTTP/1.1 400 Bad Request",
        r#"{"error": "no labels"}"#,
    )
    .await;
    let orchestrator = Orchestrator::new(service_for(&base_url));
    let file = UploadedFile::new("train.csv", b"text\nClean rivers\n".to_vec())?;

    let err = orchestrator.retrain(Some(file)).await.unwrap_err();

    assert_eq!(err, WorkflowError::Rejected("no labels".into()));
    assert_eq!(err.kind(), FailureKind::Application);
    server.await?;
    Ok(())
}
