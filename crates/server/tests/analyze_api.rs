use std::path::Path;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;

use turn_latency_core::shared::audio_files::file_id;
use turn_latency_core::transcript::domain::provider_error::{ProviderError, ProviderErrorKind};
use turn_latency_core::transcript::domain::transcriber::Transcriber;
use turn_latency_core::transcript::domain::utterance::Utterance;
use turn_latency_server::{router, AppState};

/// Answers by upload content: `talk` is a three-turn conversation, `silent`
/// has no utterances, anything else is a provider failure.
struct ContentTranscriber;

impl Transcriber for ContentTranscriber {
    fn transcribe(&self, path: &Path, _: &str) -> Result<Vec<Utterance>, ProviderError> {
        let content = std::fs::read(path)
            .map_err(|e| ProviderError::new(file_id(path), ProviderErrorKind::Io(e)))?;
        match content.as_slice() {
            b"talk" => Ok(vec![
                Utterance::new("A", 0, 1000, "Hola, buenas"),
                Utterance::new("B", 1300, 2000, "Buenas"),
                Utterance::new("A", 1900, 2500, "Bien"),
            ]),
            b"silent" => Ok(Vec::new()),
            _ => Err(ProviderError::new(
                file_id(path),
                ProviderErrorKind::Failed("audio could not be decoded".into()),
            )),
        }
    }
}

async fn start(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

async fn start_configured() -> String {
    start(AppState::new(Arc::new(ContentTranscriber), "es")).await
}

fn form(files: &[(&str, &'static str)]) -> Form {
    files
        .iter()
        .fold(Form::new().percent_encode_noop(), |form, (name, content)| {
            form.part(
                "files",
                Part::bytes(content.as_bytes()).file_name(name.to_string()),
            )
        })
}

async fn post_analyze(base: &str, form: Form) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base}/analyze"))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

async fn detail(response: reqwest::Response) -> String {
    let body: serde_json::Value = response.json().await.unwrap();
    body["detail"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let base = start_configured().await;
    let response = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["endpoint"], "POST /analyze");
}

#[tokio::test]
async fn test_analyze_returns_summary_csv() {
    let base = start_configured().await;
    let response = post_analyze(
        &base,
        form(&[("talk.mp3", "talk"), ("silent.wav", "silent")]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "text/csv");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"summary_all_audios.csv\""
    );
    let csv = response.text().await.unwrap();
    let rows: Vec<&str> = csv.lines().collect();
    assert_eq!(
        rows,
        vec![
            "file,turns,speaker_changes,avg_gap_ms,median_gap_ms,p95_gap_ms,overlap_rate,avg_positive_gap_ms",
            "talk.mp3,3,2,100.00,100.00,280.00,50.00,300.00",
        ]
    );
}

#[tokio::test]
async fn test_uploaded_name_is_reduced_to_file_name() {
    let base = start_configured().await;
    let response = post_analyze(&base, form(&[("../../etc/talk.mp3", "talk")])).await;
    assert_eq!(response.status(), StatusCode::OK);
    let csv = response.text().await.unwrap();
    assert!(csv.lines().nth(1).unwrap().starts_with("talk.mp3,3,2,"));
}

#[tokio::test]
async fn test_request_without_files_is_rejected() {
    let base = start_configured().await;
    let response = post_analyze(&base, Form::new().text("comment", "no audio")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(detail(response).await.contains("No files uploaded"));
}

#[tokio::test]
async fn test_unsupported_extension_is_rejected() {
    let base = start_configured().await;
    let files = form(&[("talk.mp3", "talk"), ("notes.txt", "talk")]);
    let response = post_analyze(&base, files).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(detail(response).await.contains("Unsupported file type: notes.txt"));
}

#[tokio::test]
async fn test_only_silent_files_is_bad_request() {
    let base = start_configured().await;
    let response = post_analyze(&base, form(&[("silent.wav", "silent")])).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(detail(response).await.contains("No valid audio data"));
}

#[tokio::test]
async fn test_provider_failure_is_server_error() {
    let base = start_configured().await;
    let files = form(&[("talk.mp3", "talk"), ("broken.mp3", "??")]);
    let response = post_analyze(&base, files).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = detail(response).await;
    assert!(message.contains("broken.mp3"), "got: {message}");
    assert!(message.contains("audio could not be decoded"), "got: {message}");
}

#[tokio::test]
async fn test_missing_credentials_is_server_error() {
    let base = start(AppState::unconfigured(
        "ASSEMBLYAI_API_KEY environment variable is not set",
        "es",
    ))
    .await;

    let health = reqwest::get(format!("{base}/")).await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);

    let response = post_analyze(&base, form(&[("talk.mp3", "talk")])).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(detail(response).await.contains("ASSEMBLYAI_API_KEY"));
}
