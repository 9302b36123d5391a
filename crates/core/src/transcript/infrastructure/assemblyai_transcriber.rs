use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::blocking::{Client, RequestBuilder, Response};
use thiserror::Error;

use crate::shared::audio_files::file_id;
use crate::shared::constants::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_ASSEMBLYAI_BASE_URL, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_TRANSCRIPTION_TIMEOUT_SECS,
};
use crate::transcript::domain::provider_error::{ProviderError, ProviderErrorKind};
use crate::transcript::domain::transcriber::Transcriber;
use crate::transcript::domain::utterance::Utterance;

use super::assemblyai_schema::{
    ApiErrorBody, TranscriptRequest, TranscriptResponse, TranscriptStatus, UploadResponse,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    MissingApiKey(&'static str),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssemblyAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl AssemblyAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_ASSEMBLYAI_BASE_URL.to_string(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            timeout: Duration::from_secs(DEFAULT_TRANSCRIPTION_TIMEOUT_SECS),
        }
    }

    /// Reads the API key (required) and base URL (optional) from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_ENV))?;
        let mut config = Self::new(api_key);
        if let Some(url) = lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        Ok(config)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Diarized transcription through the AssemblyAI REST API.
///
/// Each call uploads the file, submits a transcript job with speaker labels,
/// then polls until the job completes, fails, or the timeout elapses.
///
/// The client has no global timeout; every request is bounded by
/// `AssemblyAiConfig::timeout` instead, so large uploads are not cut short.
pub struct AssemblyAiTranscriber {
    client: Client,
    config: AssemblyAiConfig,
}

impl AssemblyAiTranscriber {
    pub fn new(config: AssemblyAiConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(ConfigError::Client)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AssemblyAiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("authorization", self.config.api_key.as_str())
            .timeout(self.config.timeout)
    }

    fn upload(&self, bytes: Vec<u8>) -> Result<String, ProviderErrorKind> {
        let response = self
            .authorized(self.client.post(self.url("/v2/upload")))
            .header("content-type", "application/octet-stream")
            .body(bytes)
            .send()
            .map_err(ProviderErrorKind::Http)?;
        let upload: UploadResponse = parse_success(response)?;
        Ok(upload.upload_url)
    }

    fn submit(&self, audio_url: &str, language_code: &str) -> Result<String, ProviderErrorKind> {
        let request = TranscriptRequest {
            audio_url,
            speaker_labels: true,
            language_code,
        };
        let response = self
            .authorized(self.client.post(self.url("/v2/transcript")))
            .json(&request)
            .send()
            .map_err(ProviderErrorKind::Http)?;
        let transcript: TranscriptResponse = parse_success(response)?;
        Ok(transcript.id)
    }

    fn poll(&self, transcript_id: &str) -> Result<Vec<Utterance>, ProviderErrorKind> {
        let started = Instant::now();
        let url = self.url(&format!("/v2/transcript/{transcript_id}"));
        loop {
            let response = self
                .authorized(self.client.get(&url))
                .send()
                .map_err(ProviderErrorKind::Http)?;
            let transcript: TranscriptResponse = parse_success(response)?;

            match transcript.status {
                TranscriptStatus::Completed => {
                    let utterances = transcript.utterances.unwrap_or_default();
                    return Ok(utterances.into_iter().map(Utterance::from).collect());
                }
                TranscriptStatus::Error => {
                    return Err(ProviderErrorKind::Failed(
                        transcript
                            .error
                            .unwrap_or_else(|| "unknown provider error".to_string()),
                    ));
                }
                TranscriptStatus::Queued | TranscriptStatus::Processing => {}
            }

            if started.elapsed() >= self.config.timeout {
                return Err(ProviderErrorKind::Timeout(self.config.timeout.as_secs()));
            }
            log::debug!(
                "Transcript {transcript_id} is {:?}, polling again",
                transcript.status
            );
            std::thread::sleep(self.config.poll_interval);
        }
    }
}

impl Transcriber for AssemblyAiTranscriber {
    fn transcribe(
        &self,
        audio_path: &Path,
        language_code: &str,
    ) -> Result<Vec<Utterance>, ProviderError> {
        let file = file_id(audio_path);
        let wrap = |kind: ProviderErrorKind| ProviderError::new(file.clone(), kind);

        let bytes = fs::read(audio_path).map_err(|e| wrap(ProviderErrorKind::Io(e)))?;
        log::info!("{file}: uploading {} bytes", bytes.len());
        let audio_url = self.upload(bytes).map_err(wrap)?;

        let transcript_id = self.submit(&audio_url, language_code).map_err(wrap)?;
        log::info!("{file}: transcript {transcript_id} submitted");

        let utterances = self.poll(&transcript_id).map_err(wrap)?;
        log::info!(
            "{file}: transcription completed ({} utterances)",
            utterances.len()
        );
        Ok(utterances)
    }
}

fn parse_success<T: serde::de::DeserializeOwned>(
    response: Response,
) -> Result<T, ProviderErrorKind> {
    let status = response.status();
    let body = response.text().map_err(ProviderErrorKind::Http)?;
    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|b| b.error)
            .unwrap_or(body);
        return Err(ProviderErrorKind::Api {
            status: status.as_u16(),
            message,
        });
    }
    serde_json::from_str(&body).map_err(ProviderErrorKind::Parse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = AssemblyAiConfig::new("key");
        assert_eq!(config.base_url, "https://api.assemblyai.com");
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.timeout, Duration::from_secs(1800));
    }

    #[test]
    fn test_config_missing_key() {
        let result = AssemblyAiConfig::from_lookup(lookup(&[]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingApiKey("ASSEMBLYAI_API_KEY"))
        ));
    }

    #[test]
    fn test_config_blank_key_is_missing() {
        let result = AssemblyAiConfig::from_lookup(lookup(&[("ASSEMBLYAI_API_KEY", "  ")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_base_url_override() {
        let config = AssemblyAiConfig::from_lookup(lookup(&[
            ("ASSEMBLYAI_API_KEY", "secret"),
            ("ASSEMBLYAI_BASE_URL", "http://localhost:9000/"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.base_url, "http://localhost:9000");
    }

    #[test]
    fn test_builders() {
        let config = AssemblyAiConfig::new("k")
            .with_poll_interval(Duration::from_secs(1))
            .with_timeout(Duration::from_secs(60));
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_missing_file_reports_file_name() {
        let transcriber = AssemblyAiTranscriber::new(AssemblyAiConfig::new("k")).unwrap();
        let err = transcriber
            .transcribe(Path::new("/nonexistent/dir/call_07.mp3"), "es")
            .unwrap_err();
        assert_eq!(err.file, "call_07.mp3");
        assert!(matches!(err.kind, ProviderErrorKind::Io(_)));
    }

    #[test]
    fn test_unreachable_provider_is_http_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let audio = tmp.path().join("a.wav");
        fs::write(&audio, b"RIFF").unwrap();
        let mut config = AssemblyAiConfig::new("k");
        config.base_url = "http://127.0.0.1:1".to_string();
        let err = AssemblyAiTranscriber::new(config)
            .unwrap()
            .transcribe(&audio, "en")
            .unwrap_err();
        assert_eq!(err.file, "a.wav");
        assert!(matches!(err.kind, ProviderErrorKind::Http(_)));
    }

    #[test]
    fn test_upload_is_bounded_by_configured_timeout() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        // Accepts the connection but never answers.
        std::thread::spawn(move || {
            let (_stream, _) = listener.accept().unwrap();
            std::thread::sleep(Duration::from_secs(5));
        });

        let tmp = tempfile::TempDir::new().unwrap();
        let audio = tmp.path().join("long_call.wav");
        fs::write(&audio, vec![0u8; 64 * 1024]).unwrap();
        let mut config = AssemblyAiConfig::new("k").with_timeout(Duration::from_millis(300));
        config.base_url = format!("http://{addr}");

        let started = Instant::now();
        let err = AssemblyAiTranscriber::new(config)
            .unwrap()
            .transcribe(&audio, "es")
            .unwrap_err();
        assert_eq!(err.file, "long_call.wav");
        match err.kind {
            ProviderErrorKind::Http(e) => assert!(e.is_timeout(), "got: {e}"),
            other => panic!("expected HTTP timeout, got {other}"),
        }
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    #[ignore] // Requires ASSEMBLYAI_API_KEY and network access
    fn test_transcribe_live() {
        let config = AssemblyAiConfig::from_env().expect("ASSEMBLYAI_API_KEY not set");
        let path = std::env::var("TURN_LATENCY_SAMPLE_AUDIO").expect("sample audio path");
        let utterances = AssemblyAiTranscriber::new(config)
            .unwrap()
            .transcribe(Path::new(&path), "en")
            .expect("transcription failed");
        assert!(!utterances.is_empty());
    }
}
