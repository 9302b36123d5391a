use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use turn_latency_core::transcript::domain::provider_error::ProviderError;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("No files uploaded. Please upload at least one audio file.")]
    NoFiles,
    #[error("Unsupported file type: {file}. Supported formats: {supported}")]
    UnsupportedFile { file: String, supported: String },
    #[error("{0}")]
    MissingConfig(String),
    #[error("Failed to save uploaded file {file}: {source}")]
    Save {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Transcription(#[from] ProviderError),
    #[error("No valid audio data found in uploaded files. Check that they contain speech.")]
    NoUsableAudio,
    #[error("Invalid upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error("Processing failed: {0}")]
    Internal(String),
}

impl RouteError {
    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::NoFiles
            | RouteError::UnsupportedFile { .. }
            | RouteError::NoUsableAudio => StatusCode::BAD_REQUEST,
            RouteError::Multipart(e) => e.status(),
            RouteError::MissingConfig(_)
            | RouteError::Save { .. }
            | RouteError::Transcription(_)
            | RouteError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{self}");
        } else {
            log::warn!("{self}");
        }
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}
