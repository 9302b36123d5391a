mod analyze;
mod health;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use turn_latency_core::shared::constants::MAX_UPLOAD_BYTES;
use turn_latency_core::transcript::domain::transcriber::Transcriber;

use crate::error::RouteError;

/// Shared by every request handler.
///
/// A server started without provider credentials still answers health
/// checks; analysis requests then fail with the stored reason.
#[derive(Clone)]
pub struct AppState {
    transcriber: Result<Arc<dyn Transcriber>, Arc<str>>,
    language_code: Arc<str>,
}

impl AppState {
    pub fn new(transcriber: Arc<dyn Transcriber>, language_code: &str) -> Self {
        Self {
            transcriber: Ok(transcriber),
            language_code: language_code.into(),
        }
    }

    pub fn unconfigured(reason: &str, language_code: &str) -> Self {
        Self {
            transcriber: Err(reason.into()),
            language_code: language_code.into(),
        }
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    fn transcriber(&self) -> Result<Arc<dyn Transcriber>, RouteError> {
        self.transcriber
            .clone()
            .map_err(|reason| RouteError::MissingConfig(reason.to_string()))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::handler))
        .route("/analyze", post(analyze::handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
