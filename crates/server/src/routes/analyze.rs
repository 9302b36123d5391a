use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};

use turn_latency_core::pipeline::analyze_file_use_case::AnalyzeFileUseCase;
use turn_latency_core::report::csv_report::write_summaries;
use turn_latency_core::shared::audio_files::has_extension;
use turn_latency_core::shared::constants::{
    AUDIO_EXTENSIONS, SUMMARY_REPORT_FILENAME, UPLOAD_FIELD,
};
use turn_latency_core::transcript::domain::transcriber::Transcriber;

use super::AppState;
use crate::error::RouteError;

struct Upload {
    name: String,
    bytes: Bytes,
}

pub(super) async fn handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, RouteError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let raw_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        uploads.push((raw_name, bytes));
    }
    if uploads.is_empty() {
        return Err(RouteError::NoFiles);
    }

    let transcriber = state.transcriber()?;
    let uploads = uploads
        .into_iter()
        .map(|(raw_name, bytes)| {
            Ok(Upload {
                name: upload_name(&raw_name)?,
                bytes,
            })
        })
        .collect::<Result<Vec<_>, RouteError>>()?;

    log::info!("Analyzing {} uploaded file(s)", uploads.len());
    let language_code = state.language_code().to_string();
    let csv = tokio::task::spawn_blocking(move || {
        analyze_uploads(transcriber, &language_code, uploads)
    })
    .await
    .map_err(|e| RouteError::Internal(e.to_string()))??;

    let disposition = format!("attachment; filename=\"{SUMMARY_REPORT_FILENAME}\"");
    Ok((
        [(CONTENT_TYPE, "text/csv".to_string()), (CONTENT_DISPOSITION, disposition)],
        csv,
    )
        .into_response())
}

/// Reduces a client-supplied file name to its final component and checks
/// that it names a supported audio format.
fn upload_name(raw_name: &str) -> Result<String, RouteError> {
    let unsupported = || RouteError::UnsupportedFile {
        file: raw_name.to_string(),
        supported: AUDIO_EXTENSIONS.join(", "),
    };
    let name = Path::new(raw_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(unsupported)?;
    if !has_extension(Path::new(&name), AUDIO_EXTENSIONS) {
        return Err(unsupported());
    }
    Ok(name)
}

/// Saves each upload into a request-scoped temp folder and analyzes them in
/// order. Files without utterances are skipped; any provider failure fails
/// the whole request.
fn analyze_uploads(
    transcriber: Arc<dyn Transcriber>,
    language_code: &str,
    uploads: Vec<Upload>,
) -> Result<Vec<u8>, RouteError> {
    let dir = tempfile::Builder::new()
        .prefix("turn_latency_")
        .tempdir()
        .map_err(|e| RouteError::Internal(format!("failed to create temp folder: {e}")))?;
    let use_case = AnalyzeFileUseCase::new(Box::new(transcriber), language_code);

    let mut summaries = Vec::new();
    for upload in uploads {
        let path = dir.path().join(&upload.name);
        fs::write(&path, &upload.bytes).map_err(|source| RouteError::Save {
            file: upload.name.clone(),
            source,
        })?;

        let analysis = use_case.run(&path)?;
        if let Some(warning) = analysis.warning {
            log::warn!("{}: {warning}, skipped", analysis.file_id);
            continue;
        }
        summaries.push(analysis.summary);
    }

    if summaries.is_empty() {
        return Err(RouteError::NoUsableAudio);
    }
    let mut csv = Vec::new();
    write_summaries(&mut csv, &summaries).map_err(|e| RouteError::Internal(e.to_string()))?;
    Ok(csv)
}
