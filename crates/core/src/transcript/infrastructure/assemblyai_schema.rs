//! Wire types for the AssemblyAI v2 transcript API.
//!
//! Shared by the HTTP transcriber and the offline JSON reader, since saved
//! transcripts use the same shape as the polling response.

use serde::{Deserialize, Serialize};

use crate::transcript::domain::utterance::Utterance;

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub upload_url: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptRequest<'a> {
    pub audio_url: &'a str,
    pub speaker_labels: bool,
    pub language_code: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptStatus {
    Queued,
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptResponse {
    pub id: String,
    pub status: TranscriptStatus,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub utterances: Option<Vec<UtterancePayload>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UtterancePayload {
    pub speaker: String,
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub text: Option<String>,
}

impl From<UtterancePayload> for Utterance {
    fn from(payload: UtterancePayload) -> Self {
        // Timestamps are integral milliseconds on the wire; truncate any fraction.
        Utterance::new(
            payload.speaker,
            payload.start as i64,
            payload.end as i64,
            payload.text.unwrap_or_default(),
        )
    }
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// A saved transcript: either a full transcript object or a bare utterance list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SavedTranscript {
    Utterances(Vec<UtterancePayload>),
    Transcript {
        #[serde(default)]
        utterances: Option<Vec<UtterancePayload>>,
    },
}

impl SavedTranscript {
    pub fn into_utterances(self) -> Vec<Utterance> {
        let payloads = match self {
            SavedTranscript::Utterances(list) => list,
            SavedTranscript::Transcript { utterances } => utterances.unwrap_or_default(),
        };
        payloads.into_iter().map(Utterance::from).collect()
    }
}
