use thiserror::Error;

/// Why a transcription request did not yield utterances.
#[derive(Error, Debug)]
pub enum ProviderErrorKind {
    #[error("failed to read input: {0}")]
    Io(#[source] std::io::Error),
    #[error("request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("provider returned HTTP {status}: {message}")]
    Api { status: u16, message: String },
    #[error("transcription failed: {0}")]
    Failed(String),
    #[error("transcription did not complete within {0} seconds")]
    Timeout(u64),
    #[error("malformed transcript: {0}")]
    Parse(#[source] serde_json::Error),
}

/// A transcription failure for one input file.
///
/// Always carries the offending file name so a batch run can report it and
/// move on to the next file.
#[derive(Error, Debug)]
#[error("transcription failed for {file}: {kind}")]
pub struct ProviderError {
    pub file: String,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(file: impl Into<String>, kind: ProviderErrorKind) -> Self {
        Self {
            file: file.into(),
            kind,
        }
    }
}
