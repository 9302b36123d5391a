use std::fs;
use std::path::Path;

use crate::shared::audio_files::file_id;
use crate::transcript::domain::provider_error::{ProviderError, ProviderErrorKind};
use crate::transcript::domain::transcriber::Transcriber;
use crate::transcript::domain::utterance::Utterance;

use super::assemblyai_schema::SavedTranscript;

/// Reads utterances from a saved transcript JSON file instead of calling a
/// provider. Useful for re-analyzing transcripts without re-uploading audio.
///
/// The language code is ignored: the transcript already exists.
#[derive(Debug, Default)]
pub struct JsonTranscriber;

impl JsonTranscriber {
    pub fn new() -> Self {
        Self
    }
}

impl Transcriber for JsonTranscriber {
    fn transcribe(
        &self,
        transcript_path: &Path,
        _language_code: &str,
    ) -> Result<Vec<Utterance>, ProviderError> {
        let file = file_id(transcript_path);
        let json = fs::read_to_string(transcript_path)
            .map_err(|e| ProviderError::new(file.clone(), ProviderErrorKind::Io(e)))?;
        let saved: SavedTranscript = serde_json::from_str(&json)
            .map_err(|e| ProviderError::new(file.clone(), ProviderErrorKind::Parse(e)))?;
        Ok(saved.into_utterances())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_saved_transcript() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("call.json");
        fs::write(
            &path,
            r#"{"id": "t1", "status": "completed", "utterances": [
                {"speaker": "A", "start": 0, "end": 1000, "text": "Hola"},
                {"speaker": "B", "start": 1200, "end": 2000, "text": "Hola, que tal"}
            ]}"#,
        )
        .unwrap();

        let utterances = JsonTranscriber::new().transcribe(&path, "es").unwrap();
        assert_eq!(
            utterances,
            vec![
                Utterance::new("A", 0, 1000, "Hola"),
                Utterance::new("B", 1200, 2000, "Hola, que tal"),
            ]
        );
    }

    #[test]
    fn test_missing_file_is_io_error_with_name() {
        let err = JsonTranscriber::new()
            .transcribe(Path::new("/nonexistent/call.json"), "es")
            .unwrap_err();
        assert_eq!(err.file, "call.json");
        assert!(matches!(err.kind, ProviderErrorKind::Io(_)));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonTranscriber::new().transcribe(&path, "es").unwrap_err();
        assert_eq!(err.file, "broken.json");
        assert!(matches!(err.kind, ProviderErrorKind::Parse(_)));
    }

    #[test]
    fn test_transcript_without_utterances_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("empty.json");
        fs::write(&path, r#"{"id": "t2", "status": "completed", "utterances": null}"#).unwrap();

        let utterances = JsonTranscriber::new().transcribe(&path, "es").unwrap();
        assert!(utterances.is_empty());
    }
}
