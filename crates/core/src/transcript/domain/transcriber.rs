use std::path::Path;

use super::provider_error::ProviderError;
use super::utterance::Utterance;

/// Domain interface for diarized speech-to-text.
///
/// Implementations turn one audio input into speaker-attributed utterances.
/// They must be shareable across worker threads; each call is independent.
pub trait Transcriber: Send + Sync {
    fn transcribe(&self, audio_path: &Path, language_code: &str)
        -> Result<Vec<Utterance>, ProviderError>;
}

impl<T: Transcriber + ?Sized> Transcriber for std::sync::Arc<T> {
    fn transcribe(
        &self,
        audio_path: &Path,
        language_code: &str,
    ) -> Result<Vec<Utterance>, ProviderError> {
        (**self).transcribe(audio_path, language_code)
    }
}
