use std::path::Path;

use crate::latency::domain::file_summary::{summarize, FileSummary};
use crate::latency::domain::turn::Turn;
use crate::latency::domain::turn_extractor::{extract_turns, ExtractionWarning};
use crate::shared::audio_files::file_id;
use crate::transcript::domain::provider_error::ProviderError;
use crate::transcript::domain::transcriber::Transcriber;
use crate::transcript::domain::utterance::Utterance;

/// Everything derived from one input file.
#[derive(Clone, Debug, PartialEq)]
pub struct FileAnalysis {
    pub file_id: String,
    pub turns: Vec<Turn>,
    pub summary: FileSummary,
    pub warning: Option<ExtractionWarning>,
}

/// Runs extraction and aggregation over already-transcribed utterances.
pub fn analyze_utterances(file_id: &str, utterances: &[Utterance]) -> FileAnalysis {
    let extraction = extract_turns(file_id, utterances);
    let summary = summarize(file_id, &extraction.turns);
    FileAnalysis {
        file_id: file_id.to_string(),
        turns: extraction.turns,
        summary,
        warning: extraction.warning,
    }
}

/// Transcribes one file and derives its turns and latency summary.
///
/// Holds no per-file state, so one instance can serve many worker threads.
pub struct AnalyzeFileUseCase {
    transcriber: Box<dyn Transcriber>,
    language_code: String,
}

impl AnalyzeFileUseCase {
    pub fn new(transcriber: Box<dyn Transcriber>, language_code: &str) -> Self {
        Self {
            transcriber,
            language_code: language_code.to_string(),
        }
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    pub fn run(&self, audio_path: &Path) -> Result<FileAnalysis, ProviderError> {
        let file_id = file_id(audio_path);
        log::info!("Processing: {file_id}");
        let utterances = self
            .transcriber
            .transcribe(audio_path, &self.language_code)?;
        log::debug!("{file_id}: {} utterance(s)", utterances.len());
        Ok(analyze_utterances(&file_id, &utterances))
    }
}
