use std::path::PathBuf;

use crate::pipeline::analyze_file_use_case::{AnalyzeFileUseCase, FileAnalysis};
use crate::pipeline::batch_logger::BatchLogger;
use crate::transcript::domain::provider_error::ProviderError;

/// Result of analyzing one input file.
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<FileAnalysis, ProviderError>,
    pub elapsed_ms: f64,
}

/// Abstracts how a list of files is pushed through [`AnalyzeFileUseCase`].
///
/// Implementations must return one outcome per file, in the order of
/// `files`, whatever order the work actually completes in.
pub trait BatchExecutor: Send {
    fn execute(
        &self,
        use_case: &AnalyzeFileUseCase,
        files: &[PathBuf],
        logger: &mut dyn BatchLogger,
    ) -> Vec<FileOutcome>;
}
