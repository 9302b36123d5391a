use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::latency::domain::file_summary::FileSummary;
use crate::pipeline::analyze_file_use_case::AnalyzeFileUseCase;
use crate::pipeline::batch_executor::BatchExecutor;
use crate::pipeline::batch_logger::BatchLogger;
use crate::report::csv_report::{turn_report_names, ReportError, ReportWriter};
use crate::shared::audio_files::file_id;
use crate::shared::constants::TURN_REPORT_SUFFIX;
use crate::transcript::domain::provider_error::ProviderError;

/// What a batch run produced.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// One summary per file that was transcribed, in input order.
    pub summaries: Vec<FileSummary>,
    pub turn_reports: Vec<PathBuf>,
    pub summary_report: Option<PathBuf>,
    /// Files that transcribed to zero utterances.
    pub empty_files: Vec<String>,
    pub failures: Vec<ProviderError>,
}

/// Analyzes every file of a batch and writes the CSV reports.
///
/// A provider failure only drops that file from the summary. An empty
/// transcript still yields a summary row, with every statistic absent.
/// Report I/O failures abort the batch.
pub struct AnalyzeBatchUseCase {
    use_case: AnalyzeFileUseCase,
    executor: Box<dyn BatchExecutor>,
    writer: ReportWriter,
    write_turn_reports: bool,
}

impl AnalyzeBatchUseCase {
    pub fn new(
        use_case: AnalyzeFileUseCase,
        executor: Box<dyn BatchExecutor>,
        writer: ReportWriter,
        write_turn_reports: bool,
    ) -> Self {
        Self {
            use_case,
            executor,
            writer,
            write_turn_reports,
        }
    }

    pub fn run(
        &self,
        files: &[PathBuf],
        logger: &mut dyn BatchLogger,
    ) -> Result<BatchResult, ReportError> {
        logger.info(&format!(
            "Analyzing {} file(s), language '{}'",
            files.len(),
            self.use_case.language_code()
        ));

        let file_ids: Vec<String> = files.iter().map(|path| file_id(path)).collect();
        let report_names: HashMap<&Path, String> = files
            .iter()
            .map(PathBuf::as_path)
            .zip(turn_report_names(file_ids.iter().map(String::as_str)))
            .collect();

        let outcomes = self.executor.execute(&self.use_case, files, logger);
        let mut result = BatchResult::default();

        for outcome in outcomes {
            let analysis = match outcome.result {
                Ok(analysis) => analysis,
                Err(e) => {
                    logger.warn(&e.to_string());
                    result.failures.push(e);
                    continue;
                }
            };

            if let Some(warning) = analysis.warning {
                logger.warn(&format!("{}: {warning}", analysis.file_id));
                result.empty_files.push(analysis.file_id.clone());
            }

            if self.write_turn_reports && !analysis.turns.is_empty() {
                let report_name = match report_names.get(outcome.path.as_path()) {
                    Some(name) => name.clone(),
                    None => format!("{}{TURN_REPORT_SUFFIX}", analysis.file_id),
                };
                let path = self.writer.write_turn_report(
                    &report_name,
                    &analysis.file_id,
                    &analysis.turns,
                )?;
                logger.info(&format!("Saved: {}", path.display()));
                result.turn_reports.push(path);
            }

            result.summaries.push(analysis.summary);
        }

        if result.summaries.is_empty() {
            logger.warn("No summary data to save");
        } else {
            let path = self.writer.write_summary_report(&result.summaries)?;
            logger.info(&format!("Summary saved: {}", path.display()));
            result.summary_report = Some(path);
        }

        logger.info(&format!(
            "Done: {} analyzed, {} without utterances, {} failed",
            result.summaries.len(),
            result.empty_files.len(),
            result.failures.len()
        ));
        logger.summary();
        Ok(result)
    }
}
