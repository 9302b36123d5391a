use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::pipeline::analyze_file_use_case::AnalyzeFileUseCase;
use crate::pipeline::batch_executor::{BatchExecutor, FileOutcome};
use crate::pipeline::batch_logger::BatchLogger;
use crate::shared::audio_files::file_id;
use crate::shared::constants::DEFAULT_WORKERS;
use crate::transcript::domain::provider_error::{ProviderError, ProviderErrorKind};

/// Analyzes files on a fixed pool of worker threads.
///
/// Layout: `task queue → N workers [transcribe/extract/summarize] → collector`
///
/// Each file is independent, so workers share nothing but the read-only use
/// case. The collector runs on the calling thread and restores input order.
/// A file whose worker panicked is reported as a failed outcome.
pub struct ThreadedBatchExecutor {
    workers: usize,
}

impl ThreadedBatchExecutor {
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadedBatchExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl BatchExecutor for ThreadedBatchExecutor {
    fn execute(
        &self,
        use_case: &AnalyzeFileUseCase,
        files: &[PathBuf],
        logger: &mut dyn BatchLogger,
    ) -> Vec<FileOutcome> {
        let total = files.len();
        if total == 0 {
            return Vec::new();
        }
        let workers = self.workers.min(total);

        let (task_tx, task_rx) = crossbeam_channel::unbounded::<(usize, &Path)>();
        for (index, path) in files.iter().enumerate() {
            if task_tx.send((index, path.as_path())).is_err() {
                break;
            }
        }
        drop(task_tx);

        let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, FileOutcome)>();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let task_rx = task_rx.clone();
                    let result_tx = result_tx.clone();
                    scope.spawn(move || run_worker(use_case, task_rx, result_tx))
                })
                .collect();
            drop(result_tx);

            let mut slots: Vec<Option<FileOutcome>> = (0..total).map(|_| None).collect();
            let mut completed = 0;
            for (index, outcome) in result_rx {
                completed += 1;
                logger.timing("analyze", outcome.elapsed_ms);
                logger.progress(completed, total);
                slots[index] = Some(outcome);
            }

            for handle in handles {
                if handle.join().is_err() {
                    logger.warn("Worker thread panicked");
                }
            }

            slots
                .into_iter()
                .zip(files)
                .map(|(slot, path)| {
                    slot.unwrap_or_else(|| {
                        let file = file_id(path);
                        logger.warn(&format!("{file}: no result, worker thread panicked"));
                        FileOutcome {
                            path: path.clone(),
                            result: Err(ProviderError::new(
                                file,
                                ProviderErrorKind::Failed("worker thread panicked".to_string()),
                            )),
                            elapsed_ms: 0.0,
                        }
                    })
                })
                .collect()
        })
    }
}

fn run_worker(
    use_case: &AnalyzeFileUseCase,
    task_rx: crossbeam_channel::Receiver<(usize, &Path)>,
    result_tx: crossbeam_channel::Sender<(usize, FileOutcome)>,
) {
    for (index, path) in task_rx {
        let started = Instant::now();
        let result = use_case.run(path);
        let outcome = FileOutcome {
            path: path.to_path_buf(),
            result,
            elapsed_ms: started.elapsed().as_secs_f64() * 1000.0,
        };
        if result_tx.send((index, outcome)).is_err() {
            break;
        }
    }
}
