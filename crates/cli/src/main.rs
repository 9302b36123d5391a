use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;

use turn_latency_core::pipeline::analyze_batch_use_case::AnalyzeBatchUseCase;
use turn_latency_core::pipeline::analyze_file_use_case::AnalyzeFileUseCase;
use turn_latency_core::pipeline::batch_logger::StdoutBatchLogger;
use turn_latency_core::pipeline::infrastructure::threaded_batch_executor::ThreadedBatchExecutor;
use turn_latency_core::report::csv_report::ReportWriter;
use turn_latency_core::shared::audio_files;
use turn_latency_core::shared::constants::{
    API_KEY_ENV, AUDIO_EXTENSIONS, DEFAULT_AUDIOS_DIR, DEFAULT_LANGUAGE_CODE, DEFAULT_OUTPUTS_DIR,
    TRANSCRIPT_EXTENSIONS,
};
use turn_latency_core::transcript::domain::transcriber::Transcriber;
use turn_latency_core::transcript::infrastructure::assemblyai_transcriber::{
    AssemblyAiConfig, AssemblyAiTranscriber,
};
use turn_latency_core::transcript::infrastructure::json_transcriber::JsonTranscriber;

/// Measure turn-taking latency between speakers in audio files.
#[derive(Parser)]
#[command(name = "turn-latency")]
struct Cli {
    /// Folder containing the audio files (or saved transcripts with --provider json).
    #[arg(long, default_value = DEFAULT_AUDIOS_DIR)]
    audios: PathBuf,

    /// Folder where CSV reports are written (created if missing).
    #[arg(long, default_value = DEFAULT_OUTPUTS_DIR)]
    outputs: PathBuf,

    /// Language code passed to the transcription provider.
    #[arg(long, default_value = DEFAULT_LANGUAGE_CODE)]
    language: String,

    /// Number of files transcribed concurrently.
    #[arg(long, default_value = "4")]
    workers: usize,

    /// Transcription source: assemblyai or json (saved transcripts).
    #[arg(long, default_value = "assemblyai")]
    provider: String,

    /// Seconds between transcript status checks.
    #[arg(long, default_value = "3")]
    poll_interval_secs: u64,

    /// Give up on a transcript after this many seconds.
    #[arg(long, default_value = "1800")]
    timeout_secs: u64,

    /// Only write the cross-file summary, not one turn table per file.
    #[arg(long)]
    no_turn_reports: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Provider {
    AssemblyAi,
    Json,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let provider = parse_provider(&cli.provider);
    let transcriber = build_transcriber(&cli, provider)?;
    let files = audio_files::discover(&cli.audios, input_extensions(provider))?;
    log::info!("Found {} input file(s) in {}", files.len(), cli.audios.display());

    let batch = AnalyzeBatchUseCase::new(
        AnalyzeFileUseCase::new(transcriber, &cli.language),
        Box::new(ThreadedBatchExecutor::new(cli.workers)),
        ReportWriter::new(&cli.outputs),
        !cli.no_turn_reports,
    );
    let mut logger = StdoutBatchLogger::new();
    let result = batch.run(&files, &mut logger)?;

    match result.summary_report {
        Some(path) => log::info!("Results saved in {}", report_dir(&path).display()),
        None => log::warn!("No file produced a summary"),
    }
    Ok(())
}

fn build_transcriber(
    cli: &Cli,
    provider: Provider,
) -> Result<Box<dyn Transcriber>, Box<dyn std::error::Error>> {
    match provider {
        Provider::Json => Ok(Box::new(JsonTranscriber::new())),
        Provider::AssemblyAi => {
            let config = AssemblyAiConfig::from_env()
                .map_err(|e| format!("{e}. Run: export {API_KEY_ENV}='your-api-key-here'"))?
                .with_poll_interval(Duration::from_secs(cli.poll_interval_secs))
                .with_timeout(Duration::from_secs(cli.timeout_secs));
            log::info!("Using AssemblyAI at {}", config.base_url);
            Ok(Box::new(AssemblyAiTranscriber::new(config)?))
        }
    }
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.audios.is_dir() {
        return Err(format!("Input folder not found: {}", cli.audios.display()).into());
    }
    if cli.workers == 0 {
        return Err("Workers must be at least 1".into());
    }
    if cli.poll_interval_secs == 0 {
        return Err("Poll interval must be at least 1 second".into());
    }
    if cli.timeout_secs < cli.poll_interval_secs {
        return Err(format!(
            "Timeout ({}s) must not be shorter than the poll interval ({}s)",
            cli.timeout_secs, cli.poll_interval_secs
        )
        .into());
    }
    if cli.language.trim().is_empty() {
        return Err("Language code must not be empty".into());
    }
    let valid_providers = ["assemblyai", "json"];
    if !valid_providers.contains(&cli.provider.as_str()) {
        return Err(format!(
            "Provider must be one of: assemblyai, json, got '{}'",
            cli.provider
        )
        .into());
    }
    Ok(())
}

fn parse_provider(provider: &str) -> Provider {
    if provider == "json" {
        Provider::Json
    } else {
        Provider::AssemblyAi
    }
}

fn input_extensions(provider: Provider) -> &'static [&'static str] {
    match provider {
        Provider::AssemblyAi => AUDIO_EXTENSIONS,
        Provider::Json => TRANSCRIPT_EXTENSIONS,
    }
}

fn report_dir(summary_path: &Path) -> &Path {
    summary_path.parent().unwrap_or(summary_path)
}
