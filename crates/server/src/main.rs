use std::net::SocketAddr;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use turn_latency_core::shared::constants::{
    DEFAULT_LANGUAGE_CODE, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};
use turn_latency_core::transcript::infrastructure::assemblyai_transcriber::{
    AssemblyAiConfig, AssemblyAiTranscriber,
};
use turn_latency_server::{router, AppState};

/// Serve turn-latency analysis over HTTP.
#[derive(Parser)]
#[command(name = "turn-latency-server")]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = DEFAULT_SERVER_HOST)]
    host: String,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_SERVER_PORT)]
    port: u16,

    /// Language code passed to the transcription provider.
    #[arg(long, default_value = DEFAULT_LANGUAGE_CODE)]
    language: String,

    /// Seconds between transcript status checks.
    #[arg(long, default_value = "3")]
    poll_interval_secs: u64,

    /// Give up on a transcript after this many seconds.
    #[arg(long, default_value = "1800")]
    timeout_secs: u64,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if args.poll_interval_secs == 0 {
        return Err("Poll interval must be at least 1 second".into());
    }
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let state = build_state(&args)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            log::info!("Listening on http://{addr}");
            axum::serve(listener, router(state))
                .with_graceful_shutdown(shutdown_signal())
                .await
        })?;

    log::info!("Server stopped");
    Ok(())
}

fn build_state(args: &Args) -> Result<AppState, Box<dyn std::error::Error>> {
    match AssemblyAiConfig::from_env() {
        Ok(config) => {
            let config = config
                .with_poll_interval(Duration::from_secs(args.poll_interval_secs))
                .with_timeout(Duration::from_secs(args.timeout_secs));
            log::info!("Using AssemblyAI at {}", config.base_url);
            let transcriber = AssemblyAiTranscriber::new(config)?;
            Ok(AppState::new(Arc::new(transcriber), &args.language))
        }
        Err(e) => {
            log::warn!("{e}; POST /analyze will fail until it is set");
            Ok(AppState::unconfigured(&e.to_string(), &args.language))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
    }
}
