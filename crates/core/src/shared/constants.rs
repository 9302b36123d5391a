pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "mp4", "flac", "ogg"];
pub const TRANSCRIPT_EXTENSIONS: &[&str] = &["json"];

pub const DEFAULT_AUDIOS_DIR: &str = "./audios";
pub const DEFAULT_OUTPUTS_DIR: &str = "./outputs";
pub const DEFAULT_LANGUAGE_CODE: &str = "es";
pub const DEFAULT_WORKERS: usize = 4;

pub const API_KEY_ENV: &str = "ASSEMBLYAI_API_KEY";
pub const BASE_URL_ENV: &str = "ASSEMBLYAI_BASE_URL";
pub const DEFAULT_ASSEMBLYAI_BASE_URL: &str = "https://api.assemblyai.com";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;
pub const DEFAULT_TRANSCRIPTION_TIMEOUT_SECS: u64 = 1800;

pub const TURN_REPORT_SUFFIX: &str = "_turns.csv";
pub const SUMMARY_REPORT_FILENAME: &str = "summary_all_audios.csv";

pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 8000;
pub const UPLOAD_FIELD: &str = "files";
pub const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;
