pub mod provider_error;
pub mod transcriber;
pub mod utterance;
