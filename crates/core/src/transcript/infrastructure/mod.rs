pub mod assemblyai_schema;
pub mod assemblyai_transcriber;
pub mod json_transcriber;
