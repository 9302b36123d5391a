//! Turn-taking latency analysis for diarized transcripts.
//!
//! `transcript` obtains speaker-attributed utterances, `latency` derives turns
//! and per-file gap statistics, `pipeline` runs many files through both, and
//! `report` renders the results as CSV.

pub mod latency;
pub mod pipeline;
pub mod report;
pub mod shared;
pub mod transcript;
