pub mod file_summary;
pub mod gap_statistics;
pub mod turn;
pub mod turn_extractor;
