pub mod analyze_batch_use_case;
pub mod analyze_file_use_case;
pub mod batch_executor;
pub mod batch_logger;
pub mod infrastructure;
