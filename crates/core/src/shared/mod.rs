pub mod audio_files;
pub mod constants;
