use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("input folder '{0}' does not exist")]
    MissingDir(PathBuf),
    #[error("no supported files found in '{dir}' (supported: {supported})")]
    NoFiles { dir: PathBuf, supported: String },
    #[error("failed to list '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lists files directly inside `dir` whose extension is one of `extensions`
/// (case-insensitive), sorted by path.
pub fn discover(dir: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>, DiscoveryError> {
    if !dir.is_dir() {
        return Err(DiscoveryError::MissingDir(dir.to_path_buf()));
    }

    let io_err = |source| DiscoveryError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && has_extension(&path, extensions) {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(DiscoveryError::NoFiles {
            dir: dir.to_path_buf(),
            supported: extensions.join(", "),
        });
    }

    files.sort();
    Ok(files)
}

pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Identifier used for a file in reports and errors: its file name.
pub fn file_id(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::AUDIO_EXTENSIONS;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_discover_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        for name in ["b.wav", "a.MP3", "notes.txt", "c.flac"] {
            fs::write(tmp.path().join(name), b"").unwrap();
        }
        fs::create_dir(tmp.path().join("nested.mp3")).unwrap();

        let files = discover(tmp.path(), AUDIO_EXTENSIONS).unwrap();
        let names: Vec<String> = files.iter().map(|p| file_id(p)).collect();
        assert_eq!(names, vec!["a.MP3", "b.wav", "c.flac"]);
    }

    #[test]
    fn test_discover_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let err = discover(&tmp.path().join("absent"), AUDIO_EXTENSIONS).unwrap_err();
        assert!(matches!(err, DiscoveryError::MissingDir(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_discover_no_supported_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("readme.md"), b"").unwrap();
        let err = discover(tmp.path(), AUDIO_EXTENSIONS).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("no supported files"), "got: {msg}");
        assert!(msg.contains("mp3, wav"), "got: {msg}");
    }

    #[rstest]
    #[case::lowercase("call.wav", true)]
    #[case::uppercase("CALL.M4A", true)]
    #[case::unsupported("call.aac", false)]
    #[case::no_extension("call", false)]
    fn test_has_extension(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(has_extension(Path::new(name), AUDIO_EXTENSIONS), expected);
    }

    #[test]
    fn test_file_id_is_file_name() {
        assert_eq!(file_id(Path::new("/data/audios/call_01.mp3")), "call_01.mp3");
    }
}
