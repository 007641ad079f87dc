use crate::error::{DocExtractError, Result};
use std::fs;
use std::path::Path;

/// What an input path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// Missing, or its metadata could not be read
    Missing,
    File,
    Directory,
    /// Exists but is neither a regular file nor a directory
    Other,
}

/// Classify `path` by following symlinks. Never fails: a stat error is
/// reported as `Missing`.
pub fn classify(path: &Path) -> PathKind {
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => PathKind::File,
        Ok(metadata) if metadata.is_dir() => PathKind::Directory,
        Ok(_) => PathKind::Other,
        Err(err) => {
            tracing::debug!("Cannot stat {}: {}", path.display(), err);
            PathKind::Missing
        }
    }
}

/// Classify and turn unusable inputs into the run-aborting error.
pub fn require_processable(path: &Path) -> Result<PathKind> {
    match classify(path) {
        PathKind::Missing => Err(DocExtractError::InvalidPath {
            path: path.display().to_string(),
        }),
        PathKind::Other => Err(DocExtractError::NotFileOrDirectory {
            path: path.display().to_string(),
        }),
        kind => Ok(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_classify_file_and_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.pdf");
        std::fs::write(&file, b"%PDF").unwrap();

        assert_eq!(classify(temp_dir.path()), PathKind::Directory);
        assert_eq!(classify(&file), PathKind::File);
    }

    #[test]
    fn test_classify_missing() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");

        assert_eq!(classify(&missing), PathKind::Missing);
        assert!(matches!(
            require_processable(&missing),
            Err(DocExtractError::InvalidPath { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_classify_special_file() {
        assert_eq!(classify(Path::new("/dev/null")), PathKind::Other);
        assert!(matches!(
            require_processable(Path::new("/dev/null")),
            Err(DocExtractError::NotFileOrDirectory { .. })
        ));
    }
}
