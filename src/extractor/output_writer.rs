use crate::error::{DocExtractError, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Persists extracted text as UTF-8.
///
/// Atomic mode writes into a temporary file beside the destination and
/// renames it over the target, so readers never observe a partial file.
#[derive(Debug, Clone, Copy)]
pub struct OutputWriter {
    atomic: bool,
}

impl OutputWriter {
    pub fn new(atomic: bool) -> Self {
        Self { atomic }
    }

    pub fn is_atomic(&self) -> bool {
        self.atomic
    }

    pub fn write_text(&self, destination: &Path, text: &str) -> Result<()> {
        let wrap = |source: std::io::Error| DocExtractError::OutputWrite {
            path: destination.to_path_buf(),
            source,
        };

        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(wrap)?;

        if !self.atomic {
            return fs::write(destination, text).map_err(wrap);
        }

        let mut temp = NamedTempFile::new_in(parent).map_err(wrap)?;
        temp.write_all(text.as_bytes()).map_err(wrap)?;
        temp.flush().map_err(wrap)?;
        temp.persist(destination).map_err(|e| wrap(e.error))?;

        Ok(())
    }
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new(true)
    }
}
