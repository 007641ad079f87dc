use crate::error::{DocExtractError, Result};
use crate::scanner::file_filter::SupportedExtensionSet;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub source_path: PathBuf,
    pub relative_path: PathBuf,
    pub filename: String,
    pub extension: String,
    pub size: u64,
}

impl DocumentFile {
    pub fn new(source_path: PathBuf, relative_path: PathBuf, size: u64) -> Self {
        let filename = source_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
            .to_string();

        let extension = source_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        Self {
            source_path,
            relative_path,
            filename,
            extension,
            size,
        }
    }

    pub fn display_path(&self) -> String {
        self.relative_path.display().to_string()
    }
}

/// Files found under a root plus the entries that could not be read.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub documents: Vec<DocumentFile>,
    pub skipped: Vec<String>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

pub struct DocumentScanner {
    extensions: SupportedExtensionSet,
    follow_links: bool,
}

impl DocumentScanner {
    pub fn new(extensions: &SupportedExtensionSet) -> Self {
        Self {
            extensions: extensions.clone(),
            follow_links: false,
        }
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Every supported file under `root`, sorted by relative path. An empty
    /// result is not an error.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<ScanResult> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Err(DocExtractError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut result = ScanResult::default();

        let walker = WalkDir::new(root_path)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    if err
                        .io_error()
                        .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
                    {
                        result.skipped.push(format!("Permission denied: {}", err));
                    } else {
                        result.skipped.push(format!("Scan error: {}", err));
                    }
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            match self.process_file(&entry, root_path) {
                Ok(Some(doc_file)) => result.documents.push(doc_file),
                Ok(None) => {}
                Err(err) => {
                    result.skipped.push(format!(
                        "Error processing {}: {}",
                        entry.path().display(),
                        err
                    ));
                }
            }
        }

        // Component-wise order, so "a/b.pdf" sorts before "a.pdf"
        result
            .documents
            .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        Ok(result)
    }

    fn process_file(&self, entry: &DirEntry, root_path: &Path) -> Result<Option<DocumentFile>> {
        let path = entry.path();

        if !self.extensions.is_supported(path) {
            return Ok(None);
        }

        let metadata = entry
            .metadata()
            .map_err(|e| DocExtractError::Io(e.into()))?;

        let relative_path = calculate_relative_path(path, root_path)?;

        Ok(Some(DocumentFile::new(
            path.to_path_buf(),
            relative_path,
            metadata.len(),
        )))
    }

    pub fn get_statistics(&self, documents: &[DocumentFile]) -> ScanStatistics {
        let mut files_by_extension = BTreeMap::new();
        for doc in documents {
            *files_by_extension.entry(doc.extension.clone()).or_insert(0) += 1;
        }

        ScanStatistics {
            total_files: documents.len(),
            total_size: documents.iter().map(|d| d.size).sum(),
            files_by_extension,
        }
    }
}

pub fn calculate_relative_path(file_path: &Path, root_path: &Path) -> Result<PathBuf> {
    let relative = file_path
        .strip_prefix(root_path)
        .map_err(|_| DocExtractError::InvalidPath {
            path: format!(
                "Cannot calculate relative path for {} from root {}",
                file_path.display(),
                root_path.display()
            ),
        })?;

    if relative
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(DocExtractError::InvalidPath {
            path: format!(
                "Path contains parent directory references: {}",
                relative.display()
            ),
        });
    }

    Ok(relative.to_path_buf())
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub total_size: u64,
    pub files_by_extension: BTreeMap<String, usize>,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Total files: {}\n  Total size: {}\n",
            self.total_files,
            crate::ui::output::format_bytes(self.total_size)
        );

        if !self.files_by_extension.is_empty() {
            summary.push_str("  Files by type:\n");
            let mut extensions: Vec<_> = self.files_by_extension.iter().collect();
            extensions.sort_by(|a, b| b.1.cmp(a.1));

            for (ext, count) in extensions {
                summary.push_str(&format!("    {}: {} files\n", ext, count));
            }
        }

        summary
    }
}
