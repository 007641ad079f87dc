//! The extraction capability: one `extract(path)` call per file.
//!
//! `ExtractorRegistry` is the production implementation. It maps a closed set
//! of suffixes onto [`FormatExtractor`] adapters, each of which turns an
//! in-memory document into plain text.

use crate::extractor::formats::{
    ArchiveExtractor, DocxExtractor, HwpExtractor, HwpxExtractor, PdfExtractor,
    SpreadsheetExtractor,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Nested archives deeper than this are refused.
pub const MAX_ARCHIVE_DEPTH: usize = 3;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Malformed {format} document: {message}")]
    Malformed {
        format: &'static str,
        message: String,
    },

    #[error("{0} document is encrypted or password protected")]
    Encrypted(&'static str),

    #[error("corrupt archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Archive nesting exceeds {0} levels")]
    TooDeep(usize),
}

impl ExtractError {
    pub fn malformed(format: &'static str, message: impl ToString) -> Self {
        ExtractError::Malformed {
            format,
            message: message.to_string(),
        }
    }
}

/// The contract the orchestrator depends on. Implementations must be safe to
/// call concurrently with distinct paths.
pub trait ExtractionCapability: Send + Sync {
    /// Lowercase suffixes, without the dot, that `extract` accepts.
    fn supported_extensions(&self) -> Vec<String>;

    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// A single container format.
pub trait FormatExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn extensions(&self) -> &'static [&'static str];

    fn extract_bytes(&self, bytes: &[u8], ctx: &ExtractContext<'_>) -> Result<String, ExtractError>;
}

/// Passed to adapters so container formats can dispatch their members.
pub struct ExtractContext<'a> {
    registry: &'a ExtractorRegistry,
    depth: usize,
}

impl<'a> ExtractContext<'a> {
    /// Whether a member named `name` can be dispatched back into the registry.
    pub fn can_extract(&self, name: &str) -> bool {
        extension_of(name).is_some_and(|ext| self.registry.get(&ext).is_some())
    }

    /// Extract a nested document one level deeper.
    pub fn extract_member(&self, name: &str, bytes: &[u8]) -> Result<String, ExtractError> {
        if self.depth >= MAX_ARCHIVE_DEPTH {
            return Err(ExtractError::TooDeep(MAX_ARCHIVE_DEPTH));
        }

        let extension =
            extension_of(name).ok_or_else(|| ExtractError::UnsupportedType(name.to_string()))?;
        let extractor = self
            .registry
            .get(&extension)
            .ok_or_else(|| ExtractError::UnsupportedType(format!(".{}", extension)))?;

        let nested = ExtractContext {
            registry: self.registry,
            depth: self.depth + 1,
        };
        extractor.extract_bytes(bytes, &nested)
    }
}

pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn FormatExtractor>>,
    by_extension: BTreeMap<String, usize>,
}

impl ExtractorRegistry {
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
            by_extension: BTreeMap::new(),
        }
    }

    /// Registry with every built-in format.
    pub fn with_builtin_formats() -> Self {
        let mut registry = Self::new();
        registry.register(PdfExtractor::new());
        registry.register(DocxExtractor::new());
        registry.register(HwpxExtractor::new());
        registry.register(HwpExtractor::new());
        registry.register(SpreadsheetExtractor::new());
        registry.register(ArchiveExtractor::new());
        registry
    }

    /// Later registrations win for a shared suffix.
    pub fn register<E: FormatExtractor + 'static>(&mut self, extractor: E) {
        let index = self.extractors.len();
        for ext in extractor.extensions() {
            self.by_extension.insert(ext.to_lowercase(), index);
        }
        self.extractors.push(Arc::new(extractor));
    }

    pub fn get(&self, extension: &str) -> Option<Arc<dyn FormatExtractor>> {
        self.by_extension
            .get(&extension.trim_start_matches('.').to_lowercase())
            .and_then(|index| self.extractors.get(*index))
            .cloned()
    }

    pub fn extract_bytes(&self, extension: &str, bytes: &[u8]) -> Result<String, ExtractError> {
        let extractor = self
            .get(extension)
            .ok_or_else(|| ExtractError::UnsupportedType(format!(".{}", extension)))?;

        let ctx = ExtractContext {
            registry: self,
            depth: 0,
        };
        extractor.extract_bytes(bytes, &ctx)
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::with_builtin_formats()
    }
}

impl ExtractionCapability for ExtractorRegistry {
    fn supported_extensions(&self) -> Vec<String> {
        self.by_extension.keys().cloned().collect()
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .ok_or_else(|| ExtractError::UnsupportedType(path.display().to_string()))?;

        // Unknown suffixes fail before the file is read
        let extractor = self
            .get(&extension)
            .ok_or_else(|| ExtractError::UnsupportedType(format!(".{}", extension)))?;

        tracing::debug!("Extracting {} with {}", path.display(), extractor.name());
        let bytes = std::fs::read(path)?;

        let ctx = ExtractContext {
            registry: self,
            depth: 0,
        };
        extractor.extract_bytes(&bytes, &ctx)
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}
