use crate::error::{DocExtractError, Result};
use std::collections::BTreeSet;
use std::path::Path;

/// Case-insensitive set of file suffixes eligible for extraction, stored
/// lowercase without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedExtensionSet {
    extensions: BTreeSet<String>,
}

impl SupportedExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| normalize(ext.as_ref()))
            .filter(|ext| !ext.is_empty())
            .collect();

        Self { extensions }
    }

    /// Narrow the capability's suffixes to the configured ones. Asking for a
    /// suffix the capability does not know is a configuration error.
    pub fn restricted(known: &[String], requested: &[String]) -> Result<Self> {
        let known = Self::new(known);
        let requested = Self::new(requested);

        let unknown: Vec<&str> = requested
            .extensions
            .iter()
            .filter(|ext| !known.extensions.contains(*ext))
            .map(String::as_str)
            .collect();

        if !unknown.is_empty() {
            return Err(DocExtractError::Config {
                message: format!(
                    "Unsupported extensions requested: {} (known: {})",
                    unknown.join(", "),
                    known.to_vec().join(", ")
                ),
            });
        }

        Ok(requested)
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(&normalize(extension))
    }

    /// Whether the final suffix of `path` is in the set.
    pub fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.contains(ext))
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.extensions.iter().cloned().collect()
    }
}

fn normalize(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}
