use crate::error::{DocExtractError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Suffixes to extract, a subset of what the extractor registry knows
    pub extensions: Vec<String>,
    pub follow_links: bool,
    /// Worker threads for directory runs; 0 means one per CPU
    pub jobs: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub atomic_writes: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            extensions: vec![
                "pdf".to_string(),
                "hwp".to_string(),
                "hwpx".to_string(),
                "xlsx".to_string(),
                "xls".to_string(),
                "xlsm".to_string(),
                "docx".to_string(),
                "zip".to_string(),
            ],
            follow_links: false,
            jobs: 1,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            atomic_writes: true,
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DocExtractError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| DocExtractError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| DocExtractError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["docextract.toml", ".docextract.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref formats) = cli_args.formats {
            self.extraction.extensions = formats
                .split(',')
                .map(|s| s.trim().trim_start_matches('.').to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Some(jobs) = cli_args.jobs {
            self.extraction.jobs = jobs;
        }

        if let Some(follow_links) = cli_args.follow_links {
            self.extraction.follow_links = follow_links;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.extraction.extensions.is_empty() {
            return Err(DocExtractError::Config {
                message: "At least one file extension must be specified".to_string(),
            });
        }

        if let Some(bad) = self
            .extraction
            .extensions
            .iter()
            .find(|ext| ext.contains(|c: char| c == '.' || c == '/' || c == '\\'))
        {
            return Err(DocExtractError::Config {
                message: format!("Invalid file extension: {}", bad),
            });
        }

        Ok(())
    }

    /// Resolved worker count, never zero
    pub fn effective_jobs(&self) -> usize {
        match self.extraction.jobs {
            0 => num_cpus::get().max(1),
            n => n,
        }
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub formats: Option<String>,
    pub jobs: Option<usize>,
    pub follow_links: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formats(mut self, formats: Option<String>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_follow_links(mut self, follow_links: Option<bool>) -> Self {
        self.follow_links = follow_links;
        self
    }
}
