use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocExtractError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input path does not exist: {path}")]
    InvalidPath { path: String },

    #[error("Input path is neither a file nor a directory: {path}")]
    NotFileOrDirectory { path: String },

    #[error("Unsupported file type: {path}")]
    UnsupportedFormat { path: String },

    #[error("Failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation was cancelled by user")]
    Cancelled,
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for DocExtractError {
    fn user_message(&self) -> String {
        match self {
            DocExtractError::InvalidPath { path } => {
                format!("Input path does not exist: {}", path)
            }
            DocExtractError::NotFileOrDirectory { path } => {
                format!("Invalid input path: {}", path)
            }
            DocExtractError::UnsupportedFormat { path } => {
                format!("Unsupported file type: {}", path)
            }
            DocExtractError::OutputWrite { path, source } => {
                format!("Could not write {}: {}", path.display(), source)
            }
            DocExtractError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            DocExtractError::Cancelled => "Operation was cancelled by user".to_string(),
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            DocExtractError::InvalidPath { .. } => Some(
                "Check the spelling of the path and that you have permission to read it.".to_string(),
            ),
            DocExtractError::NotFileOrDirectory { .. } => Some(
                "Pass a regular file or a directory; devices, sockets and pipes are not supported.".to_string(),
            ),
            DocExtractError::UnsupportedFormat { .. } => Some(
                "Supported formats are pdf, hwp, hwpx, docx, xlsx, xlsm, xls and zip.".to_string(),
            ),
            DocExtractError::OutputWrite { .. } => Some(
                "Ensure the output location is writable and the disk has free space.".to_string(),
            ),
            DocExtractError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for DocExtractError {
    fn from(error: toml::de::Error) -> Self {
        DocExtractError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DocExtractError>;
