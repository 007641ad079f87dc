pub mod document_scanner;
pub mod file_filter;
pub mod path_classifier;

pub use document_scanner::{DocumentFile, DocumentScanner, ScanResult, ScanStatistics};
pub use file_filter::SupportedExtensionSet;
pub use path_classifier::{classify, PathKind};
