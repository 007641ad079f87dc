use crate::error::DocExtractError;
use crate::extractor::{ExtractionCapability, ExtractionOutcome, OutputWriter};
use crate::scanner::SupportedExtensionSet;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs one file through the capability and optionally persists the text.
///
/// Every failure, including a panic inside a format parser, ends up in the
/// returned outcome; `run` itself never fails.
#[derive(Clone)]
pub struct ExtractionPipeline {
    capability: Arc<dyn ExtractionCapability>,
    extensions: SupportedExtensionSet,
    writer: OutputWriter,
}

impl ExtractionPipeline {
    pub fn new(
        capability: Arc<dyn ExtractionCapability>,
        extensions: SupportedExtensionSet,
        writer: OutputWriter,
    ) -> Self {
        Self {
            capability,
            extensions,
            writer,
        }
    }

    pub fn extensions(&self) -> &SupportedExtensionSet {
        &self.extensions
    }

    pub fn run(&self, path: &Path, destination: Option<&Path>) -> ExtractionOutcome {
        if !self.extensions.is_supported(path) {
            let error = DocExtractError::UnsupportedFormat {
                path: path.display().to_string(),
            };
            return ExtractionOutcome::failed(error.to_string());
        }

        let result = panic::catch_unwind(AssertUnwindSafe(|| self.capability.extract(path)));

        let text = match result {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                debug!("Extraction failed for {}: {}", path.display(), e);
                return ExtractionOutcome::failed(e.to_string());
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("Extractor panicked on {}: {}", path.display(), message);
                return ExtractionOutcome::failed(format!("extractor panicked: {}", message));
            }
        };

        if let Some(destination) = destination {
            if let Err(e) = self.writer.write_text(destination, &text) {
                return ExtractionOutcome::failed(e.to_string());
            }
            debug!("Wrote {}", destination.display());
        }

        ExtractionOutcome::extracted(text)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
