pub mod batch;
pub mod capability;
pub mod formats;
pub mod outcome;
pub mod output_writer;
pub mod pipeline;
pub mod report;

pub use batch::{BatchEvent, BatchObserver, BatchWalker, OutputTarget};
pub use capability::{
    ExtractContext, ExtractError, ExtractionCapability, ExtractorRegistry, FormatExtractor,
};
pub use outcome::ExtractionOutcome;
pub use output_writer::OutputWriter;
pub use pipeline::ExtractionPipeline;
pub use report::{BatchReport, BatchReportBuilder, BatchStatus, FileRecord};
