pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, ExtractionConfig, OutputConfig};
pub use error::{DocExtractError, Result, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{
    BatchReport, BatchStatus, BatchWalker, ExtractError, ExtractionCapability, ExtractionOutcome,
    ExtractionPipeline, ExtractorRegistry, FileRecord, OutputTarget, OutputWriter,
};
pub use scanner::{
    classify, DocumentFile, DocumentScanner, PathKind, ScanStatistics, SupportedExtensionSet,
};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressManager};

use extractor::{BatchEvent, BatchObserver};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

/// How a run should persist and echo what it extracts.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Output file for a single input, output root for a directory.
    pub output: Option<PathBuf>,
    /// Write `<stem>.txt` beside each source instead.
    pub sibling: bool,
    /// Echo extracted text in single-file mode.
    pub print_text: bool,
}

impl RunOptions {
    fn output_target(&self) -> OutputTarget {
        match (&self.output, self.sibling) {
            (Some(root), _) => OutputTarget::Mirror(root.clone()),
            (None, true) => OutputTarget::Sibling,
            (None, false) => OutputTarget::None,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    Single {
        path: PathBuf,
        outcome: ExtractionOutcome,
        destination: Option<PathBuf>,
    },
    Batch(BatchReport),
}

impl RunOutcome {
    /// Process exit status: 0 on success (an empty directory included),
    /// 1 when anything failed, 130 when interrupted.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Single { outcome, .. } if outcome.is_success() => 0,
            RunOutcome::Single { .. } => 1,
            RunOutcome::Batch(report) if report.cancelled => 130,
            RunOutcome::Batch(report) if report.error_count > 0 => 1,
            RunOutcome::Batch(_) => 0,
        }
    }
}

/// Main library interface for DocExtract functionality
pub struct DocExtract {
    config: Config,
    capability: Arc<dyn ExtractionCapability>,
    extensions: SupportedExtensionSet,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl DocExtract {
    /// Create a new instance backed by the built-in format registry
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        Self::build(config, output_mode, verbose, quiet, GracefulShutdown::new()?)
    }

    /// Create an instance without installing a Ctrl-C handler
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        Self::build(config, output_mode, verbose, quiet, GracefulShutdown::new_for_test())
    }

    fn build(
        config: Config,
        output_mode: OutputMode,
        verbose: u8,
        quiet: bool,
        shutdown: GracefulShutdown,
    ) -> Result<Self> {
        let capability: Arc<dyn ExtractionCapability> = Arc::new(ExtractorRegistry::with_builtin_formats());
        let extensions = SupportedExtensionSet::restricted(
            &capability.supported_extensions(),
            &config.extraction.extensions,
        )?;

        Ok(Self {
            config,
            capability,
            extensions,
            output_formatter: OutputFormatter::new(output_mode, verbose, quiet),
            progress_manager: ProgressManager::new(!quiet && output_mode == OutputMode::Human),
            shutdown,
        })
    }

    /// Create instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbosity_level(), cli_args.quiet)
    }

    /// Swap in a different extraction backend. The configured extensions must
    /// all be supported by it.
    pub fn with_capability(mut self, capability: Arc<dyn ExtractionCapability>) -> Result<Self> {
        self.extensions = SupportedExtensionSet::restricted(
            &capability.supported_extensions(),
            &self.config.extraction.extensions,
        )?;
        self.capability = capability;
        Ok(self)
    }

    pub fn pipeline(&self) -> ExtractionPipeline {
        ExtractionPipeline::new(
            self.capability.clone(),
            self.extensions.clone(),
            OutputWriter::new(self.config.output.atomic_writes),
        )
    }

    pub fn walker(&self) -> BatchWalker {
        BatchWalker::new(self.pipeline())
            .with_follow_links(self.config.extraction.follow_links)
            .with_jobs(self.config.effective_jobs())
            .with_shutdown(self.shutdown.clone())
    }

    /// Extract a file or a directory tree. Only an unusable input path is an
    /// error; per-file failures are part of the returned outcome.
    pub fn run(&self, input: &Path, options: &RunOptions) -> Result<RunOutcome> {
        match scanner::path_classifier::require_processable(input)? {
            PathKind::Directory => self.run_directory(input, options),
            _ => Ok(self.run_file(input, options)),
        }
    }

    fn run_file(&self, input: &Path, options: &RunOptions) -> RunOutcome {
        let destination = match (&options.output, options.sibling) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(input.with_extension("txt")),
            (None, false) => None,
        };

        self.output_formatter
            .debug(&format!("Extracting {}", input.display()));
        let outcome = self.pipeline().run(input, destination.as_deref());

        self.output_formatter.print_single_outcome(
            input,
            &outcome,
            destination.as_deref(),
            options.print_text,
        );

        RunOutcome::Single {
            path: input.to_path_buf(),
            outcome,
            destination,
        }
    }

    fn run_directory(&self, root: &Path, options: &RunOptions) -> Result<RunOutcome> {
        let start_time = Instant::now();
        self.output_formatter
            .start_operation(&format!("Extracting documents under {}", root.display()));

        let file_progress = self.progress_manager.create_file_progress(0);
        let skipped = Mutex::new(Vec::new());
        let report = {
            let observer: BatchObserver<'_> = &|event| {
                ui::progress::update_batch_progress(&file_progress, event);
                if let BatchEvent::Skipped { reason } = event {
                    if let Ok(mut skipped) = skipped.lock() {
                        skipped.push(reason.to_string());
                    }
                }
            };
            self.walker()
                .run(root, &options.output_target(), Some(observer))?
        };

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Extracted {} of {} files", report.processed_count, report.total()),
            start_time.elapsed(),
        );
        self.progress_manager.clear();

        for reason in skipped.into_inner().unwrap_or_default() {
            self.output_formatter.warning(&reason);
        }

        self.output_formatter
            .print_batch_report(&report, start_time.elapsed());

        Ok(RunOutcome::Batch(report))
    }

    /// Files a run over `input` would extract, in processing order.
    pub fn plan(&self, input: &Path) -> Result<Vec<DocumentFile>> {
        match scanner::path_classifier::require_processable(input)? {
            PathKind::Directory => Ok(self.walker().scan(input)?.documents),
            _ if self.extensions.is_supported(input) => {
                let size = std::fs::metadata(input)?.len();
                let name = input.file_name().map(PathBuf::from).unwrap_or_default();
                Ok(vec![DocumentFile::new(input.to_path_buf(), name, size)])
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Totals by type for a planned set of files.
    pub fn plan_statistics(&self, files: &[DocumentFile]) -> ScanStatistics {
        DocumentScanner::new(&self.extensions).get_statistics(files)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn extensions(&self) -> &SupportedExtensionSet {
        &self.extensions
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Check if shutdown has been requested
    pub fn is_running(&self) -> bool {
        self.shutdown.is_running()
    }

    /// Request graceful shutdown
    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &DocExtractError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::pipeline::test_support::{Script, ScriptedCapability};
    use std::fs;
    use tempfile::TempDir;

    fn scripted_config() -> Config {
        let mut config = Config::default();
        config.extraction.extensions = vec!["pdf".into(), "docx".into(), "xlsx".into()];
        config
    }

    fn scripted(capability: ScriptedCapability) -> DocExtract {
        DocExtract::new_for_test(scripted_config(), OutputMode::Plain, 0, true)
            .unwrap()
            .with_capability(Arc::new(capability))
            .unwrap()
    }

    #[test]
    fn test_default_instance() {
        let docextract = DocExtract::new_for_test(Config::default(), OutputMode::Human, 0, true).unwrap();
        assert!(docextract.is_running());
        assert_eq!(docextract.extensions().len(), 8);
    }

    #[test]
    fn test_unknown_configured_extension() {
        let mut config = Config::default();
        config.extraction.extensions = vec!["pdf".into(), "pages".into()];

        let result = DocExtract::new_for_test(config, OutputMode::Plain, 0, true);
        assert!(matches!(result, Err(DocExtractError::Config { .. })));
    }

    #[test]
    fn test_mixed_directory_outcome() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["a.pdf", "b.txt", "c.xlsx"] {
            fs::write(temp_dir.path().join(name), "stub").unwrap();
        }

        let docextract = scripted(ScriptedCapability::new(vec![
            ("a.pdf", Script::Text("Hello world")),
            ("c.xlsx", Script::Fail("bad zip")),
        ]));
        let outcome = docextract
            .run(temp_dir.path(), &RunOptions::default())
            .unwrap();

        match &outcome {
            RunOutcome::Batch(report) => {
                assert_eq!(report.processed_count, 1);
                assert_eq!(report.error_count, 1);
                assert_eq!(report.file_records[0].character_count, 11);
                assert_eq!(report.file_records[0].word_count, 2);
                assert_eq!(
                    report.file_records[1].error_message.as_deref(),
                    Some("Malformed XLSX document: bad zip")
                );
            }
            other => panic!("Expected batch outcome, got {:?}", other),
        }
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn test_single_file_to_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("report.docx");
        fs::write(&input, "stub").unwrap();
        let output = temp_dir.path().join("out").join("report.txt");

        let docextract = scripted(ScriptedCapability::new(vec![(
            "report.docx",
            Script::Text("Q1 results"),
        )]));
        let options = RunOptions {
            output: Some(output.clone()),
            ..RunOptions::default()
        };
        let outcome = docextract.run(&input, &options).unwrap();

        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(fs::read_to_string(&output).unwrap(), "Q1 results");
    }

    #[test]
    fn test_single_unsupported_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("notes.txt");
        fs::write(&input, "plain").unwrap();

        let docextract = scripted(ScriptedCapability::new(vec![]));
        let outcome = docextract.run(&input, &RunOptions::default()).unwrap();
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let docextract = scripted(ScriptedCapability::new(vec![]));

        let result = docextract.run(&temp_dir.path().join("nope"), &RunOptions::default());
        assert!(matches!(result, Err(DocExtractError::InvalidPath { .. })));
    }

    #[test]
    fn test_empty_directory_exits_zero() {
        let temp_dir = TempDir::new().unwrap();
        let docextract = scripted(ScriptedCapability::new(vec![]));

        let outcome = docextract.run(temp_dir.path(), &RunOptions::default()).unwrap();
        match &outcome {
            RunOutcome::Batch(report) => assert_eq!(report.status(), BatchStatus::NothingFound),
            other => panic!("Expected batch outcome, got {:?}", other),
        }
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn test_cancelled_run_exit_code() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.pdf"), "stub").unwrap();

        let docextract = scripted(ScriptedCapability::new(vec![]));
        docextract.request_shutdown();

        let outcome = docextract.run(temp_dir.path(), &RunOptions::default()).unwrap();
        assert_eq!(outcome.exit_code(), 130);
    }

    #[test]
    fn test_plan_lists_supported_files() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.pdf", "a.docx", "skip.txt"] {
            fs::write(temp_dir.path().join(name), "stub").unwrap();
        }

        let docextract = scripted(ScriptedCapability::new(vec![]));
        let plan = docextract.plan(temp_dir.path()).unwrap();
        let paths: Vec<_> = plan.iter().map(|doc| doc.source_path.clone()).collect();
        assert_eq!(
            paths,
            vec![temp_dir.path().join("a.docx"), temp_dir.path().join("b.pdf")]
        );

        let stats = docextract.plan_statistics(&plan);
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_size, 8);

        let single = docextract.plan(&temp_dir.path().join("skip.txt")).unwrap();
        assert!(single.is_empty());
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        DocExtract::generate_sample_config(&config_path).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[extraction]"));
        assert!(content.contains("[output]"));
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());
    }
}
