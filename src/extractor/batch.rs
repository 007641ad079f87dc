use crate::error::Result;
use crate::extractor::report::{BatchReport, BatchReportBuilder};
use crate::extractor::{ExtractionOutcome, ExtractionPipeline};
use crate::scanner::{DocumentFile, DocumentScanner, ScanResult};
use crate::ui::GracefulShutdown;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where a batch run writes extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputTarget {
    /// Counts only, nothing is written.
    #[default]
    None,
    /// Mirror the input tree under this root, `.txt` replacing each suffix.
    Mirror(PathBuf),
    /// `<stem>.txt` next to every source file.
    Sibling,
}

impl OutputTarget {
    pub fn destination_for(&self, document: &DocumentFile) -> Option<PathBuf> {
        match self {
            OutputTarget::None => None,
            OutputTarget::Mirror(root) => Some(root.join(document.relative_path.with_extension("txt"))),
            OutputTarget::Sibling => Some(document.source_path.with_extension("txt")),
        }
    }

    /// Pairs of sources whose text would land on the same file, such as
    /// `x.pdf` and `x.docx`. Only one of the two texts survives.
    pub fn shared_destinations<'a>(
        &self,
        documents: &'a [DocumentFile],
    ) -> Vec<(&'a DocumentFile, &'a DocumentFile, PathBuf)> {
        let mut seen: HashMap<PathBuf, &DocumentFile> = HashMap::new();
        let mut shared = Vec::new();

        for document in documents {
            let Some(destination) = self.destination_for(document) else {
                continue;
            };
            match seen.get(&destination) {
                Some(first) => shared.push((*first, document, destination)),
                None => {
                    seen.insert(destination, document);
                }
            }
        }

        shared
    }
}

/// Progress notifications emitted while a batch runs.
#[derive(Debug)]
pub enum BatchEvent<'a> {
    Scanned { total: usize },
    Skipped { reason: &'a str },
    FileDone {
        completed: usize,
        total: usize,
        document: &'a DocumentFile,
        outcome: &'a ExtractionOutcome,
    },
}

pub type BatchObserver<'a> = &'a (dyn Fn(&BatchEvent<'_>) + Sync);

/// Walks a directory and runs every supported file through the pipeline.
pub struct BatchWalker {
    pipeline: ExtractionPipeline,
    follow_links: bool,
    jobs: usize,
    shutdown: Option<GracefulShutdown>,
}

impl BatchWalker {
    pub fn new(pipeline: ExtractionPipeline) -> Self {
        Self {
            pipeline,
            follow_links: false,
            jobs: 1,
            shutdown: None,
        }
    }

    pub fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Worker count. Values above one only take effect with the `parallel`
    /// feature.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_shutdown(mut self, shutdown: GracefulShutdown) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    /// Enumerate the files a run would process, without extracting anything.
    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        DocumentScanner::new(self.pipeline.extensions())
            .with_follow_links(self.follow_links)
            .scan_directory(root)
    }

    pub fn run(
        &self,
        root: &Path,
        output: &OutputTarget,
        observer: Option<BatchObserver<'_>>,
    ) -> Result<BatchReport> {
        let scan = self.scan(root)?;

        for reason in &scan.skipped {
            warn!("{}", reason);
            emit(observer, BatchEvent::Skipped { reason });
        }

        let mut builder = BatchReportBuilder::new(root);
        if scan.is_empty() {
            warn!("No supported files under {}", root.display());
            return Ok(builder.finish());
        }

        emit(
            observer,
            BatchEvent::Scanned {
                total: scan.documents.len(),
            },
        );
        for (first, second, destination) in output.shared_destinations(&scan.documents) {
            warn!(
                "{} and {} both write {}; the text of {} will be overwritten",
                first.display_path(),
                second.display_path(),
                destination.display(),
                first.display_path()
            );
        }
        debug!("Processing {} files with {} job(s)", scan.documents.len(), self.jobs);

        #[cfg(feature = "parallel")]
        {
            if self.jobs > 1 {
                self.run_parallel(&scan.documents, output, observer, &mut builder)?;
                return Ok(builder.finish());
            }
        }

        self.run_sequential(&scan.documents, output, observer, &mut builder);
        Ok(builder.finish())
    }

    fn run_sequential(
        &self,
        documents: &[DocumentFile],
        output: &OutputTarget,
        observer: Option<BatchObserver<'_>>,
        builder: &mut BatchReportBuilder,
    ) {
        let total = documents.len();

        for document in documents {
            if let Err(e) = self.check_shutdown() {
                warn!("{} after {} of {} files", e, builder.len(), total);
                builder.mark_cancelled();
                break;
            }

            let destination = output.destination_for(document);
            let outcome = self.pipeline.run(&document.source_path, destination.as_deref());

            emit(
                observer,
                BatchEvent::FileDone {
                    completed: builder.len() + 1,
                    total,
                    document,
                    outcome: &outcome,
                },
            );
            builder.record(&document.source_path, &outcome, destination);
        }
    }

    /// Extract on a rayon pool, then record in walk order.
    #[cfg(feature = "parallel")]
    fn run_parallel(
        &self,
        documents: &[DocumentFile],
        output: &OutputTarget,
        observer: Option<BatchObserver<'_>>,
        builder: &mut BatchReportBuilder,
    ) -> Result<()> {
        use crate::error::DocExtractError;
        use rayon::prelude::*;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| DocExtractError::Config {
                message: format!("Failed to start {} worker threads: {}", self.jobs, e),
            })?;

        let total = documents.len();
        let completed = AtomicUsize::new(0);

        let mut results: Vec<(usize, Option<PathBuf>, ExtractionOutcome)> = pool.install(|| {
            documents
                .par_iter()
                .enumerate()
                .filter_map(|(index, document)| {
                    if self.check_shutdown().is_err() {
                        return None;
                    }

                    let destination = output.destination_for(document);
                    let outcome = self.pipeline.run(&document.source_path, destination.as_deref());

                    emit(
                        observer,
                        BatchEvent::FileDone {
                            completed: completed.fetch_add(1, Ordering::SeqCst) + 1,
                            total,
                            document,
                            outcome: &outcome,
                        },
                    );
                    Some((index, destination, outcome))
                })
                .collect()
        });

        results.sort_by_key(|(index, _, _)| *index);
        if results.len() < total {
            warn!(
                "{} after {} of {} files",
                DocExtractError::Cancelled,
                results.len(),
                total
            );
            builder.mark_cancelled();
        }

        for (index, destination, outcome) in results {
            builder.record(&documents[index].source_path, &outcome, destination);
        }

        Ok(())
    }

    fn check_shutdown(&self) -> Result<()> {
        match &self.shutdown {
            Some(shutdown) => shutdown.check_shutdown(),
            None => Ok(()),
        }
    }
}

fn emit(observer: Option<BatchObserver<'_>>, event: BatchEvent<'_>) {
    if let Some(observer) = observer {
        observer(&event);
    }
}
