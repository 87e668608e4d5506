use crate::engine::JournalEngine;
use crate::error::{JournalError, Result};
use crate::fsutil;
use crate::journal::progress::{BlockingTaskMonitor, ProgressGuard, ProgressSink};
use crate::journal::request::{BatchItem, JournalOperationRequest, LoadRequest};
use crate::journal::JournalSession;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const LOAD_PROGRESS_LABEL: &str = "Journal Load";

/// What a load batch does after a file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and carry on with the next file.
    #[default]
    Continue,
    /// Stop the batch at the first failed file.
    Abort,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub item: BatchItem,
    pub error: Option<JournalError>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug)]
pub struct LoadReport {
    /// Outcomes in processing order; shorter than `total_files` when aborted.
    pub outcomes: Vec<BatchOutcome>,
    pub total_files: usize,
    pub aborted: bool,
    pub elapsed: Duration,
}

impl LoadReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn skipped(&self) -> usize {
        self.total_files - self.outcomes.len()
    }

    pub fn is_success(&self) -> bool {
        !self.aborted && self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&BatchItem, &JournalError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error.as_ref().map(|error| (&o.item, error)))
    }
}

impl<'e, E: JournalEngine + ?Sized> JournalSession<'e, E> {
    /// Loads every journal file matched by `request.journal_files`.
    ///
    /// Each file is checked and loaded independently; failures are recorded
    /// in the report and handled according to `request.policy`. Progress is
    /// initialised with the number of matched files and ended exactly once.
    pub fn load_journals(
        &mut self,
        request: &LoadRequest,
        progress: &dyn ProgressSink,
        monitor: &dyn BlockingTaskMonitor,
    ) -> Result<LoadReport> {
        let start_time = Instant::now();
        let paths = self.resolver.resolve(&request.journal_files)?;
        info!("Found {} journal files to process", paths.len());

        let total_files = paths.len();
        let mut outcomes = Vec::with_capacity(total_files);
        let mut aborted = false;

        let _progress = ProgressGuard::init(progress, LOAD_PROGRESS_LABEL, total_files);
        for path in paths {
            let item = BatchItem::new(path, request.log_dir.as_deref());
            let error = self.load_item(&item, monitor).err();

            match error {
                Some(ref e) if e.is_precondition() => {
                    progress.item_skipped(&item.source);
                    warn!(file = %item.source.display(), error = %e, "Journal file skipped");
                }
                Some(ref e) => {
                    warn!(file = %item.source.display(), error = %e, "Journal load failed");
                }
                None => {}
            }

            let failed = error.is_some();
            outcomes.push(BatchOutcome { item, error });

            if failed && request.policy == FailurePolicy::Abort {
                warn!("Aborting journal load after first failure");
                aborted = true;
                break;
            }
        }

        Ok(LoadReport {
            outcomes,
            total_files,
            aborted,
            elapsed: start_time.elapsed(),
        })
    }

    fn load_item(&mut self, item: &BatchItem, monitor: &dyn BlockingTaskMonitor) -> Result<()> {
        fsutil::ensure_file_exists(&item.source)?;
        fsutil::ensure_file_writable(&item.log_file)?;

        info!("Loading journals from {}", item.source.display());
        let operation = JournalOperationRequest::load(item);

        monitor.monitor_blocking_task(&item.source);
        let result = operation.execute(&mut *self.engine);
        monitor.blocking_task_complete();
        result
    }
}
