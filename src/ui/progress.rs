use crate::journal::{BlockingTaskMonitor, ProgressSink};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::time::{Duration, Instant};

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    pub fn create_file_progress(&self, total_files: u64) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_files));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>7}/{len:7} files {msg}"
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        );
        pb.set_message("Processing files...");
        pb
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new_spinner());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        pb.set_message(message.to_string());
        pb
    }

}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Terminal progress for a journal load batch.
///
/// The bar is sized to the number of matched files and ticks while an engine
/// call is in flight.
pub struct BatchProgress<'m> {
    manager: &'m ProgressManager,
    bar: RefCell<Option<ProgressBar>>,
    operation: RefCell<String>,
    start_time: Cell<Option<Instant>>,
}

impl<'m> BatchProgress<'m> {
    pub fn new(manager: &'m ProgressManager) -> Self {
        Self {
            manager,
            bar: RefCell::new(None),
            operation: RefCell::new(String::new()),
            start_time: Cell::new(None),
        }
    }

    fn with_bar<F: FnOnce(&ProgressBar)>(&self, f: F) {
        if let Some(ref pb) = *self.bar.borrow() {
            f(pb);
        }
    }
}

impl ProgressSink for BatchProgress<'_> {
    fn init_progress(&self, operation: &str, total: usize) {
        let pb = self.manager.create_file_progress(total as u64);
        pb.set_message(operation.to_string());
        *self.bar.borrow_mut() = Some(pb);
        *self.operation.borrow_mut() = operation.to_string();
        self.start_time.set(Some(Instant::now()));
    }

    fn end_progress(&self) {
        let bar = self.bar.borrow_mut().take();
        if let Some(pb) = bar {
            let elapsed = self
                .start_time
                .get()
                .map(|start| start.elapsed())
                .unwrap_or_default();
            finish_progress_with_summary(&pb, &self.operation.borrow(), elapsed);
        }
    }

    fn item_skipped(&self, _item: &Path) {
        self.with_bar(|pb| pb.inc(1));
    }
}

impl BlockingTaskMonitor for BatchProgress<'_> {
    fn monitor_blocking_task(&self, item: &Path) {
        let name = item
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| item.display().to_string());
        self.with_bar(|pb| {
            pb.set_message(format!("Loading {}", name));
            pb.enable_steady_tick(Duration::from_millis(100));
        });
    }

    fn blocking_task_complete(&self) {
        self.with_bar(|pb| {
            pb.disable_steady_tick();
            pb.inc(1);
        });
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_duration(duration));
    pb.finish_with_message(final_message);
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}
