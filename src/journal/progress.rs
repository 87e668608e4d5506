use std::path::Path;

/// Receives the begin/end bracket of a batch operation.
pub trait ProgressSink {
    fn init_progress(&self, operation: &str, total: usize);
    fn end_progress(&self);

    /// An item was counted in the total but never reached the engine.
    fn item_skipped(&self, _item: &Path) {}
}

/// Told when a long-running engine call starts and finishes.
pub trait BlockingTaskMonitor {
    fn monitor_blocking_task(&self, item: &Path);
    fn blocking_task_complete(&self);
}

/// Ends progress when dropped, so the indicator closes exactly once on every
/// exit path.
pub(crate) struct ProgressGuard<'p> {
    sink: &'p dyn ProgressSink,
}

impl<'p> ProgressGuard<'p> {
    pub(crate) fn init(sink: &'p dyn ProgressSink, operation: &str, total: usize) -> Self {
        sink.init_progress(operation, total);
        Self { sink }
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        self.sink.end_progress();
    }
}
