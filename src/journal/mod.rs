pub mod extract;
pub mod load;
pub mod progress;
pub mod request;

pub use extract::ExtractReport;
pub use load::{BatchOutcome, FailurePolicy, LoadReport};
pub use progress::{BlockingTaskMonitor, ProgressSink};
pub use request::{
    BatchItem, ExtractRequest, JournalOperationRequest, LoadRequest, OperationKind,
    ResolvedSelection,
};

use crate::engine::JournalEngine;
use crate::fsutil::{FileResolver, GlobResolver};
use crate::options::{ExtractOptions, LoadOptions, OptionSet};

/// Journal operations against a borrowed engine session.
///
/// The session is never opened, closed or re-bound here.
pub struct JournalSession<'e, E: JournalEngine + ?Sized> {
    engine: &'e mut E,
    resolver: Box<dyn FileResolver + 'e>,
}

impl<'e, E: JournalEngine + ?Sized> JournalSession<'e, E> {
    pub fn new(engine: &'e mut E) -> Self {
        Self {
            engine,
            resolver: Box::new(GlobResolver),
        }
    }

    pub fn with_resolver<R: FileResolver + 'e>(mut self, resolver: R) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Options read by the engine on the next load.
    pub fn load_options(&mut self) -> LoadOptions<'_> {
        OptionSet::bind(self.engine.load_options())
    }

    /// Options read by the engine on the next extract.
    pub fn extract_options(&mut self) -> ExtractOptions<'_> {
        OptionSet::bind(self.engine.extract_options())
    }
}
