//! Recording doubles for engine, progress and metadata collaborators.

use crate::engine::{
    Dimension, EngineError, EngineResult, JournalEngine, MetadataResolver, OptionContainer,
};
use crate::journal::progress::{BlockingTaskMonitor, ProgressSink};
use crate::options::{JournalExtractOption, JournalLoadOption, OptionKey, OptionValue};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct RecordingContainer<K: OptionKey> {
    pub values: HashMap<K, OptionValue>,
    pub writes: Vec<(K, OptionValue)>,
    pub reject_writes: bool,
}

impl<K: OptionKey> Default for RecordingContainer<K> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
            writes: Vec::new(),
            reject_writes: false,
        }
    }
}

impl<K: OptionKey> OptionContainer<K> for RecordingContainer<K> {
    fn set_option(&mut self, key: K, value: OptionValue) -> EngineResult<()> {
        if self.reject_writes {
            return Err(EngineError::new("option container is read-only"));
        }
        self.writes.push((key, value.clone()));
        self.values.insert(key, value);
        Ok(())
    }

    fn get_option(&self, key: K) -> EngineResult<OptionValue> {
        self.values
            .get(&key)
            .cloned()
            .ok_or_else(|| EngineError::new(format!("option {} is not set", key.name())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Load { journal: PathBuf, log: PathBuf },
    Extract { journal: PathBuf, log: PathBuf },
}

#[derive(Default)]
pub struct RecordingEngine {
    pub calls: Vec<EngineCall>,
    pub fail_on: Vec<PathBuf>,
    pub load_options: RecordingContainer<JournalLoadOption>,
    pub extract_options: RecordingContainer<JournalExtractOption>,
}

impl RecordingEngine {
    pub fn failing_on<P: Into<PathBuf>>(mut self, journal_file: P) -> Self {
        self.fail_on.push(journal_file.into());
        self
    }

    fn outcome(&self, journal_file: &Path) -> EngineResult<()> {
        if self.fail_on.iter().any(|p| p == journal_file) {
            Err(EngineError::new(format!("rejected {}", journal_file.display())))
        } else {
            Ok(())
        }
    }
}

impl JournalEngine for RecordingEngine {
    fn load(&mut self, journal_file: &Path, log_file: &Path) -> EngineResult<()> {
        self.calls.push(EngineCall::Load {
            journal: journal_file.to_path_buf(),
            log: log_file.to_path_buf(),
        });
        self.outcome(journal_file)
    }

    fn extract(&mut self, journal_file: &Path, log_file: &Path) -> EngineResult<()> {
        self.calls.push(EngineCall::Extract {
            journal: journal_file.to_path_buf(),
            log: log_file.to_path_buf(),
        });
        self.outcome(journal_file)
    }

    fn load_options(&mut self) -> &mut dyn OptionContainer<JournalLoadOption> {
        &mut self.load_options
    }

    fn extract_options(&mut self) -> &mut dyn OptionContainer<JournalExtractOption> {
        &mut self.extract_options
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Init { operation: String, total: usize },
    Started(PathBuf),
    Completed,
    Skipped(PathBuf),
    End,
}

#[derive(Default)]
pub struct RecordingProgress {
    pub events: RefCell<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn count(&self, wanted: &ProgressEvent) -> usize {
        self.events.borrow().iter().filter(|e| *e == wanted).count()
    }

    pub fn started(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Started(_)))
            .count()
    }
}

impl ProgressSink for RecordingProgress {
    fn init_progress(&self, operation: &str, total: usize) {
        self.events.borrow_mut().push(ProgressEvent::Init {
            operation: operation.to_string(),
            total,
        });
    }

    fn end_progress(&self) {
        self.events.borrow_mut().push(ProgressEvent::End);
    }

    fn item_skipped(&self, item: &Path) {
        self.events
            .borrow_mut()
            .push(ProgressEvent::Skipped(item.to_path_buf()));
    }
}

impl BlockingTaskMonitor for RecordingProgress {
    fn monitor_blocking_task(&self, item: &Path) {
        self.events
            .borrow_mut()
            .push(ProgressEvent::Started(item.to_path_buf()));
    }

    fn blocking_task_complete(&self) {
        self.events.borrow_mut().push(ProgressEvent::Completed);
    }
}

pub struct StaticMetadata {
    members: HashMap<(Dimension, String), i32>,
}

impl StaticMetadata {
    pub fn standard() -> Self {
        let members = [
            ((Dimension::Scenario, "Actual"), 1),
            ((Dimension::Scenario, "Budget"), 2),
            ((Dimension::Year, "2024"), 24),
            ((Dimension::Period, "January"), 101),
        ]
        .into_iter()
        .map(|((dimension, label), id)| ((dimension, label.to_string()), id))
        .collect();

        Self { members }
    }
}

impl MetadataResolver for StaticMetadata {
    fn member_id(&self, dimension: Dimension, label: &str) -> Option<i32> {
        self.members.get(&(dimension, label.to_string())).copied()
    }
}
