use crate::engine::{try_operation, JournalEngine};
use crate::error::Result;
use crate::fsutil;
use crate::journal::load::FailurePolicy;
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const LOAD_TAG: &str = "Loading data";
pub const EXTRACT_TAG: &str = "Extracting journals";

/// Parameters of a batch journal load.
#[derive(Debug, Clone, Default)]
pub struct LoadRequest {
    /// Path to the journal file(s); wildcards are allowed in the file name.
    pub journal_files: String,
    /// Directory for generated log files; beside each source when `None`.
    pub log_dir: Option<PathBuf>,
    pub policy: FailurePolicy,
}

impl LoadRequest {
    pub fn new<S: Into<String>>(journal_files: S) -> Self {
        Self {
            journal_files: journal_files.into(),
            ..Self::default()
        }
    }

    pub fn with_log_dir(mut self, log_dir: Option<PathBuf>) -> Self {
        self.log_dir = log_dir;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Parameters of a single journal extract.
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub journal_file: PathBuf,
    /// Defaults to the journal file with a `.log` extension.
    pub log_file: Option<PathBuf>,
    pub scenario: String,
    pub year: String,
    pub period: String,
}

impl ExtractRequest {
    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .filter(|path| !path.as_os_str().is_empty())
            .unwrap_or_else(|| fsutil::default_log_path(&self.journal_file))
    }
}

/// One resolved journal file of a load batch and its log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchItem {
    pub source: PathBuf,
    pub log_file: PathBuf,
}

impl BatchItem {
    pub fn new(source: PathBuf, log_dir: Option<&Path>) -> Self {
        let log_file = fsutil::log_path_for(&source, log_dir);
        Self { source, log_file }
    }

    pub fn display_name(&self) -> String {
        self.source
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Load,
    Extract,
}

/// Member identifiers an extract was filtered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedSelection {
    pub scenario: i32,
    pub year: i32,
    pub period: i32,
}

/// A single engine call, fixed just before it is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalOperationRequest {
    pub kind: OperationKind,
    pub journal_file: PathBuf,
    pub log_file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selection: Option<ResolvedSelection>,
}

impl JournalOperationRequest {
    pub fn load(item: &BatchItem) -> Self {
        Self {
            kind: OperationKind::Load,
            journal_file: item.source.clone(),
            log_file: item.log_file.clone(),
            selection: None,
        }
    }

    pub fn extract(journal_file: PathBuf, log_file: PathBuf, selection: ResolvedSelection) -> Self {
        Self {
            kind: OperationKind::Extract,
            journal_file,
            log_file,
            selection: Some(selection),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self.kind {
            OperationKind::Load => LOAD_TAG,
            OperationKind::Extract => EXTRACT_TAG,
        }
    }

    pub fn execute<E: JournalEngine + ?Sized>(&self, engine: &mut E) -> Result<()> {
        try_operation(self.tag(), || match self.kind {
            OperationKind::Load => engine.load(&self.journal_file, &self.log_file),
            OperationKind::Extract => engine.extract(&self.journal_file, &self.log_file),
        })
    }
}
