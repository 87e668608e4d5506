//! Interface to the consolidation engine that actually loads and extracts
//! journals.
//!
//! Everything the batch runner needs from a live session goes through
//! [`JournalEngine`], [`OptionContainer`] and [`MetadataResolver`], so any
//! binding (in-process, RPC, the bundled [`offline::OfflineEngine`]) can be
//! plugged in.

pub mod offline;

#[cfg(test)]
pub(crate) mod testing;

use crate::error::{JournalError, Result};
use crate::options::{JournalExtractOption, JournalLoadOption, OptionKey, OptionValue};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

pub use offline::OfflineEngine;

/// A failure reported by the engine itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EngineError {
    pub message: String,
    pub code: Option<i32>,
}

impl EngineError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = Some(code);
        self
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Enumeration-indexed option storage owned by the engine.
pub trait OptionContainer<K: OptionKey> {
    fn set_option(&mut self, key: K, value: OptionValue) -> EngineResult<()>;
    fn get_option(&self, key: K) -> EngineResult<OptionValue>;
}

/// Journal load/extract primitives of a bound engine session.
///
/// The engine reads its option containers itself; they are not passed per
/// call.
pub trait JournalEngine {
    fn load(&mut self, journal_file: &Path, log_file: &Path) -> EngineResult<()>;
    fn extract(&mut self, journal_file: &Path, log_file: &Path) -> EngineResult<()>;
    fn load_options(&mut self) -> &mut dyn OptionContainer<JournalLoadOption>;
    fn extract_options(&mut self) -> &mut dyn OptionContainer<JournalExtractOption>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Dimension {
    Scenario,
    Year,
    Period,
}

impl Dimension {
    pub fn name(self) -> &'static str {
        match self {
            Dimension::Scenario => "Scenario",
            Dimension::Year => "Year",
            Dimension::Period => "Period",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Translates member labels into the engine's internal identifiers.
pub trait MetadataResolver {
    /// Returns `None` when `label` is not a member of `dimension`.
    fn member_id(&self, dimension: Dimension, label: &str) -> Option<i32>;
}

/// Runs an engine call and relabels its failure as an
/// [`JournalError::OperationFailure`] carrying `tag`.
pub fn try_operation<T, F>(tag: &'static str, operation: F) -> Result<T>
where
    F: FnOnce() -> EngineResult<T>,
{
    operation().map_err(|source| {
        debug!(operation = tag, error = %source, "Engine call failed");
        JournalError::OperationFailure { tag, source }
    })
}
