use crate::engine::EngineError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("Unknown {option_set} option: {name}")]
    UnknownOption {
        name: String,
        option_set: &'static str,
    },

    #[error("Invalid value '{value}' for option {name}: expected {expected}")]
    InvalidOptionValue {
        name: String,
        value: String,
        expected: &'static str,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Path is not writable: {path}")]
    PathNotWritable { path: String },

    #[error("No {dimension} member named '{label}'")]
    LookupFailure { dimension: String, label: String },

    #[error("{tag}: {source}")]
    OperationFailure {
        tag: &'static str,
        #[source]
        source: EngineError,
    },

    #[error("Invalid journal file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl JournalError {
    /// True for errors raised before the engine was called.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            JournalError::FileNotFound { .. }
                | JournalError::PathNotWritable { .. }
                | JournalError::LookupFailure { .. }
        )
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for JournalError {
    fn user_message(&self) -> String {
        match self {
            JournalError::UnknownOption { name, option_set } => {
                format!("'{}' is not a valid {} option", name, option_set)
            }
            JournalError::InvalidOptionValue {
                name,
                value,
                expected,
            } => {
                format!("Option {} expects {} but got '{}'", name, expected, value)
            }
            JournalError::FileNotFound { path } => {
                format!("Journal file does not exist: {}", path)
            }
            JournalError::PathNotWritable { path } => {
                format!("Cannot write to: {}", path)
            }
            JournalError::LookupFailure { dimension, label } => {
                format!("Unknown {} member: {}", dimension, label)
            }
            JournalError::OperationFailure { tag, source } => {
                format!("{} failed: {}", tag, source)
            }
            JournalError::InvalidPattern { pattern, message } => {
                format!("Invalid journal file pattern {}: {}", pattern, message)
            }
            JournalError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            JournalError::UnknownOption { .. } => Some(
                "Run 'journal-batch options' to list the options each operation accepts. Option names are case-sensitive.".to_string()
            ),
            JournalError::InvalidOptionValue { .. } => Some(
                "Boolean options accept true/false, yes/no or 1/0; identifier options accept whole numbers.".to_string()
            ),
            JournalError::FileNotFound { .. } => Some(
                "Check the journal file path. Use wildcards in the file name (e.g. journals/*.jlf) to load several files.".to_string()
            ),
            JournalError::PathNotWritable { .. } => Some(
                "Ensure the target directory exists and you have write permission, or choose another location with --log-dir / --log-file.".to_string()
            ),
            JournalError::LookupFailure { .. } => Some(
                "Check the scenario, year and period labels, or add them to the [metadata] section of the configuration file.".to_string()
            ),
            JournalError::OperationFailure { .. } => Some(
                "Inspect the generated log file for details reported by the engine.".to_string()
            ),
            JournalError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all option names are valid.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for JournalError {
    fn from(error: toml::de::Error) -> Self {
        JournalError::Config {
            message: error.to_string(),
        }
    }
}

impl From<globset::Error> for JournalError {
    fn from(error: globset::Error) -> Self {
        JournalError::InvalidPattern {
            pattern: error.glob().unwrap_or("<unknown>").to_string(),
            message: error.kind().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, JournalError>;
