use crate::error::{JournalError, Result};
use crate::journal::FailurePolicy;
use crate::options::{JournalExtractOption, JournalLoadOption, OptionKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub load: LoadConfig,
    pub extract: ExtractConfig,
    pub metadata: MetadataConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
    pub fail_fast: bool,
    pub options: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub options: BTreeMap<String, String>,
}

/// Member label to identifier tables used when no live metadata source is
/// bound.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MetadataConfig {
    pub scenario: BTreeMap<String, i32>,
    pub year: BTreeMap<String, i32>,
    pub period: BTreeMap<String, i32>,
}

impl LoadConfig {
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.fail_fast {
            FailurePolicy::Abort
        } else {
            FailurePolicy::Continue
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(JournalError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| JournalError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| JournalError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["journal-batch.toml", ".journal-batch.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref log_dir) = cli_args.log_dir {
            self.load.log_dir = Some(log_dir.clone());
        }

        if cli_args.fail_fast {
            self.load.fail_fast = true;
        }

        for (name, value) in &cli_args.load_options {
            self.load.options.insert(name.clone(), value.clone());
        }

        for (name, value) in &cli_args.extract_options {
            self.extract.options.insert(name.clone(), value.clone());
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| JournalError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| JournalError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    /// Rejects option names that are not user settings of their operation.
    pub fn validate(&self) -> Result<()> {
        validate_settings::<JournalLoadOption>(&self.load.options)?;
        validate_settings::<JournalExtractOption>(&self.extract.options)?;

        if let Some(ref log_dir) = self.load.log_dir {
            if log_dir.as_os_str().is_empty() {
                return Err(JournalError::Config {
                    message: "load.log_dir must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let mut sample_config = Self::default();
        sample_config
            .load
            .options
            .insert("Delimiter".to_string(), ";".to_string());
        sample_config.extract.options.extend([
            ("Delimiter".to_string(), ";".to_string()),
            ("Regular".to_string(), "true".to_string()),
            ("Standard".to_string(), "false".to_string()),
            ("Recurring".to_string(), "false".to_string()),
        ]);
        sample_config
            .metadata
            .scenario
            .insert("Actual".to_string(), 1);
        sample_config.metadata.year.insert("2024".to_string(), 1);
        sample_config
            .metadata
            .period
            .insert("January".to_string(), 1);

        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

fn validate_settings<K: OptionKey>(options: &BTreeMap<String, String>) -> Result<()> {
    match options.keys().find(|name| !K::is_setting(name)) {
        Some(name) => Err(JournalError::UnknownOption {
            name: name.clone(),
            option_set: K::OPTION_SET,
        }),
        None => Ok(()),
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub log_dir: Option<PathBuf>,
    pub fail_fast: bool,
    pub load_options: Vec<(String, String)>,
    pub extract_options: Vec<(String, String)>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log_dir(mut self, log_dir: Option<PathBuf>) -> Self {
        self.log_dir = log_dir;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_load_options(mut self, options: Vec<(String, String)>) -> Self {
        self.load_options = options;
        self
    }

    pub fn with_extract_options(mut self, options: Vec<(String, String)>) -> Self {
        self.extract_options = options;
        self
    }
}
