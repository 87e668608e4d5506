use crate::config::MetadataConfig;
use crate::engine::{
    Dimension, EngineError, EngineResult, JournalEngine, MetadataResolver, OptionContainer,
};
use crate::options::{JournalExtractOption, JournalLoadOption, OptionKey, OptionValue, ValueType};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Identifier the engine reports for an unset member option.
const UNSET_MEMBER_ID: i32 = -1;

/// In-memory option container used by [`OfflineEngine`].
#[derive(Debug, Clone)]
pub struct OptionStore<K: OptionKey> {
    values: HashMap<K, OptionValue>,
}

impl<K: OptionKey> OptionStore<K> {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    fn with_value(mut self, key: K, value: OptionValue) -> Self {
        self.values.insert(key, value);
        self
    }

    fn default_for(key: K) -> OptionValue {
        match key.value_type() {
            ValueType::String => OptionValue::Text(String::new()),
            ValueType::Boolean => OptionValue::Flag(false),
            ValueType::Identifier => OptionValue::Id(UNSET_MEMBER_ID),
        }
    }

    /// Every key in declaration order with its current or default value.
    pub fn entries(&self) -> Vec<(&'static str, OptionValue)> {
        K::ALL
            .iter()
            .map(|key| {
                let value = self
                    .values
                    .get(key)
                    .cloned()
                    .unwrap_or_else(|| Self::default_for(*key));
                (key.name(), value)
            })
            .collect()
    }
}

impl<K: OptionKey> Default for OptionStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: OptionKey> OptionContainer<K> for OptionStore<K> {
    fn set_option(&mut self, key: K, value: OptionValue) -> EngineResult<()> {
        if value.value_type() != key.value_type() {
            return Err(EngineError::new(format!(
                "option {} expects {}",
                key.name(),
                key.value_type().describe()
            )));
        }
        self.values.insert(key, value);
        Ok(())
    }

    fn get_option(&self, key: K) -> EngineResult<OptionValue> {
        Ok(self
            .values
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Self::default_for(key)))
    }
}

/// Engine binding that works without a consolidation server.
///
/// Loads check that the journal file is readable and record the request in
/// the log file; extracts write an empty journal file. No data is changed
/// anywhere, which makes it suitable for dry runs and scripting.
#[derive(Debug, Clone)]
pub struct OfflineEngine {
    load_options: OptionStore<JournalLoadOption>,
    extract_options: OptionStore<JournalExtractOption>,
}

impl OfflineEngine {
    pub fn new() -> Self {
        Self {
            load_options: OptionStore::new()
                .with_value(JournalLoadOption::Delimiter, OptionValue::from(";")),
            extract_options: OptionStore::new()
                .with_value(JournalExtractOption::Delimiter, OptionValue::from(";"))
                .with_value(JournalExtractOption::Regular, OptionValue::Flag(true)),
        }
    }

    fn write_log(
        log_file: &Path,
        operation: &str,
        journal_file: &Path,
        options: &[(&'static str, OptionValue)],
    ) -> EngineResult<()> {
        let mut log = fs::File::create(log_file).map_err(|e| io_error(log_file, e))?;

        let mut lines = vec![
            format!("{} (offline session)", operation),
            format!("Started: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
            format!("Journal file: {}", journal_file.display()),
        ];
        lines.extend(
            options
                .iter()
                .map(|(name, value)| format!("Option {}: {}", name, value)),
        );
        lines.push("No journals were posted to an application.".to_string());

        for line in lines {
            writeln!(log, "{}", line).map_err(|e| io_error(log_file, e))?;
        }
        Ok(())
    }
}

impl Default for OfflineEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalEngine for OfflineEngine {
    fn load(&mut self, journal_file: &Path, log_file: &Path) -> EngineResult<()> {
        let metadata = fs::metadata(journal_file).map_err(|e| io_error(journal_file, e))?;
        if !metadata.is_file() {
            return Err(EngineError::new(format!(
                "{} is not a file",
                journal_file.display()
            )));
        }
        fs::File::open(journal_file).map_err(|e| io_error(journal_file, e))?;

        let mut entries = self.load_options.entries();
        entries.push(("Size", OptionValue::Text(format!("{} bytes", metadata.len()))));
        Self::write_log(log_file, "Journal load", journal_file, &entries)
    }

    fn extract(&mut self, journal_file: &Path, log_file: &Path) -> EngineResult<()> {
        fs::File::create(journal_file).map_err(|e| io_error(journal_file, e))?;
        Self::write_log(
            log_file,
            "Journal extract",
            journal_file,
            &self.extract_options.entries(),
        )
    }

    fn load_options(&mut self) -> &mut dyn OptionContainer<JournalLoadOption> {
        &mut self.load_options
    }

    fn extract_options(&mut self) -> &mut dyn OptionContainer<JournalExtractOption> {
        &mut self.extract_options
    }
}

fn io_error(path: &Path, error: std::io::Error) -> EngineError {
    let engine_error = EngineError::new(format!("{}: {}", path.display(), error));
    match error.raw_os_error() {
        Some(code) => engine_error.with_code(code),
        None => engine_error,
    }
}

impl MetadataConfig {
    fn members(&self, dimension: Dimension) -> &BTreeMap<String, i32> {
        match dimension {
            Dimension::Scenario => &self.scenario,
            Dimension::Year => &self.year,
            Dimension::Period => &self.period,
        }
    }
}

/// Member labels are matched case-insensitively.
impl MetadataResolver for MetadataConfig {
    fn member_id(&self, dimension: Dimension, label: &str) -> Option<i32> {
        let label = label.trim();
        self.members(dimension)
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
            .map(|(_, id)| *id)
    }
}
