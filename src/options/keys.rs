use crate::error::{JournalError, Result};
use serde::Serialize;
use std::fmt;
use std::hash::Hash;

/// Semantic type of a journal option as understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Boolean,
    Identifier,
}

impl ValueType {
    pub fn describe(self) -> &'static str {
        match self {
            ValueType::String => "a string",
            ValueType::Boolean => "a boolean",
            ValueType::Identifier => "a member identifier",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Identifier => "identifier",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Text(String),
    Flag(bool),
    Id(i32),
}

impl OptionValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            OptionValue::Text(_) => ValueType::String,
            OptionValue::Flag(_) => ValueType::Boolean,
            OptionValue::Id(_) => ValueType::Identifier,
        }
    }

    /// Converts the value into the representation expected for `target`.
    ///
    /// Text is parsed into booleans and identifiers; any other mismatch is
    /// rejected.
    pub fn coerce(self, name: &str, target: ValueType) -> Result<OptionValue> {
        if self.value_type() == target {
            return Ok(self);
        }

        let parsed = match (&self, target) {
            (OptionValue::Text(text), ValueType::Boolean) => parse_flag(text).map(OptionValue::Flag),
            (OptionValue::Text(text), ValueType::Identifier) => {
                text.trim().parse::<i32>().ok().map(OptionValue::Id)
            }
            _ => None,
        };

        parsed.ok_or_else(|| JournalError::InvalidOptionValue {
            name: name.to_string(),
            value: self.to_string(),
            expected: target.describe(),
        })
    }
}

fn parse_flag(text: &str) -> Option<bool> {
    match text.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(text) => write!(f, "{}", text),
            OptionValue::Flag(flag) => write!(f, "{}", flag),
            OptionValue::Id(id) => write!(f, "{}", id),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Flag(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Id(value)
    }
}

/// A user-facing option declaration.
#[derive(Debug, Clone, Copy)]
pub struct Setting<K: 'static> {
    pub key: K,
    pub description: &'static str,
}

impl<K: OptionKey> Setting<K> {
    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    pub fn value_type(&self) -> ValueType {
        self.key.value_type()
    }
}

/// An enumeration of the option keys an engine operation accepts.
///
/// `ALL` lists every key the engine's option container understands;
/// `SETTINGS` is the subset users may assign directly.
pub trait OptionKey: Copy + Eq + Hash + fmt::Debug + 'static {
    /// Operation name used in error messages ("load", "extract").
    const OPTION_SET: &'static str;
    const ALL: &'static [Self];
    const SETTINGS: &'static [Setting<Self>];

    fn name(self) -> &'static str;
    fn value_type(self) -> ValueType;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.name() == name)
    }

    fn is_setting(name: &str) -> bool {
        Self::SETTINGS.iter().any(|setting| setting.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JournalLoadOption {
    Delimiter,
}

impl OptionKey for JournalLoadOption {
    const OPTION_SET: &'static str = "load";
    const ALL: &'static [Self] = &[JournalLoadOption::Delimiter];
    const SETTINGS: &'static [Setting<Self>] = &[Setting {
        key: JournalLoadOption::Delimiter,
        description: "Journal file delimiter",
    }];

    fn name(self) -> &'static str {
        match self {
            JournalLoadOption::Delimiter => "Delimiter",
        }
    }

    fn value_type(self) -> ValueType {
        match self {
            JournalLoadOption::Delimiter => ValueType::String,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JournalExtractOption {
    Delimiter,
    Regular,
    Standard,
    Recurring,
    Scenario,
    Year,
    Period,
}

impl OptionKey for JournalExtractOption {
    const OPTION_SET: &'static str = "extract";
    const ALL: &'static [Self] = &[
        JournalExtractOption::Delimiter,
        JournalExtractOption::Regular,
        JournalExtractOption::Standard,
        JournalExtractOption::Recurring,
        JournalExtractOption::Scenario,
        JournalExtractOption::Year,
        JournalExtractOption::Period,
    ];
    const SETTINGS: &'static [Setting<Self>] = &[
        Setting {
            key: JournalExtractOption::Delimiter,
            description: "File delimiter used in journal extract file",
        },
        Setting {
            key: JournalExtractOption::Regular,
            description: "True to extract regular journals",
        },
        Setting {
            key: JournalExtractOption::Standard,
            description: "True to extract standard journal templates",
        },
        Setting {
            key: JournalExtractOption::Recurring,
            description: "True to extract recurring journal templates",
        },
    ];

    fn name(self) -> &'static str {
        match self {
            JournalExtractOption::Delimiter => "Delimiter",
            JournalExtractOption::Regular => "Regular",
            JournalExtractOption::Standard => "Standard",
            JournalExtractOption::Recurring => "Recurring",
            JournalExtractOption::Scenario => "Scenario",
            JournalExtractOption::Year => "Year",
            JournalExtractOption::Period => "Period",
        }
    }

    fn value_type(self) -> ValueType {
        match self {
            JournalExtractOption::Delimiter => ValueType::String,
            JournalExtractOption::Regular
            | JournalExtractOption::Standard
            | JournalExtractOption::Recurring => ValueType::Boolean,
            JournalExtractOption::Scenario
            | JournalExtractOption::Year
            | JournalExtractOption::Period => ValueType::Identifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_is_exact() {
        assert_eq!(
            JournalLoadOption::from_name("Delimiter"),
            Some(JournalLoadOption::Delimiter)
        );
        assert_eq!(JournalLoadOption::from_name("delimiter"), None);
        assert_eq!(JournalLoadOption::from_name("Regular"), None);
        assert_eq!(
            JournalExtractOption::from_name("Period"),
            Some(JournalExtractOption::Period)
        );
    }

    #[test]
    fn test_declared_settings() {
        let load: Vec<_> = JournalLoadOption::SETTINGS.iter().map(|s| s.name()).collect();
        assert_eq!(load, vec!["Delimiter"]);

        let extract: Vec<_> = JournalExtractOption::SETTINGS
            .iter()
            .map(|s| s.name())
            .collect();
        assert_eq!(extract, vec!["Delimiter", "Regular", "Standard", "Recurring"]);

        assert!(!JournalExtractOption::is_setting("Scenario"));
        assert!(JournalExtractOption::from_name("Scenario").is_some());
    }

    #[test]
    fn test_coerce_text() {
        let flag = OptionValue::from("Yes").coerce("Regular", ValueType::Boolean).unwrap();
        assert_eq!(flag, OptionValue::Flag(true));

        let id = OptionValue::from(" 42 ").coerce("Year", ValueType::Identifier).unwrap();
        assert_eq!(id, OptionValue::Id(42));

        let text = OptionValue::from(";").coerce("Delimiter", ValueType::String).unwrap();
        assert_eq!(text, OptionValue::Text(";".to_string()));
    }

    #[test]
    fn test_coerce_rejects_mismatch() {
        let result = OptionValue::from("maybe").coerce("Regular", ValueType::Boolean);
        assert!(matches!(
            result,
            Err(JournalError::InvalidOptionValue { expected: "a boolean", .. })
        ));

        let result = OptionValue::Flag(true).coerce("Delimiter", ValueType::String);
        assert!(result.is_err());
    }
}
