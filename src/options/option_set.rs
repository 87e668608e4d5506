use crate::engine::{try_operation, OptionContainer};
use crate::error::{JournalError, Result};
use crate::options::keys::{JournalExtractOption, JournalLoadOption, OptionKey, OptionValue, Setting};
use std::collections::HashMap;
use tracing::debug;

const SET_OPTION_TAG: &str = "Setting option";
const GET_OPTION_TAG: &str = "Reading option";

/// Name-based view over an engine option container.
///
/// The set borrows the container for its lifetime and forwards each
/// assignment immediately; it owns only the name table built from `K::ALL`.
pub struct OptionSet<'a, K: OptionKey> {
    container: &'a mut dyn OptionContainer<K>,
    table: HashMap<&'static str, K>,
}

pub type LoadOptions<'a> = OptionSet<'a, JournalLoadOption>;
pub type ExtractOptions<'a> = OptionSet<'a, JournalExtractOption>;

impl<'a, K: OptionKey> OptionSet<'a, K> {
    pub fn bind(container: &'a mut dyn OptionContainer<K>) -> Self {
        let table = K::ALL.iter().map(|key| (key.name(), *key)).collect();
        Self { container, table }
    }

    /// The user-facing settings declared for this option set.
    pub fn settings() -> &'static [Setting<K>] {
        K::SETTINGS
    }

    pub fn lookup(&self, name: &str) -> Result<K> {
        self.table
            .get(name)
            .copied()
            .ok_or_else(|| JournalError::UnknownOption {
                name: name.to_string(),
                option_set: K::OPTION_SET,
            })
    }

    pub fn set<V: Into<OptionValue>>(&mut self, name: &str, value: V) -> Result<()> {
        let key = self.lookup(name)?;
        self.set_key(key, value)
    }

    pub fn get(&self, name: &str) -> Result<OptionValue> {
        let key = self.lookup(name)?;
        self.get_key(key)
    }

    pub fn set_key<V: Into<OptionValue>>(&mut self, key: K, value: V) -> Result<()> {
        let value = value.into().coerce(key.name(), key.value_type())?;
        debug!(option = key.name(), value = %value, "Setting {} option", K::OPTION_SET);

        let container = &mut *self.container;
        try_operation(SET_OPTION_TAG, || container.set_option(key, value))
    }

    pub fn get_key(&self, key: K) -> Result<OptionValue> {
        try_operation(GET_OPTION_TAG, || self.container.get_option(key))
    }

    /// Applies `(name, value)` assignments in order, stopping at the first
    /// failure.
    pub fn apply<'v, I>(&mut self, assignments: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'v str, &'v str)>,
    {
        for (name, value) in assignments {
            self.set(name, value)?;
        }
        Ok(())
    }

    /// Current value of every declared setting.
    pub fn snapshot(&self) -> Result<Vec<(&'static str, OptionValue)>> {
        K::SETTINGS
            .iter()
            .map(|setting| Ok((setting.name(), self.get_key(setting.key)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::RecordingContainer;

    #[test]
    fn test_round_trip_every_load_key() {
        let mut container = RecordingContainer::<JournalLoadOption>::default();
        let mut options = LoadOptions::bind(&mut container);

        options.set("Delimiter", "|").unwrap();
        assert_eq!(options.get("Delimiter").unwrap(), OptionValue::from("|"));
    }

    #[test]
    fn test_round_trip_every_extract_key() {
        let mut container = RecordingContainer::<JournalExtractOption>::default();
        let mut options = ExtractOptions::bind(&mut container);

        let cases: Vec<(&str, OptionValue)> = vec![
            ("Delimiter", OptionValue::from(";")),
            ("Regular", OptionValue::from(true)),
            ("Standard", OptionValue::from(false)),
            ("Recurring", OptionValue::from(true)),
            ("Scenario", OptionValue::from(11)),
            ("Year", OptionValue::from(2024)),
            ("Period", OptionValue::from(-1)),
        ];

        for (name, value) in cases {
            options.set(name, value.clone()).unwrap();
            assert_eq!(options.get(name).unwrap(), value, "round trip of {}", name);
        }
    }

    #[test]
    fn test_unknown_option_never_touches_container() {
        let mut container = RecordingContainer::<JournalLoadOption>::default();
        {
            let mut options = LoadOptions::bind(&mut container);
            let result = options.set("delimiter", ",");
            assert!(matches!(
                result,
                Err(JournalError::UnknownOption { option_set: "load", .. })
            ));

            let result = options.set("Regular", true);
            assert!(matches!(result, Err(JournalError::UnknownOption { .. })));
        }
        assert!(container.writes.is_empty());
    }

    #[test]
    fn test_invalid_value_never_touches_container() {
        let mut container = RecordingContainer::<JournalExtractOption>::default();
        {
            let mut options = ExtractOptions::bind(&mut container);
            let result = options.set("Regular", "sometimes");
            assert!(matches!(result, Err(JournalError::InvalidOptionValue { .. })));
        }
        assert!(container.writes.is_empty());
    }

    #[test]
    fn test_text_assignments_are_converted() {
        let mut container = RecordingContainer::<JournalExtractOption>::default();
        let mut options = ExtractOptions::bind(&mut container);

        options
            .apply([("Regular", "true"), ("Recurring", "no"), ("Delimiter", ",")])
            .unwrap();

        assert_eq!(options.get("Regular").unwrap(), OptionValue::Flag(true));
        assert_eq!(options.get("Recurring").unwrap(), OptionValue::Flag(false));
        assert_eq!(options.get("Delimiter").unwrap(), OptionValue::from(","));
    }

    #[test]
    fn test_apply_stops_at_first_failure() {
        let mut container = RecordingContainer::<JournalExtractOption>::default();
        {
            let mut options = ExtractOptions::bind(&mut container);
            let result = options.apply([("Regular", "true"), ("Bogus", "1"), ("Standard", "true")]);
            assert!(result.is_err());
        }
        assert_eq!(container.writes.len(), 1);
    }

    #[test]
    fn test_container_failure_is_wrapped() {
        let mut container = RecordingContainer::<JournalLoadOption>::default();
        container.reject_writes = true;
        let mut options = LoadOptions::bind(&mut container);

        let error = options.set("Delimiter", ";").unwrap_err();
        assert!(error.to_string().starts_with("Setting option: "));
    }

    #[test]
    fn test_snapshot_lists_declared_settings() {
        let mut container = RecordingContainer::<JournalExtractOption>::default();
        let mut options = ExtractOptions::bind(&mut container);
        options.set("Delimiter", ";").unwrap();
        options.set("Regular", true).unwrap();
        options.set("Standard", false).unwrap();
        options.set("Recurring", false).unwrap();
        options.set("Year", 7).unwrap();

        let names: Vec<_> = options
            .snapshot()
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["Delimiter", "Regular", "Standard", "Recurring"]);
        assert_eq!(ExtractOptions::settings().len(), 4);
    }
}
