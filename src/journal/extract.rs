use crate::engine::{Dimension, JournalEngine, MetadataResolver};
use crate::error::{JournalError, Result};
use crate::fsutil;
use crate::journal::request::{ExtractRequest, JournalOperationRequest, ResolvedSelection};
use crate::journal::JournalSession;
use crate::options::JournalExtractOption;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub request: JournalOperationRequest,
    pub elapsed: Duration,
}

impl<'e, E: JournalEngine + ?Sized> JournalSession<'e, E> {
    /// Extracts the journals of one scenario/year/period into a text file.
    ///
    /// Labels are resolved and written into the extract options before any
    /// path is checked; nothing touches the file system or the engine if a
    /// label is unknown.
    pub fn extract_journals(
        &mut self,
        request: &ExtractRequest,
        metadata: &dyn MetadataResolver,
    ) -> Result<ExtractReport> {
        let start_time = Instant::now();

        let selection = resolve_selection(request, metadata)?;
        {
            let mut options = self.extract_options();
            options.set_key(JournalExtractOption::Scenario, selection.scenario)?;
            options.set_key(JournalExtractOption::Year, selection.year)?;
            options.set_key(JournalExtractOption::Period, selection.period)?;
        }

        let log_file = request.log_file();
        fsutil::ensure_file_writable(&request.journal_file)?;
        fsutil::ensure_file_writable(&log_file)?;

        info!(
            scenario = %request.scenario,
            year = %request.year,
            period = %request.period,
            "Extracting journals to {}",
            request.journal_file.display()
        );
        let operation =
            JournalOperationRequest::extract(request.journal_file.clone(), log_file, selection);
        operation.execute(&mut *self.engine)?;

        Ok(ExtractReport {
            request: operation,
            elapsed: start_time.elapsed(),
        })
    }
}

fn resolve_selection(
    request: &ExtractRequest,
    metadata: &dyn MetadataResolver,
) -> Result<ResolvedSelection> {
    let resolve = |dimension: Dimension, label: &str| {
        metadata
            .member_id(dimension, label)
            .ok_or_else(|| JournalError::LookupFailure {
                dimension: dimension.to_string(),
                label: label.to_string(),
            })
    };

    Ok(ResolvedSelection {
        scenario: resolve(Dimension::Scenario, &request.scenario)?,
        year: resolve(Dimension::Year, &request.year)?,
        period: resolve(Dimension::Period, &request.period)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{EngineCall, RecordingEngine, StaticMetadata};
    use crate::options::OptionValue;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn request(dir: &Path) -> ExtractRequest {
        ExtractRequest {
            journal_file: dir.join("q1.jlf"),
            log_file: None,
            scenario: "Actual".to_string(),
            year: "2024".to_string(),
            period: "January".to_string(),
        }
    }

    #[test]
    fn test_extract_resolves_and_calls_engine_once() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = RecordingEngine::default();

        let report = JournalSession::new(&mut engine)
            .extract_journals(&request(temp_dir.path()), &StaticMetadata::standard())
            .unwrap();

        assert_eq!(
            engine.calls,
            vec![EngineCall::Extract {
                journal: temp_dir.path().join("q1.jlf"),
                log: temp_dir.path().join("q1.log"),
            }]
        );
        assert_eq!(
            report.request.selection,
            Some(ResolvedSelection {
                scenario: 1,
                year: 24,
                period: 101,
            })
        );

        let values = &engine.extract_options.values;
        assert_eq!(values[&JournalExtractOption::Scenario], OptionValue::Id(1));
        assert_eq!(values[&JournalExtractOption::Year], OptionValue::Id(24));
        assert_eq!(values[&JournalExtractOption::Period], OptionValue::Id(101));
    }

    #[test]
    fn test_explicit_log_file_is_used() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = RecordingEngine::default();
        let mut extract = request(temp_dir.path());
        extract.log_file = Some(temp_dir.path().join("extract-run.log"));

        let report = JournalSession::new(&mut engine)
            .extract_journals(&extract, &StaticMetadata::standard())
            .unwrap();

        assert_eq!(report.request.log_file, temp_dir.path().join("extract-run.log"));
    }

    #[test]
    fn test_unknown_label_aborts_before_any_io() {
        let mut engine = RecordingEngine::default();
        // The journal directory does not exist, so a writability check would
        // fail with PathNotWritable if it ran before resolution.
        let extract = ExtractRequest {
            period: "Month13".to_string(),
            ..request(&PathBuf::from("no-such-dir"))
        };

        let error = JournalSession::new(&mut engine)
            .extract_journals(&extract, &StaticMetadata::standard())
            .unwrap_err();

        match error {
            JournalError::LookupFailure { dimension, label } => {
                assert_eq!(dimension, "Period");
                assert_eq!(label, "Month13");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(engine.calls.is_empty());
        assert!(engine.extract_options.writes.is_empty());
    }

    #[test]
    fn test_unwritable_journal_path_aborts_before_engine_call() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = RecordingEngine::default();
        let extract = request(&temp_dir.path().join("absent"));

        let error = JournalSession::new(&mut engine)
            .extract_journals(&extract, &StaticMetadata::standard())
            .unwrap_err();

        assert!(matches!(error, JournalError::PathNotWritable { .. }));
        assert!(engine.calls.is_empty());
    }

    #[test]
    fn test_unwritable_log_path_aborts_before_engine_call() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = RecordingEngine::default();
        let mut extract = request(temp_dir.path());
        extract.log_file = Some(temp_dir.path().join("absent").join("q1.log"));

        let error = JournalSession::new(&mut engine)
            .extract_journals(&extract, &StaticMetadata::standard())
            .unwrap_err();

        assert!(matches!(error, JournalError::PathNotWritable { .. }));
        assert!(engine.calls.is_empty());
    }

    #[test]
    fn test_engine_failure_is_labelled() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = RecordingEngine::default().failing_on(temp_dir.path().join("q1.jlf"));

        let error = JournalSession::new(&mut engine)
            .extract_journals(&request(temp_dir.path()), &StaticMetadata::standard())
            .unwrap_err();

        assert!(error.to_string().starts_with("Extracting journals: "));
    }
}
