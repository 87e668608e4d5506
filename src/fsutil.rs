use crate::error::{JournalError, Result};
use globset::GlobBuilder;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const LOG_EXTENSION: &str = "log";
const WILDCARDS: &[char] = &['*', '?'];

/// Expands a journal file pattern into concrete paths.
pub trait FileResolver {
    fn resolve(&self, pattern: &str) -> Result<Vec<PathBuf>>;
}

/// Resolves wildcards in the file-name component of a pattern.
///
/// Only `*` and `?` are wildcards; every other character, brackets and
/// braces included, matches itself. Matches are regular files directly
/// inside the pattern's directory, returned sorted by file name. A pattern
/// without wildcards resolves to itself whether or not the file exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobResolver;

impl FileResolver for GlobResolver {
    fn resolve(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        if pattern.trim().is_empty() {
            return Err(JournalError::InvalidPattern {
                pattern: pattern.to_string(),
                message: "pattern is empty".to_string(),
            });
        }

        if !has_wildcards(pattern) {
            return Ok(vec![PathBuf::from(pattern)]);
        }

        let path = Path::new(pattern);
        let file_pattern = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| JournalError::InvalidPattern {
                pattern: pattern.to_string(),
                message: "pattern has no file name".to_string(),
            })?;

        let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
        if parent.is_some_and(|p| has_wildcards(&p.to_string_lossy())) {
            return Err(JournalError::InvalidPattern {
                pattern: pattern.to_string(),
                message: "wildcards are only supported in the file name".to_string(),
            });
        }

        let search_dir = parent.unwrap_or_else(|| Path::new("."));
        if !search_dir.is_dir() {
            return Err(JournalError::FileNotFound {
                path: search_dir.display().to_string(),
            });
        }

        let matcher = GlobBuilder::new(&file_name_glob(file_pattern))
            .literal_separator(true)
            .backslash_escape(false)
            .case_insensitive(cfg!(windows))
            .build()?
            .compile_matcher();

        let matches = WalkDir::new(search_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| matcher.is_match(entry.file_name()))
            .map(|entry| match parent {
                Some(_) => entry.into_path(),
                None => PathBuf::from(entry.file_name()),
            })
            .collect();

        Ok(matches)
    }
}

pub fn has_wildcards(pattern: &str) -> bool {
    pattern.contains(WILDCARDS)
}

/// Glob source for a file-name pattern with only `*` and `?` active.
fn file_name_glob(file_pattern: &str) -> String {
    file_pattern
        .chars()
        .map(|c| match c {
            '*' | '?' => c.to_string(),
            _ => globset::escape(c.encode_utf8(&mut [0; 4])),
        })
        .collect()
}

/// Log file for a loaded journal file: same stem with a `.log` extension,
/// placed in `log_dir` when one is given, else beside the source.
pub fn log_path_for(source: &Path, log_dir: Option<&Path>) -> PathBuf {
    match log_dir.filter(|dir| !dir.as_os_str().is_empty()) {
        Some(dir) => {
            let file_name = source.file_name().map(PathBuf::from).unwrap_or_default();
            dir.join(file_name.with_extension(LOG_EXTENSION))
        }
        None => default_log_path(source),
    }
}

pub fn default_log_path(data_file: &Path) -> PathBuf {
    data_file.with_extension(LOG_EXTENSION)
}

pub fn ensure_file_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(JournalError::FileNotFound {
            path: path.display().to_string(),
        })
    }
}

/// Checks that `path` can be created or overwritten by opening it for
/// append. A file created by the check is removed again.
pub fn ensure_file_writable(path: &Path) -> Result<()> {
    let not_writable = || JournalError::PathNotWritable {
        path: path.display().to_string(),
    };

    if path.as_os_str().is_empty() {
        return Err(not_writable());
    }

    let existed = fs::symlink_metadata(path).is_ok();
    match OpenOptions::new().append(true).create(true).open(path) {
        Ok(file) => {
            drop(file);
            if !existed {
                fs::remove_file(path).map_err(|_| not_writable())?;
            }
            Ok(())
        }
        Err(_) => Err(not_writable()),
    }
}
