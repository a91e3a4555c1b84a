use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::Duration;

use itertools::Itertools;

use crate::binding::Binding;
use crate::error::LinkError;

const SAVE_ATTEMPTS: u32 = 3;
const SAVE_BACKOFF: Duration = Duration::from_millis(50);

/// Reads and writes the binding list as a JSON array.
#[derive(Debug, Clone)]
pub struct BindingStore {
    path: PathBuf,
}

impl BindingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored bindings. Never fails: a missing, empty or broken
    /// store yields an empty list.
    pub fn load(&self) -> Vec<Binding> {
        let fp = match File::open(&self.path) {
            Ok(fp) => fp,
            Err(err) => {
                log::debug!("no bindings at {}: {}", self.path.display(), err);
                return Vec::new();
            }
        };

        let value: serde_json::Value = match serde_json::from_reader(BufReader::new(fp)) {
            Ok(value) => value,
            Err(err) if err.is_eof() => return Vec::new(),
            Err(err) => {
                log::warn!("could not parse bindings in {}: {}", self.path.display(), err);
                return Vec::new();
            }
        };

        if value.is_null() {
            return Vec::new();
        }

        serde_json::from_value(value).unwrap_or_else(|err| {
            log::warn!("could not read bindings in {}: {}", self.path.display(), err);
            Vec::new()
        })
    }

    /// Writes all non-blank bindings, replacing the previous file atomically.
    /// Transient failures are retried a few times with a growing pause.
    pub fn save(&self, bindings: &[Binding]) -> Result<(), LinkError> {
        let kept = bindings.iter().filter(|b| !b.is_blank()).collect_vec();
        let data = serde_json::to_vec_pretty(&kept)?;

        let mut attempt = 1;
        loop {
            match self.write_atomic(&data) {
                Ok(()) => {
                    log::debug!("saved {} bindings to {}", kept.len(), self.path.display());
                    return Ok(());
                }

                Err(err) if attempt < SAVE_ATTEMPTS => {
                    log::debug!("saving bindings failed (attempt {}): {}", attempt, err);
                    sleep(SAVE_BACKOFF * attempt);
                    attempt += 1;
                }

                Err(err) => return Err(err),
            }
        }
    }

    fn write_atomic(&self, data: &[u8]) -> Result<(), LinkError> {
        let persistence = |source: std::io::Error| LinkError::Persistence { path: self.path.clone(), source };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(persistence)?;
        }

        // write next to the target so the rename stays on one filesystem
        let tmp_path = self.path.with_extension("json.tmp");

        {
            let mut writer = BufWriter::new(File::create(&tmp_path).map_err(persistence)?);
            writer.write_all(data).map_err(persistence)?;
            writer.flush().map_err(persistence)?;
        }

        std::fs::rename(&tmp_path, &self.path).map_err(persistence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = BindingStore::new(dir.path().join("Settings.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn empty_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Settings.json");
        std::fs::write(&path, "   ").unwrap();
        assert!(BindingStore::new(path).load().is_empty());
    }

    #[test]
    fn garbage_store_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Settings.json");
        std::fs::write(&path, "{ this is not json").unwrap();
        assert!(BindingStore::new(path).load().is_empty());
    }

    #[test]
    fn save_drops_blank_rows_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let store = BindingStore::new(dir.path().join("nested").join("Settings.json"));

        let bindings = vec![
            Binding::new("gh", "GitHub", "https://github.com/{0}").in_bulk_open(true),
            Binding::default(),
            Binding::new("rs", "Docs", "https://docs.rs/{0}").with_delimiter(" "),
        ];

        store.save(&bindings).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], bindings[0]);
        assert_eq!(loaded[1].delimiter, " ");
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn saved_document_uses_pascal_case_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = BindingStore::new(dir.path().join("Settings.json"));
        store.save(&[Binding::new("gh", "GitHub", "https://github.com")]).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        for field in ["Keyword", "Title", "Url", "Delimiter", "IconPath", "AddToBulkOpenUrls"] {
            assert!(text.contains(field), "missing {field} in {text}");
        }
    }

    #[test]
    fn unwritable_store_reports_persistence_after_retries() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let store = BindingStore::new(blocker.join("Settings.json"));
        let started = std::time::Instant::now();

        let result = store.save(&[Binding::new("gh", "GitHub", "https://github.com")]);

        match result {
            Err(LinkError::Persistence { path, .. }) => assert_eq!(path, blocker.join("Settings.json")),
            other => panic!("expected a persistence error, got {other:?}"),
        }
        // backoff of 1x and 2x before the second and third attempt
        assert!(started.elapsed() >= SAVE_BACKOFF * 3);
    }
}
