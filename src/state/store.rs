//! History file storage.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, TallyError};

use super::history::FlowRecord;

/// JSON-array history file with retention trimming.
///
/// Records are stored oldest first; readers usually want them newest first
/// and reverse. Writes go through a temp file and rename so a crash never
/// leaves a half-written history.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    limit: usize,
}

impl HistoryStore {
    /// Store at `<home>/history.json`, keeping at most `limit` records.
    pub fn new(home: &Path, limit: usize) -> Self {
        Self {
            path: home.join("history.json"),
            limit: limit.max(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, oldest first. A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<FlowRecord>> {
        if !self.path.is_file() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| TallyError::ConfigParseError {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    /// The most recent records, newest first, at most `limit` of them.
    pub fn recent(&self, limit: usize) -> Result<Vec<FlowRecord>> {
        let mut records = self.load()?;
        records.reverse();
        records.truncate(limit);
        Ok(records)
    }

    /// Append a record, trimming the oldest past the retention limit.
    pub fn append(&self, record: FlowRecord) -> Result<()> {
        let mut records = self.load()?;
        records.push(record);

        if records.len() > self.limit {
            let excess = records.len() - self.limit;
            records.drain(..excess);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&records).map_err(|e| {
            TallyError::ConfigParseError {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!("recorded run ({} in history)", records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{ExecutionContext, FlowResult};
    use std::time::Duration;
    use tempfile::TempDir;

    fn record(flow: &str) -> FlowRecord {
        FlowRecord::from_result(&FlowResult::completed(
            flow,
            vec!["keypair".into()],
            ExecutionContext::new(),
            Duration::from_millis(10),
        ))
    }

    #[test]
    fn empty_store_loads_no_records() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::new(temp.path(), 10);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn append_then_load() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::new(temp.path(), 10);

        store.append(record("onboarding")).unwrap();
        store.append(record("transfer")).unwrap();

        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].flow, "onboarding");
        assert_eq!(records[1].flow, "transfer");
    }

    #[test]
    fn recent_is_newest_first_and_limited() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::new(temp.path(), 10);

        for name in ["first", "second", "third"] {
            store.append(record(name)).unwrap();
        }

        let recent = store.recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].flow, "third");
        assert_eq!(recent[1].flow, "second");
    }

    #[test]
    fn retention_drops_oldest() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::new(temp.path(), 2);

        for name in ["first", "second", "third"] {
            store.append(record(name)).unwrap();
        }

        let records = store.load().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].flow, "second");
        assert_eq!(records[1].flow, "third");
    }

    #[test]
    fn limit_is_clamped_to_one() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::new(temp.path(), 0);

        store.append(record("first")).unwrap();
        store.append(record("second")).unwrap();

        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].flow, "second");
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let store = HistoryStore::new(temp.path(), 10);
        fs::write(store.path(), "not json").unwrap();

        assert!(store.load().is_err());
    }

    #[test]
    fn store_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let home = temp.path().join("deep").join("home");
        let store = HistoryStore::new(&home, 10);

        store.append(record("onboarding")).unwrap();
        assert!(store.path().is_file());
    }
}
