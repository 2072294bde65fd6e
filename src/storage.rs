//! Persistence port and its backends
//!
//! All state lives in one flat key-value document with four keys:
//! `dark_mode`, `work_minutes`, `focus` and `tasks`. Domain objects call
//! [`Persistence::save`] with a single [`Record`] after every successful
//! mutation; the backend rewrites only that key.

use crate::error::StorageError;
use crate::focus::FocusState;
use crate::tasks::Task;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Everything read from storage at startup; absent keys are `None`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<FocusState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
}

/// One key of the state document together with its new value
#[derive(Debug, Clone, Copy)]
pub enum Record<'a> {
    Tasks(&'a [Task]),
    DarkMode(bool),
    Focus(&'a FocusState),
    WorkMinutes(u32),
}

impl Record<'_> {
    pub fn key(&self) -> &'static str {
        match self {
            Record::Tasks(_) => "tasks",
            Record::DarkMode(_) => "dark_mode",
            Record::Focus(_) => "focus",
            Record::WorkMinutes(_) => "work_minutes",
        }
    }

    fn apply_to(self, snapshot: &mut Snapshot) {
        match self {
            Record::Tasks(tasks) => snapshot.tasks = Some(tasks.to_vec()),
            Record::DarkMode(flag) => snapshot.dark_mode = Some(flag),
            Record::Focus(state) => snapshot.focus = Some(state.clone()),
            Record::WorkMinutes(minutes) => snapshot.work_minutes = Some(minutes),
        }
    }
}

/// Key-value persistence read once at startup and written after each mutation
pub trait Persistence: Send + Sync {
    fn load(&self) -> Result<Snapshot, StorageError>;
    fn save(&self, record: Record<'_>) -> Result<(), StorageError>;
}

/// TOML file backend
///
/// Keeps the last known document in memory so each save only has to
/// replace one key and rewrite the file.
pub struct Storage {
    file_path: PathBuf,
    current: Mutex<Snapshot>,
}

impl Storage {
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            current: Mutex::new(Snapshot::default()),
        }
    }

    /// Get the file path
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn read_file(&self) -> Result<Snapshot, StorageError> {
        if !self.file_path.exists() {
            return Ok(Snapshot::default());
        }

        let content = fs::read_to_string(&self.file_path)?;
        // Normalize line endings so files edited on Windows still parse the same
        let content = content.replace("\r\n", "\n");
        Ok(toml::from_str(&content)?)
    }

    fn write_file(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let content = toml::to_string_pretty(snapshot)?;

        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut tmp_path = self.file_path.clone().into_os_string();
        tmp_path.push(".tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}

impl Persistence for Storage {
    fn load(&self) -> Result<Snapshot, StorageError> {
        let snapshot = self.read_file()?;
        *self.current.lock().unwrap() = snapshot.clone();
        debug!(path = %self.file_path.display(), "loaded state");
        Ok(snapshot)
    }

    fn save(&self, record: Record<'_>) -> Result<(), StorageError> {
        let mut current = self.current.lock().unwrap();
        let key = record.key();
        let mut next = current.clone();
        record.apply_to(&mut next);
        self.write_file(&next)?;
        *current = next;
        debug!(key, path = %self.file_path.display(), "saved state");
        Ok(())
    }
}

/// In-memory backend that also records which keys were written
///
/// [`MemoryStorage::fail_saves`] makes every later save fail with an I/O
/// error, for exercising the rejection paths.
#[derive(Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Snapshot>,
    writes: Mutex<Vec<&'static str>>,
    failing: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(snapshot),
            ..Self::default()
        }
    }

    pub fn fail_saves(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Keys written so far, in order
    pub fn writes(&self) -> Vec<&'static str> {
        self.writes.lock().unwrap().clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.lock().unwrap().clone()
    }
}

impl Persistence for MemoryStorage {
    fn load(&self) -> Result<Snapshot, StorageError> {
        Ok(self.snapshot())
    }

    fn save(&self, record: Record<'_>) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("disk full").into());
        }
        self.writes.lock().unwrap().push(record.key());
        record.apply_to(&mut self.snapshot.lock().unwrap());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus::FocusMode;
    use crate::tasks::Subtask;
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task {
                id: 1_700_000_000_000,
                title: "Pay rent".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 3, 1),
                time: NaiveTime::from_hms_opt(9, 0, 0),
                tag: Some("Home".to_string()),
                completed: false,
                is_event: false,
                subtasks: vec![
                    Subtask {
                        id: 10,
                        title: "Check balance".to_string(),
                        completed: true,
                    },
                    Subtask {
                        id: 11,
                        title: "Transfer".to_string(),
                        completed: false,
                    },
                ],
            },
            Task {
                id: 1_700_000_000_001,
                title: "Conference".to_string(),
                date: NaiveDate::from_ymd_opt(2025, 3, 20),
                time: None,
                tag: None,
                completed: true,
                is_event: true,
                subtasks: vec![],
            },
        ]
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("state.toml"));
        assert_eq!(storage.load().unwrap(), Snapshot::default());
    }

    #[test]
    fn test_round_trip_reproduces_tasks() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        let tasks = sample_tasks();

        let storage = Storage::new(&path);
        storage.load().unwrap();
        storage.save(Record::Tasks(&tasks)).unwrap();

        let reloaded = Storage::new(&path).load().unwrap();
        assert_eq!(reloaded.tasks, Some(tasks));
        assert_eq!(reloaded.dark_mode, None);
    }

    #[test]
    fn test_save_replaces_only_one_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.toml");
        let tasks = sample_tasks();

        let storage = Storage::new(&path);
        storage.load().unwrap();
        storage.save(Record::Tasks(&tasks)).unwrap();
        storage.save(Record::DarkMode(true)).unwrap();
        storage.save(Record::WorkMinutes(25)).unwrap();

        let mut focus = FocusState::default();
        focus.mode = FocusMode::Rest;
        focus.active_task_id = Some(tasks[0].id);
        storage.save(Record::Focus(&focus)).unwrap();

        let reloaded = Storage::new(&path).load().unwrap();
        assert_eq!(reloaded.tasks, Some(tasks));
        assert_eq!(reloaded.dark_mode, Some(true));
        assert_eq!(reloaded.work_minutes, Some(25));
        assert_eq!(reloaded.focus, Some(focus));
        assert!(!dir.path().join("nested").join("state.toml.tmp").exists());
    }

    #[test]
    fn test_invalid_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.toml");
        fs::write(&path, "tasks = 12\n[[[").unwrap();
        assert!(matches!(
            Storage::new(&path).load(),
            Err(StorageError::Parse(_))
        ));
    }

    #[test]
    fn test_memory_storage_records_writes() {
        let storage = MemoryStorage::new();
        storage.save(Record::DarkMode(true)).unwrap();
        storage.save(Record::Tasks(&[])).unwrap();
        assert_eq!(storage.writes(), vec!["dark_mode", "tasks"]);
        assert_eq!(storage.load().unwrap().dark_mode, Some(true));
        assert_eq!(storage.load().unwrap().tasks, Some(vec![]));
    }

    #[test]
    fn test_memory_storage_can_fail_saves() {
        let storage = MemoryStorage::new();
        storage.fail_saves(true);
        assert!(matches!(
            storage.save(Record::DarkMode(true)),
            Err(StorageError::Io(_))
        ));
        assert!(storage.writes().is_empty());
        assert_eq!(storage.snapshot().dark_mode, None);

        storage.fail_saves(false);
        storage.save(Record::DarkMode(true)).unwrap();
        assert_eq!(storage.writes(), vec!["dark_mode"]);
    }
}
