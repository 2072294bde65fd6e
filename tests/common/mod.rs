//! Common test utilities for integration tests
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use focus_tasks::{FixedClock, MemoryStorage, Storage, Task, TaskServerHandler};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// 2025-03-15 10:00, a Saturday
pub fn test_now() -> NaiveDateTime {
    date(2025, 3, 15).and_hms_opt(10, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Handler over in-memory storage with the clock pinned to [`test_now`]
pub fn get_test_handler() -> (TaskServerHandler, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::new());
    let handler =
        TaskServerHandler::with_parts(storage.clone(), Arc::new(FixedClock(test_now()))).unwrap();
    (handler, storage)
}

/// Handler over a TOML file, clock pinned to [`test_now`]
pub fn file_handler(path: &Path) -> TaskServerHandler {
    TaskServerHandler::with_parts(
        Arc::new(Storage::new(path)),
        Arc::new(FixedClock(test_now())),
    )
    .unwrap()
}

/// Temporary directory plus the data file path inside it
pub fn temp_data_file() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tasks.toml");
    (dir, path)
}

/// Extract the id from a create response
/// Response format: "Task created with ID: <id>" or "Subtask added with ID: <id> (...)"
pub fn extract_id_from_response(response: &str) -> i64 {
    response
        .split("ID: ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|id| id.parse().ok())
        .unwrap_or_else(|| panic!("no id in response: {}", response))
}

/// Create a test task with minimal fields
pub fn create_test_task(id: i64, title: &str, date: Option<NaiveDate>) -> Task {
    Task {
        id,
        title: title.to_string(),
        date,
        time: None,
        tag: None,
        completed: false,
        is_event: false,
        subtasks: Vec::new(),
    }
}
