//! Task domain models and the task store
//!
//! Split into submodules:
//! - `task`: Task and Subtask entities plus draft/update/filter value types
//! - `store`: the owning, persisted task collection with CRUD operations
//! - `queries`: read-only filtered and sorted views over the store

mod queries;
mod store;
mod task;

pub use store::{TaskStore, UNTITLED_TASK};
pub use task::{
    Subtask, SubtaskId, TagFilter, Task, TaskDraft, TaskId, TaskUpdate, end_of_day,
};
