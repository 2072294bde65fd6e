//! Task CRUD handlers

use crate::TaskServerHandler;
use crate::tasks::{TaskDraft, TaskId, TaskUpdate};
use crate::validation::{self, to_mcp_error};
use mcp_attr::{Result as McpResult, bail_public};

impl TaskServerHandler {
    pub async fn handle_add_task(
        &self,
        title: String,
        date: String,
        time: Option<String>,
        tag: Option<String>,
        is_event: Option<bool>,
    ) -> McpResult<String> {
        let draft = TaskDraft {
            title: title.trim().to_string(),
            date: Some(validation::parse_date(&date)?),
            time: validation::parse_optional_time(time.as_deref())?,
            tag: validation::normalize_tag(tag),
            is_event: is_event.unwrap_or(false),
        };

        let mut store = self.store.lock().unwrap();
        let id = store.create(draft).map_err(to_mcp_error)?;
        drop(store);

        Ok(format!("Task created with ID: {}", id))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn handle_update_task(
        &self,
        id: TaskId,
        title: Option<String>,
        date: Option<String>,
        time: Option<String>,
        tag: Option<String>,
        is_event: Option<bool>,
        completed: Option<bool>,
    ) -> McpResult<String> {
        let update = TaskUpdate {
            title: title.map(|t| t.trim().to_string()),
            date: validation::parse_date_update(date.as_deref())?,
            time: validation::parse_time_update(time.as_deref())?,
            tag: validation::parse_tag_update(tag),
            is_event,
            completed,
            subtasks: None,
        };
        if update.is_empty() {
            bail_public!(_, "No fields to update for task {}", id);
        }

        let mut store = self.store.lock().unwrap();
        let task = store.update(id, update).map_err(to_mcp_error)?;
        let title = task.title.clone();
        drop(store);

        Ok(format!("Task {} updated: {}", id, title))
    }

    pub async fn handle_delete_task(&self, id: TaskId) -> McpResult<String> {
        let mut store = self.store.lock().unwrap();
        let removed = store.delete(id).map_err(to_mcp_error)?;
        drop(store);

        Ok(format!(
            "Task {} deleted: {} ({} subtask(s) removed)",
            id,
            removed.title,
            removed.subtasks.len()
        ))
    }

    pub async fn handle_toggle_task(&self, id: TaskId) -> McpResult<String> {
        let mut store = self.store.lock().unwrap();
        let completed = store.toggle_completed(id).map_err(to_mcp_error)?;
        drop(store);

        let state = if completed { "completed" } else { "pending" };
        Ok(format!("Task {} marked as {}", id, state))
    }
}
