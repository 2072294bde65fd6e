//! Subtask handlers

use crate::TaskServerHandler;
use crate::tasks::{SubtaskId, TaskId};
use crate::validation::to_mcp_error;
use mcp_attr::Result as McpResult;

impl TaskServerHandler {
    pub async fn handle_add_subtask(&self, task_id: TaskId, title: String) -> McpResult<String> {
        let mut store = self.store.lock().unwrap();
        let subtask_id = store
            .add_subtask(task_id, title.trim())
            .map_err(to_mcp_error)?;
        let progress = store.get(task_id).map(|t| t.subtask_progress()).unwrap_or(0);
        drop(store);

        Ok(format!(
            "Subtask added with ID: {} (task {}, {}% done)",
            subtask_id, task_id, progress
        ))
    }

    pub async fn handle_toggle_subtask(
        &self,
        task_id: TaskId,
        subtask_id: SubtaskId,
    ) -> McpResult<String> {
        let mut store = self.store.lock().unwrap();
        let completed = store
            .toggle_subtask(task_id, subtask_id)
            .map_err(to_mcp_error)?;
        let progress = store.get(task_id).map(|t| t.subtask_progress()).unwrap_or(0);
        drop(store);

        let state = if completed { "completed" } else { "pending" };
        Ok(format!(
            "Subtask {} marked as {} (task {}, {}% done)",
            subtask_id, state, task_id, progress
        ))
    }

    pub async fn handle_delete_subtask(
        &self,
        task_id: TaskId,
        subtask_id: SubtaskId,
    ) -> McpResult<String> {
        let mut store = self.store.lock().unwrap();
        let removed = store
            .delete_subtask(task_id, subtask_id)
            .map_err(to_mcp_error)?;
        drop(store);

        Ok(format!(
            "Subtask {} deleted from task {}: {}",
            subtask_id, task_id, removed.title
        ))
    }
}
