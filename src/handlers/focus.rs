//! Focus timer handlers
//!
//! Every mutation ends with [`TaskServerHandler::sync_ticker`], which keeps
//! the one-second tick source running exactly while the timer is ticking.

use crate::TaskServerHandler;
use crate::formatting;
use crate::tasks::TaskId;
use crate::validation::to_mcp_error;
use mcp_attr::{Result as McpResult, bail_public};

impl TaskServerHandler {
    /// Current focus screen with the active task's title
    pub async fn handle_focus_status(&self) -> McpResult<String> {
        Ok(self.focus_status_text())
    }

    /// Render the focus screen without holding any lock past the call
    fn focus_status_text(&self) -> String {
        let state = self.focus.lock().unwrap().state().clone();
        let work_minutes = self.settings.lock().unwrap().work_minutes();
        let title = {
            let store = self.store.lock().unwrap();
            store.title_of(state.active_task_id).to_string()
        };
        formatting::format_focus(&state, &title, work_minutes)
    }

    pub async fn handle_focus_select(&self, task_id: Option<TaskId>) -> McpResult<String> {
        if let Some(id) = task_id {
            let store = self.store.lock().unwrap();
            if store.get(id).is_none() {
                drop(store);
                bail_public!(_, "Task {} not found", id);
            }
        }

        let changed = self.focus.lock().unwrap().select_task(task_id).map_err(to_mcp_error)?;
        if !changed {
            bail_public!(_, "Cannot change the focused task while a session is active");
        }

        let store = self.store.lock().unwrap();
        Ok(format!("Focus task: {}", store.title_of(task_id)))
    }

    /// Start a session; `work_minutes` also becomes the saved default
    pub async fn handle_focus_start(
        &self,
        task_id: Option<TaskId>,
        work_minutes: Option<u32>,
    ) -> McpResult<String> {
        let fallback = {
            let store = self.store.lock().unwrap();
            if let Some(id) = task_id
                && store.get(id).is_none()
            {
                bail_public!(_, "Task {} not found", id);
            }
            store.first_incomplete().map(|t| t.id)
        };

        let minutes = match work_minutes {
            Some(m) => m,
            None => self.settings.lock().unwrap().work_minutes(),
        };

        self.focus
            .lock()
            .unwrap()
            .start_session(minutes, task_id, fallback)
            .map_err(to_mcp_error)?;
        self.sync_ticker();

        if work_minutes.is_some() {
            let mut settings = self.settings.lock().unwrap();
            settings.set_work_minutes(minutes).map_err(to_mcp_error)?;
        }

        Ok(self.focus_status_text())
    }

    pub async fn handle_focus_toggle(&self) -> McpResult<String> {
        let changed = self.focus.lock().unwrap().toggle_run().map_err(to_mcp_error)?;
        if !changed {
            bail_public!(_, "No focus session is active");
        }

        self.sync_ticker();
        Ok(self.focus_status_text())
    }

    pub async fn handle_focus_switch(&self) -> McpResult<String> {
        let changed = self.focus.lock().unwrap().switch_mode().map_err(to_mcp_error)?;
        if !changed {
            bail_public!(_, "No focus session is active");
        }

        self.sync_ticker();
        Ok(self.focus_status_text())
    }

    /// Leave the session; only acts when `confirm` is true
    pub async fn handle_focus_stop(&self, confirm: Option<bool>) -> McpResult<String> {
        if !self.focus.lock().unwrap().state().is_session_active {
            return Ok("No focus session is active".to_string());
        }

        if !confirm.unwrap_or(false) {
            return Ok("Stopping ends the current session. Call focus_stop again with confirm=true to stop.".to_string());
        }

        self.focus.lock().unwrap().stop_session().map_err(to_mcp_error)?;
        self.sync_ticker();
        Ok("Focus session stopped".to_string())
    }
}
