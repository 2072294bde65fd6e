//! Settings handler

use crate::TaskServerHandler;
use crate::formatting;
use crate::validation::to_mcp_error;
use mcp_attr::Result as McpResult;

impl TaskServerHandler {
    /// Show settings, optionally toggling dark mode or setting the session length first
    pub async fn handle_settings(
        &self,
        toggle_dark_mode: Option<bool>,
        work_minutes: Option<u32>,
    ) -> McpResult<String> {
        let mut settings = self.settings.lock().unwrap();
        if toggle_dark_mode.unwrap_or(false) {
            settings.toggle_dark_mode().map_err(to_mcp_error)?;
        }
        if let Some(minutes) = work_minutes {
            settings.set_work_minutes(minutes).map_err(to_mcp_error)?;
        }
        Ok(formatting::format_settings(
            settings.dark_mode(),
            settings.work_minutes(),
        ))
    }
}
