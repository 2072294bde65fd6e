//! Read-only list, day and calendar views

use crate::TaskServerHandler;
use crate::calendar::{self, MonthLayout};
use crate::formatting;
use crate::validation::{self, invalid_params};
use mcp_attr::Result as McpResult;

impl TaskServerHandler {
    /// Active tasks by deadline, or completed tasks when `completed` is set
    pub async fn handle_list(
        &self,
        tag: Option<String>,
        completed: Option<bool>,
    ) -> McpResult<String> {
        let filter = validation::parse_tag_filter(tag.as_deref());
        let now = self.clock.now();

        let store = self.store.lock().unwrap();
        if completed.unwrap_or(false) {
            let tasks = store.completed();
            return Ok(formatting::format_task_list("Completed tasks", &tasks, now));
        }
        let tasks = store.active_sorted(&filter);
        let heading = format!("Active tasks [{}]", filter);
        Ok(formatting::format_task_list(&heading, &tasks, now))
    }

    pub async fn handle_tags(&self) -> McpResult<String> {
        let store = self.store.lock().unwrap();
        let tags = store.available_tags();
        drop(store);
        Ok(formatting::format_tags(&tags))
    }

    pub async fn handle_day(&self, date: Option<String>, tag: Option<String>) -> McpResult<String> {
        let now = self.clock.now();
        let date = match date.as_deref().map(str::trim) {
            None | Some("") => now.date(),
            Some(s) => validation::parse_date(s)?,
        };
        let filter = validation::parse_tag_filter(tag.as_deref());

        let store = self.store.lock().unwrap();
        let tasks = store.day_tasks(date, &filter);
        Ok(formatting::format_day(date, &tasks, now))
    }

    /// Month grid for `month` (default: the current month), moved by `offset` months
    pub async fn handle_calendar(
        &self,
        month: Option<String>,
        offset: Option<i32>,
        tag: Option<String>,
    ) -> McpResult<String> {
        let now = self.clock.now();
        let base = match month.as_deref().map(str::trim) {
            None | Some("") => MonthLayout::containing(now.date()),
            Some(s) => Some(validation::parse_month(s)?),
        };
        let layout = base
            .and_then(|l| l.shifted(offset.unwrap_or(0)))
            .ok_or_else(|| invalid_params("Month is out of range"))?;
        let filter = validation::parse_tag_filter(tag.as_deref());

        let store = self.store.lock().unwrap();
        let days = calendar::summarize_month(&store, &layout, &filter, now);
        drop(store);

        Ok(formatting::format_calendar(&layout, &days))
    }
}
