//! Read-only views over the task store
//!
//! These derive the list, completed, per-tag and per-day subsets the
//! presentation layer renders. None of them mutate or persist anything.

use super::store::TaskStore;
use super::task::{TagFilter, Task};
use chrono::NaiveDate;

impl TaskStore {
    /// Distinct non-blank tags in order of first appearance
    pub fn available_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.tasks().iter().filter_map(Task::effective_tag) {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }
        tags
    }

    /// Pending tasks matching `filter`, earliest deadline first
    ///
    /// Tasks without a time sort as if due at 23:59:59; tasks without a date
    /// go last. The sort is stable, so ties keep insertion order.
    pub fn active_sorted(&self, filter: &TagFilter) -> Vec<&Task> {
        let mut active: Vec<&Task> = self
            .tasks()
            .iter()
            .filter(|t| !t.completed && t.matches_tag(filter))
            .collect();
        active.sort_by_key(|t| t.due_key());
        active
    }

    /// Completed tasks in insertion order
    pub fn completed(&self) -> Vec<&Task> {
        self.tasks().iter().filter(|t| t.completed).collect()
    }

    /// Tasks shown for a single calendar day
    ///
    /// Completed tasks are hidden unless they are events, which stay on the
    /// calendar after completion.
    pub fn day_tasks(&self, date: NaiveDate, filter: &TagFilter) -> Vec<&Task> {
        self.tasks()
            .iter()
            .filter(|t| t.date == Some(date) && t.matches_tag(filter) && t.is_visible_in_day_view())
            .collect()
    }
}
