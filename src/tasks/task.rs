use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time-derived task identifier (milliseconds since the Unix epoch at creation)
pub type TaskId = i64;

/// Subtask identifier, unique within its parent task
pub type SubtaskId = i64;

/// Time used to order tasks that have no time of day
pub fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default()
}

/// A single checklist step inside a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: SubtaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// A to-do item with an optional deadline
///
/// `date` absent means "no deadline"; `time` absent means "all day".
/// Tasks flagged `is_event` stay visible in day views after completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hhmm")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub is_event: bool,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Tag usable for filtering, `None` when missing or whitespace-only
    pub fn effective_tag(&self) -> Option<&str> {
        self.tag.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Whether the task passes the given tag filter
    pub fn matches_tag(&self, filter: &TagFilter) -> bool {
        match filter {
            TagFilter::All => true,
            TagFilter::Tag(tag) => self.tag.as_deref() == Some(tag.as_str()),
        }
    }

    /// Whether the task shows up in a day view: pending tasks always,
    /// completed tasks only when they are events
    pub fn is_visible_in_day_view(&self) -> bool {
        !self.completed || self.is_event
    }

    /// Ordering key for the active list: dateless tasks last, missing time
    /// counts as end of day
    pub fn due_key(&self) -> (bool, Option<NaiveDate>, NaiveTime) {
        (
            self.date.is_none(),
            self.date,
            self.time.unwrap_or_else(end_of_day),
        )
    }

    /// Completed subtasks as a rounded percentage, 0 without subtasks
    pub fn subtask_progress(&self) -> u8 {
        let total = self.subtasks.len();
        if total == 0 {
            return 0;
        }
        let done = self.subtasks.iter().filter(|s| s.completed).count();
        ((done as f64 / total as f64) * 100.0).round() as u8
    }

    pub fn find_subtask(&self, id: SubtaskId) -> Option<&Subtask> {
        self.subtasks.iter().find(|s| s.id == id)
    }

    pub(crate) fn find_subtask_mut(&mut self, id: SubtaskId) -> Option<&mut Subtask> {
        self.subtasks.iter_mut().find(|s| s.id == id)
    }
}

/// Fields for a new task
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub tag: Option<String>,
    pub is_event: bool,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            date: Some(date),
            ..Default::default()
        }
    }

    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn event(mut self) -> Self {
        self.is_event = true;
        self
    }
}

/// Partial update of a task
///
/// Only `Some` fields are applied. The nested options on `date`, `time` and
/// `tag` distinguish "leave unchanged" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub date: Option<Option<NaiveDate>>,
    pub time: Option<Option<NaiveTime>>,
    pub tag: Option<Option<String>>,
    pub is_event: Option<bool>,
    pub completed: Option<bool>,
    pub subtasks: Option<Vec<Subtask>>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.tag.is_none()
            && self.is_event.is_none()
            && self.completed.is_none()
            && self.subtasks.is_none()
    }

    pub(crate) fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(date) = self.date {
            task.date = date;
        }
        if let Some(time) = self.time {
            task.time = time;
        }
        if let Some(tag) = self.tag {
            task.tag = tag;
        }
        if let Some(is_event) = self.is_event {
            task.is_event = is_event;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        if let Some(subtasks) = self.subtasks {
            task.subtasks = subtasks;
        }
    }
}

/// Tag filter shared by the list, day and calendar views
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl FromStr for TagFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "" | "all" => TagFilter::All,
            tag => TagFilter::Tag(tag.to_string()),
        })
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagFilter::All => write!(f, "all"),
            TagFilter::Tag(tag) => write!(f, "{}", tag),
        }
    }
}

/// Serialize task times as `HH:MM`
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid time '{}', expected HH:MM", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: 1,
            title: "Write report".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 15),
            time: NaiveTime::from_hms_opt(9, 30, 0),
            tag: Some("Work".to_string()),
            completed: false,
            is_event: false,
            subtasks: vec![],
        }
    }

    #[test]
    fn test_effective_tag_ignores_whitespace() {
        let mut task = sample_task();
        assert_eq!(task.effective_tag(), Some("Work"));
        task.tag = Some("   ".to_string());
        assert_eq!(task.effective_tag(), None);
        task.tag = None;
        assert_eq!(task.effective_tag(), None);
    }

    #[test]
    fn test_matches_tag() {
        let task = sample_task();
        assert!(task.matches_tag(&TagFilter::All));
        assert!(task.matches_tag(&TagFilter::Tag("Work".to_string())));
        assert!(!task.matches_tag(&TagFilter::Tag("Home".to_string())));
    }

    #[test]
    fn test_tag_filter_parse() {
        assert_eq!("all".parse::<TagFilter>().unwrap(), TagFilter::All);
        assert_eq!("".parse::<TagFilter>().unwrap(), TagFilter::All);
        assert_eq!(
            "Home".parse::<TagFilter>().unwrap(),
            TagFilter::Tag("Home".to_string())
        );
    }

    #[test]
    fn test_day_view_visibility() {
        let mut task = sample_task();
        assert!(task.is_visible_in_day_view());
        task.completed = true;
        assert!(!task.is_visible_in_day_view());
        task.is_event = true;
        assert!(task.is_visible_in_day_view());
    }

    #[test]
    fn test_due_key_uses_end_of_day_for_all_day_tasks() {
        let mut task = sample_task();
        task.time = None;
        assert_eq!(task.due_key().2, end_of_day());

        let mut undated = sample_task();
        undated.date = None;
        assert!(task.due_key() < undated.due_key());
    }

    #[test]
    fn test_subtask_progress_rounds() {
        let mut task = sample_task();
        assert_eq!(task.subtask_progress(), 0);
        task.subtasks = vec![
            Subtask {
                id: 1,
                title: "a".to_string(),
                completed: true,
            },
            Subtask {
                id: 2,
                title: "b".to_string(),
                completed: false,
            },
            Subtask {
                id: 3,
                title: "c".to_string(),
                completed: false,
            },
        ];
        assert_eq!(task.subtask_progress(), 33);
        task.subtasks[1].completed = true;
        assert_eq!(task.subtask_progress(), 67);
    }

    #[test]
    fn test_task_time_serializes_as_hhmm() {
        let task = sample_task();
        let serialized = toml::to_string(&task).unwrap();
        assert!(serialized.contains("time = \"09:30\""));
        assert!(serialized.contains("date = \"2025-03-15\""));

        let deserialized: Task = toml::from_str(&serialized).unwrap();
        assert_eq!(task, deserialized);
    }

    #[test]
    fn test_task_defaults_when_fields_missing() {
        let toml_str = r#"
id = 5
title = "Bare task"
time = ""
"#;
        let task: Task = toml::from_str(toml_str).unwrap();
        assert_eq!(task.date, None);
        assert_eq!(task.time, None);
        assert!(!task.completed);
        assert!(!task.is_event);
        assert!(task.subtasks.is_empty());
    }

    #[test]
    fn test_update_applies_only_named_fields() {
        let mut task = sample_task();
        task.completed = true;
        let update = TaskUpdate {
            title: Some("Renamed".to_string()),
            tag: Some(None),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply_to(&mut task);

        assert_eq!(task.title, "Renamed");
        assert_eq!(task.tag, None);
        assert!(task.completed);
        assert_eq!(task.date, NaiveDate::from_ymd_opt(2025, 3, 15));
    }
}
