//! Text rendering for tool responses
//!
//! The MCP client gets plain text. Each task line carries the urgency band
//! name so a client can map it to its own colors.

use crate::calendar::{DayIndicator, DaySummary, MonthLayout};
use crate::focus::{FocusMode, FocusState, rest_minutes_for};
use crate::tasks::Task;
use crate::urgency::{UrgencyBand, classify};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Seconds as zero-padded `MM:SS`; minutes are not wrapped into hours
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

fn percent(fraction: f64) -> u32 {
    (fraction * 100.0).round() as u32
}

/// Format one task for list and day views
///
/// # Arguments
/// * `task` - Task to format
/// * `now` - Current local time, used for the urgency status
///
/// # Returns
/// A header line with id, title and band, followed by indented detail lines
pub fn format_task(task: &Task, now: NaiveDateTime) -> String {
    let status = classify(task, now);
    let band = UrgencyBand::for_task(task, now);
    let check = if task.completed { "x" } else { " " };

    let mut out = format!(
        "- [{}] {} (id: {}, {}: {})\n",
        check, task.title, task.id, band, status.status_text
    );

    if let Some(date) = task.date {
        match task.time {
            Some(time) => {
                let _ = writeln!(out, "  Due: {} {}", date, time.format("%H:%M"));
            }
            None => {
                let _ = writeln!(out, "  Due: {} (all day)", date);
            }
        }
    }
    if let Some(tag) = task.effective_tag() {
        let _ = writeln!(out, "  Tag: {}", tag);
    }
    if task.is_event {
        out.push_str("  Event\n");
    }
    if !task.subtasks.is_empty() {
        let done = task.subtasks.iter().filter(|s| s.completed).count();
        let _ = writeln!(
            out,
            "  Subtasks: {}/{} ({}%)",
            done,
            task.subtasks.len(),
            task.subtask_progress()
        );
        for sub in &task.subtasks {
            let mark = if sub.completed { "x" } else { " " };
            let _ = writeln!(out, "    - [{}] {} (id: {})", mark, sub.title, sub.id);
        }
    }
    out
}

/// A titled list of tasks, or a notice when there are none
pub fn format_task_list(heading: &str, tasks: &[&Task], now: NaiveDateTime) -> String {
    if tasks.is_empty() {
        return format!("{}: no tasks", heading);
    }
    let mut out = format!("{} ({}):\n\n", heading, tasks.len());
    for task in tasks {
        out.push_str(&format_task(task, now));
    }
    out
}

pub fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return "No tags yet".to_string();
    }
    format!("Tags: {}", tags.join(", "))
}

/// Tasks of one day, preceded by the date
pub fn format_day(date: NaiveDate, tasks: &[&Task], now: NaiveDateTime) -> String {
    let heading = if date == now.date() {
        format!("{} (today)", date)
    } else {
        date.to_string()
    };
    format_task_list(&heading, tasks, now)
}

fn indicator_label(indicator: DayIndicator) -> Option<&'static str> {
    match indicator {
        DayIndicator::None => None,
        DayIndicator::PastEvents => Some("past events"),
        DayIndicator::Urgency(band) => Some(band.as_str()),
    }
}

/// Month grid followed by the days that have tasks
///
/// Grid markers: `!` critical or overdue, `*` other days with an indicator,
/// `<` today without tasks.
pub fn format_calendar(layout: &MonthLayout, days: &[DaySummary]) -> String {
    let name = MONTH_NAMES.get(layout.month as usize).copied().unwrap_or("?");
    let mut out = format!("{} {}\n", name, layout.year);
    out.push_str("Mo  Tu  We  Th  Fr  Sa  Su\n");

    for (i, cell) in layout.cells().enumerate() {
        let text = match cell.and_then(|day| days.iter().find(|d| d.day == day)) {
            None => "    ".to_string(),
            Some(summary) => {
                let marker = if summary.emphasized {
                    '!'
                } else if summary.indicator != DayIndicator::None {
                    '*'
                } else if summary.is_today {
                    '<'
                } else {
                    ' '
                };
                format!("{:>2}{} ", summary.day, marker)
            }
        };
        out.push_str(&text);
        if i % 7 == 6 {
            out.truncate(out.trim_end().len());
            out.push('\n');
        }
    }
    out.truncate(out.trim_end().len());
    out.push('\n');

    let busy: Vec<&DaySummary> = days.iter().filter(|d| d.task_count > 0).collect();
    if busy.is_empty() {
        out.push_str("\nNo tasks this month\n");
        return out;
    }
    out.push('\n');
    for day in busy {
        let _ = write!(out, "{}: {} task(s)", day.date, day.task_count);
        if let Some(label) = indicator_label(day.indicator) {
            let _ = write!(out, ", {}", label);
        }
        if day.is_today {
            out.push_str(" (today)");
        }
        out.push('\n');
    }
    out
}

/// Focus timer screen
///
/// # Arguments
/// * `state` - Current focus state
/// * `task_title` - Title of the active task, or the placeholder
/// * `work_minutes` - Default session length shown in the setup preview
///
/// # Returns
/// The setup preview when no session is active, otherwise both countdowns
/// with their `MM:SS` clocks and progress
pub fn format_focus(state: &FocusState, task_title: &str, work_minutes: u32) -> String {
    if !state.is_session_active {
        return format!(
            "Focus: setup\nTask: {}\nNext session: {} min work / {} min rest\n",
            task_title,
            work_minutes,
            rest_minutes_for(work_minutes)
        );
    }

    let run_state = if state.is_running {
        "running"
    } else if state.remaining() == 0 {
        "finished"
    } else {
        "paused"
    };
    let mode = match state.mode {
        FocusMode::Work => "work",
        FocusMode::Rest => "rest",
    };

    format!(
        "Focus: {} ({})\nTask: {}\nWork: {} / {} ({}%)\nRest: {} / {} ({}%)\n",
        mode,
        run_state,
        task_title,
        format_clock(state.work_left),
        format_clock(state.initial_work),
        percent(state.work_progress()),
        format_clock(state.rest_left),
        format_clock(state.initial_rest),
        percent(state.rest_progress()),
    )
}

pub fn format_settings(dark_mode: bool, work_minutes: u32) -> String {
    format!(
        "Dark mode: {}\nWork minutes: {}\nRest minutes: {}\n",
        if dark_mode { "on" } else { "off" },
        work_minutes,
        rest_minutes_for(work_minutes)
    )
}
