//! Urgency classification
//!
//! A task's deadline is compared against the current local wall-clock time to
//! produce a human status line and one of eight discrete urgency bands. The
//! bands drive color coding in both the list and the calendar views.

use crate::tasks::Task;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result of classifying a task's deadline against `now`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStatus {
    pub status_text: String,
    pub is_overdue: bool,
    pub days_remaining: i64,
}

/// Whole calendar days from `now`'s date to `date`
///
/// Both sides are truncated to midnight first, so crossing midnight changes
/// the result by exactly one regardless of the time of day.
pub fn days_until(date: NaiveDate, now: NaiveDateTime) -> i64 {
    date.signed_duration_since(now.date()).num_days()
}

/// Classify a task's deadline relative to `now`
pub fn classify(task: &Task, now: NaiveDateTime) -> TaskStatus {
    let Some(date) = task.date else {
        return TaskStatus {
            status_text: "no date".to_string(),
            is_overdue: false,
            days_remaining: 0,
        };
    };

    let days = days_until(date, now);

    if days < 0 {
        return TaskStatus {
            status_text: format!("overdue by {} days", days.abs()),
            is_overdue: true,
            days_remaining: days,
        };
    }

    if days == 0 {
        return match task.time {
            Some(time) => {
                let hhmm = time.format("%H:%M");
                if now > now.date().and_time(time) {
                    TaskStatus {
                        status_text: format!("missed at {}", hhmm),
                        is_overdue: true,
                        days_remaining: 0,
                    }
                } else {
                    TaskStatus {
                        status_text: format!("due at {}", hhmm),
                        is_overdue: false,
                        days_remaining: 0,
                    }
                }
            }
            None => TaskStatus {
                status_text: "due today".to_string(),
                is_overdue: false,
                days_remaining: 0,
            },
        };
    }

    TaskStatus {
        status_text: format!("{} days remaining", days),
        is_overdue: false,
        days_remaining: days,
    }
}

/// Discrete urgency classification
///
/// The tag set is part of the public contract; mapping a band to a color or
/// icon is left to whoever renders it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UrgencyBand {
    /// Completed event, kept visible in a muted style
    EventDone,
    Completed,
    Overdue,
    /// Due today and not yet missed
    Today,
    /// 1 to 3 days left
    Critical,
    /// 4 to 9 days left
    Warning,
    /// 10 to 21 days left
    Safe,
    /// 22 or more days left
    Distant,
}

impl UrgencyBand {
    pub const ALL: [UrgencyBand; 8] = [
        UrgencyBand::EventDone,
        UrgencyBand::Completed,
        UrgencyBand::Overdue,
        UrgencyBand::Today,
        UrgencyBand::Critical,
        UrgencyBand::Warning,
        UrgencyBand::Safe,
        UrgencyBand::Distant,
    ];

    /// Pick the band for a classified deadline
    ///
    /// Rules are evaluated in order and the first match wins: completed
    /// events, completed, overdue, then the day-count ranges.
    pub fn from_parts(
        days_remaining: i64,
        is_overdue: bool,
        is_completed: bool,
        is_event: bool,
    ) -> Self {
        if is_completed && is_event {
            UrgencyBand::EventDone
        } else if is_completed {
            UrgencyBand::Completed
        } else if is_overdue {
            UrgencyBand::Overdue
        } else if days_remaining == 0 {
            UrgencyBand::Today
        } else if (1..=3).contains(&days_remaining) {
            UrgencyBand::Critical
        } else if (4..=9).contains(&days_remaining) {
            UrgencyBand::Warning
        } else if (10..=21).contains(&days_remaining) {
            UrgencyBand::Safe
        } else {
            UrgencyBand::Distant
        }
    }

    /// Classify `task` and derive its band in one step
    pub fn for_task(task: &Task, now: NaiveDateTime) -> Self {
        let status = classify(task, now);
        Self::from_parts(
            status.days_remaining,
            status.is_overdue,
            task.completed,
            task.is_event,
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyBand::EventDone => "event-done",
            UrgencyBand::Completed => "completed",
            UrgencyBand::Overdue => "overdue",
            UrgencyBand::Today => "today",
            UrgencyBand::Critical => "critical",
            UrgencyBand::Warning => "warning",
            UrgencyBand::Safe => "safe",
            UrgencyBand::Distant => "distant",
        }
    }

    /// Bands that get an emphasized day number in the calendar
    pub fn is_alarming(&self) -> bool {
        matches!(self, UrgencyBand::Critical | UrgencyBand::Overdue)
    }
}

impl fmt::Display for UrgencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UrgencyBand::ALL
            .into_iter()
            .find(|band| band.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid urgency band '{}'. Valid options are: event-done, completed, overdue, today, critical, warning, safe, distant",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn task_on(date: Option<NaiveDate>, time: Option<NaiveTime>) -> Task {
        Task {
            id: 1,
            title: "Task".to_string(),
            date,
            time,
            tag: None,
            completed: false,
            is_event: false,
            subtasks: vec![],
        }
    }

    #[test]
    fn test_no_date_is_never_urgent() {
        let task = task_on(None, None);
        for now in [at(2020, 1, 1, 0, 0), at(2025, 6, 30, 23, 59), at(2030, 12, 31, 12, 0)] {
            let status = classify(&task, now);
            assert_eq!(status.status_text, "no date");
            assert!(!status.is_overdue);
            assert_eq!(status.days_remaining, 0);
        }
    }

    #[test]
    fn test_past_dates_are_overdue() {
        let now = at(2025, 3, 15, 0, 1);
        for back in 1..40 {
            let date = now.date() - Duration::days(back);
            let status = classify(&task_on(Some(date), None), now);
            assert!(status.is_overdue);
            assert_eq!(status.days_remaining, -back);
            assert_eq!(status.status_text, format!("overdue by {} days", back));
        }
    }

    #[test]
    fn test_day_count_uses_calendar_days() {
        let tomorrow = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();
        // One minute before midnight is still a full calendar day away
        assert_eq!(days_until(tomorrow, at(2025, 3, 15, 23, 59)), 1);
        assert_eq!(days_until(tomorrow, at(2025, 3, 15, 0, 0)), 1);
        assert_eq!(days_until(tomorrow, at(2025, 3, 16, 0, 0)), 0);
    }

    #[test]
    fn test_missed_time_today() {
        let now = at(2025, 3, 15, 10, 0);
        let task = task_on(Some(now.date()), NaiveTime::from_hms_opt(9, 0, 0));
        let status = classify(&task, now);
        assert_eq!(status.status_text, "missed at 09:00");
        assert!(status.is_overdue);
        assert_eq!(status.days_remaining, 0);
        assert_eq!(UrgencyBand::for_task(&task, now), UrgencyBand::Overdue);
    }

    #[test]
    fn test_upcoming_time_today() {
        let now = at(2025, 3, 15, 8, 15);
        let task = task_on(Some(now.date()), NaiveTime::from_hms_opt(9, 0, 0));
        let status = classify(&task, now);
        assert_eq!(status.status_text, "due at 09:00");
        assert!(!status.is_overdue);
        assert_eq!(UrgencyBand::for_task(&task, now), UrgencyBand::Today);
    }

    #[test]
    fn test_exact_due_minute_is_not_missed() {
        let now = at(2025, 3, 15, 9, 0);
        let task = task_on(Some(now.date()), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(classify(&task, now).status_text, "due at 09:00");
    }

    #[test]
    fn test_all_day_today() {
        let now = at(2025, 3, 15, 23, 0);
        let status = classify(&task_on(Some(now.date()), None), now);
        assert_eq!(status.status_text, "due today");
        assert!(!status.is_overdue);
    }

    #[test]
    fn test_future_days_remaining() {
        let now = at(2025, 3, 15, 12, 0);
        let task = task_on(NaiveDate::from_ymd_opt(2025, 3, 20), None);
        let status = classify(&task, now);
        assert_eq!(status.status_text, "5 days remaining");
        assert_eq!(status.days_remaining, 5);
        assert_eq!(UrgencyBand::for_task(&task, now), UrgencyBand::Warning);
    }

    #[test]
    fn test_band_ranges() {
        let cases = [
            (0, UrgencyBand::Today),
            (1, UrgencyBand::Critical),
            (3, UrgencyBand::Critical),
            (4, UrgencyBand::Warning),
            (9, UrgencyBand::Warning),
            (10, UrgencyBand::Safe),
            (21, UrgencyBand::Safe),
            (22, UrgencyBand::Distant),
            (365, UrgencyBand::Distant),
        ];
        for (days, expected) in cases {
            assert_eq!(UrgencyBand::from_parts(days, false, false, false), expected);
        }
    }

    #[test]
    fn test_negative_days_without_overdue_flag_is_distant() {
        assert_eq!(
            UrgencyBand::from_parts(-3, false, false, false),
            UrgencyBand::Distant
        );
    }

    #[test]
    fn test_band_precedence() {
        for days in [-5, 0, 2, 30] {
            for overdue in [false, true] {
                assert_eq!(
                    UrgencyBand::from_parts(days, overdue, true, true),
                    UrgencyBand::EventDone
                );
                assert_eq!(
                    UrgencyBand::from_parts(days, overdue, true, false),
                    UrgencyBand::Completed
                );
                for event in [false, true] {
                    if overdue {
                        assert_eq!(
                            UrgencyBand::from_parts(days, overdue, false, event),
                            UrgencyBand::Overdue
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_overdue_event_becomes_event_done_when_completed() {
        let now = at(2025, 3, 15, 12, 0);
        let mut task = task_on(NaiveDate::from_ymd_opt(2025, 3, 13), None);
        task.is_event = true;
        assert_eq!(UrgencyBand::for_task(&task, now), UrgencyBand::Overdue);

        task.completed = true;
        assert_eq!(UrgencyBand::for_task(&task, now), UrgencyBand::EventDone);
    }

    #[test]
    fn test_band_tags() {
        for band in UrgencyBand::ALL {
            assert_eq!(band.as_str().parse::<UrgencyBand>().unwrap(), band);
            assert_eq!(band.to_string(), band.as_str());
        }
        assert!("urgent".parse::<UrgencyBand>().is_err());
        assert!(UrgencyBand::Critical.is_alarming());
        assert!(UrgencyBand::Overdue.is_alarming());
        assert!(!UrgencyBand::Today.is_alarming());
    }
}
