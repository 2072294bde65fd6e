//! Calendar month layout and per-day urgency aggregation

use crate::tasks::{TagFilter, Task, TaskStore};
use crate::urgency::{UrgencyBand, days_until};
use chrono::{Datelike, NaiveDate, NaiveDateTime};

/// Grid geometry of one month, weeks starting on Monday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthLayout {
    pub year: i32,
    /// 0-based month index (January = 0)
    pub month: u32,
    pub days_in_month: u32,
    /// Number of blank cells before day 1 (Monday = 0 .. Sunday = 6)
    pub start_day_of_week: u32,
}

impl MonthLayout {
    /// Layout for `year` and 0-based `month`, `None` when out of range
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if month > 11 {
            return None;
        }
        let first = NaiveDate::from_ymd_opt(year, month + 1, 1)?;
        let next_first = if month == 11 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?
        } else {
            NaiveDate::from_ymd_opt(year, month + 2, 1)?
        };
        let days_in_month = next_first.pred_opt()?.day();

        Some(Self {
            year,
            month,
            days_in_month,
            start_day_of_week: first.weekday().num_days_from_monday(),
        })
    }

    /// Layout of the month containing `date`
    pub fn containing(date: NaiveDate) -> Option<Self> {
        Self::new(date.year(), date.month0())
    }

    /// Month `offset` months away (negative goes back), `None` past chrono's range
    pub fn shifted(&self, offset: i32) -> Option<Self> {
        let index = i64::from(self.year) * 12 + i64::from(self.month) + i64::from(offset);
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        Self::new(year, index.rem_euclid(12) as u32)
    }

    pub fn next(&self) -> Option<Self> {
        self.shifted(1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.shifted(-1)
    }

    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        if day == 0 || day > self.days_in_month {
            return None;
        }
        NaiveDate::from_ymd_opt(self.year, self.month + 1, day)
    }

    /// Grid cells in display order: leading blanks, then day numbers
    pub fn cells(&self) -> impl Iterator<Item = Option<u32>> + '_ {
        (0..self.start_day_of_week)
            .map(|_| None)
            .chain((1..=self.days_in_month).map(Some))
    }
}

/// Marker drawn under a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayIndicator {
    /// No dot at all
    None,
    /// Every visible task is a completed event; muted, outside the urgency scale
    PastEvents,
    /// At least one pending task; colored by that day's urgency
    Urgency(UrgencyBand),
}

/// Aggregated view of one calendar cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub day: u32,
    pub task_count: usize,
    pub indicator: DayIndicator,
    /// Day number drawn bold (critical or overdue pending work)
    pub emphasized: bool,
    pub is_today: bool,
}

/// Indicator for a day's visible tasks
///
/// Pending tasks dominate: the color comes from the date alone, as if the day
/// held a single pending all-day task. A day holding only completed tasks
/// that are not all events gets no indicator; that cannot happen through
/// [`TaskStore::day_tasks`], which hides completed non-events, but callers
/// passing other task sets see it.
pub fn day_indicator(tasks: &[&Task], date: NaiveDate, now: NaiveDateTime) -> (DayIndicator, bool) {
    if tasks.is_empty() {
        return (DayIndicator::None, false);
    }

    if tasks.iter().all(|t| t.completed && t.is_event) {
        return (DayIndicator::PastEvents, false);
    }

    if tasks.iter().any(|t| !t.completed) {
        let diff = days_until(date, now);
        let band = UrgencyBand::from_parts(diff, diff < 0, false, false);
        return (DayIndicator::Urgency(band), band.is_alarming());
    }

    (DayIndicator::None, false)
}

/// Summarize a single day of the calendar
pub fn summarize_day(
    store: &TaskStore,
    date: NaiveDate,
    filter: &TagFilter,
    now: NaiveDateTime,
) -> DaySummary {
    let tasks = store.day_tasks(date, filter);
    let (indicator, emphasized) = day_indicator(&tasks, date, now);
    DaySummary {
        date,
        day: date.day(),
        task_count: tasks.len(),
        indicator,
        emphasized,
        is_today: date == now.date(),
    }
}

/// Summaries for every concrete day of the month, in day order
pub fn summarize_month(
    store: &TaskStore,
    layout: &MonthLayout,
    filter: &TagFilter,
    now: NaiveDateTime,
) -> Vec<DaySummary> {
    layout
        .cells()
        .flatten()
        .filter_map(|day| layout.date(day))
        .map(|date| summarize_day(store, date, filter, now))
        .collect()
}
