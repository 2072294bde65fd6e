//! Parameter parsing for MCP tools
//!
//! Tool arguments arrive as strings; these helpers turn them into domain
//! values and report bad input as `INVALID_PARAMS` with a message the client
//! can show.

use crate::calendar::MonthLayout;
use crate::error::TaskError;
use crate::tasks::TagFilter;
#[cfg(test)]
use crate::tasks::TaskId;
use chrono::{NaiveDate, NaiveTime};
use mcp_attr::Result as McpResult;

/// Build an error whose message is shown to the client
pub fn invalid_params(message: impl Into<String>) -> mcp_attr::Error {
    mcp_attr::Error::new(mcp_attr::ErrorCode::INVALID_PARAMS).with_message(message.into(), true)
}

/// Map a domain error to an MCP error
///
/// Bad input and missing ids are the caller's fault and reported as
/// `INVALID_PARAMS`; storage failures and id exhaustion stay internal errors
/// but keep their message visible.
pub fn to_mcp_error(err: TaskError) -> mcp_attr::Error {
    match err {
        TaskError::Storage(_) | TaskError::IdsExhausted => mcp_attr::Error::new(mcp_attr::ErrorCode::INTERNAL_ERROR)
            .with_message(err.to_string(), true),
        _ => invalid_params(err.to_string()),
    }
}

/// Parse a required date parameter
///
/// # Arguments
/// * `date_str` - Date string in YYYY-MM-DD format
///
/// # Returns
/// Result containing parsed NaiveDate or an `INVALID_PARAMS` error
pub fn parse_date(date_str: &str) -> McpResult<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|_| {
        invalid_params(format!(
            "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2025-03-15')",
            date_str
        ))
    })
}

/// Parse a required time in `HH:MM` format
pub fn parse_time(time_str: &str) -> McpResult<NaiveTime> {
    NaiveTime::parse_from_str(time_str.trim(), "%H:%M").map_err(|_| {
        invalid_params(format!(
            "Invalid time format '{}'. Use HH:MM (e.g., '09:30')",
            time_str
        ))
    })
}

/// Parse an optional time for task creation; empty means all day
pub fn parse_optional_time(time: Option<&str>) -> McpResult<Option<NaiveTime>> {
    match time.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_time(s).map(Some),
    }
}

/// Optional tag for task creation; blank tags are dropped
pub fn normalize_tag(tag: Option<String>) -> Option<String> {
    tag.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Parse the date field of an update
///
/// # Arguments
/// * `date` - `None` keeps the current date, `""` clears it, anything else
///   must be YYYY-MM-DD
///
/// # Returns
/// `None` for no change, `Some(None)` to clear, `Some(Some(date))` to set
pub fn parse_date_update(date: Option<&str>) -> McpResult<Option<Option<NaiveDate>>> {
    match date.map(str::trim) {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(s) => parse_date(s).map(|d| Some(Some(d))),
    }
}

/// Update semantics for a time: absent keeps, `""` clears, otherwise parse
pub fn parse_time_update(time: Option<&str>) -> McpResult<Option<Option<NaiveTime>>> {
    match time.map(str::trim) {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(s) => parse_time(s).map(|t| Some(Some(t))),
    }
}

/// Update semantics for a tag: absent keeps, blank clears
pub fn parse_tag_update(tag: Option<String>) -> Option<Option<String>> {
    tag.map(|t| normalize_tag(Some(t)))
}

/// Parse the tag filter used by list, day and calendar
///
/// # Arguments
/// * `tag` - Tag name; missing, empty and `all` select every task
pub fn parse_tag_filter(tag: Option<&str>) -> TagFilter {
    match tag.map(str::trim) {
        None => TagFilter::All,
        Some(s) => s.parse().unwrap_or_default(),
    }
}

/// Parse a month parameter
///
/// # Arguments
/// * `month_str` - Month string in YYYY-MM format, month 01 to 12
///
/// # Returns
/// Result containing the month's layout or an `INVALID_PARAMS` error
pub fn parse_month(month_str: &str) -> McpResult<MonthLayout> {
    let invalid = || {
        invalid_params(format!(
            "Invalid month format '{}'. Use YYYY-MM (e.g., '2025-03')",
            month_str
        ))
    };
    let (year, month) = month_str.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    MonthLayout::new(year, month - 1).ok_or_else(invalid)
}

#[cfg(test)]
/// Extract the numeric id from a tool response
///
/// Response format: "Task created with ID: <id>"
pub fn extract_id_from_response(response: &str) -> TaskId {
    response
        .split("ID: ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|id| id.trim_end_matches(')').parse().ok())
        .unwrap_or_default()
}
