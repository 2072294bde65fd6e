//! Urgency classification tests
mod common;

use common::{create_test_task, date, test_now, time};
use focus_tasks::UrgencyBand;
use focus_tasks::urgency::classify;

#[test]
fn test_dateless_task_is_never_overdue() {
    let task = create_test_task(1, "Someday", None);
    for day in 1..=28 {
        for hour in [0, 9, 23] {
            let now = date(2025, 2, day).and_hms_opt(hour, 30, 0).unwrap();
            let status = classify(&task, now);
            assert_eq!(status.status_text, "no date");
            assert!(!status.is_overdue);
        }
    }
}

#[test]
fn test_past_dates_are_overdue() {
    for back in 1..=40 {
        let due = test_now().date() - chrono::Duration::days(back);
        let status = classify(&create_test_task(1, "Late", Some(due)), test_now());
        assert!(status.is_overdue);
        assert_eq!(status.days_remaining, -back);
        assert_eq!(status.status_text, format!("overdue by {} days", back));
    }
}

#[test]
fn test_missed_at_time_today() {
    let mut task = create_test_task(1, "Standup", Some(date(2025, 3, 15)));
    task.time = Some(time(9, 0));
    let status = classify(&task, test_now());
    assert_eq!(status.status_text, "missed at 09:00");
    assert!(status.is_overdue);
    assert_eq!(UrgencyBand::for_task(&task, test_now()), UrgencyBand::Overdue);

    task.time = Some(time(16, 45));
    let status = classify(&task, test_now());
    assert_eq!(status.status_text, "due at 16:45");
    assert!(!status.is_overdue);
    assert_eq!(UrgencyBand::for_task(&task, test_now()), UrgencyBand::Today);
}

#[test]
fn test_midnight_truncation() {
    // 23:59 on the 15th versus the 16th is still one day away
    let late = date(2025, 3, 15).and_hms_opt(23, 59, 0).unwrap();
    let task = create_test_task(1, "Tomorrow", Some(date(2025, 3, 16)));
    assert_eq!(classify(&task, late).days_remaining, 1);
    assert_eq!(classify(&task, late).status_text, "1 days remaining");
}

#[test]
fn test_five_days_out_is_warning() {
    let task = create_test_task(1, "Report", Some(date(2025, 3, 20)));
    assert_eq!(UrgencyBand::for_task(&task, test_now()), UrgencyBand::Warning);
}

#[test]
fn test_band_boundaries() {
    let cases = [
        (3, UrgencyBand::Critical),
        (4, UrgencyBand::Warning),
        (9, UrgencyBand::Warning),
        (10, UrgencyBand::Safe),
        (21, UrgencyBand::Safe),
        (22, UrgencyBand::Distant),
    ];
    for (days, expected) in cases {
        let due = test_now().date() + chrono::Duration::days(days);
        let task = create_test_task(1, "Boundary", Some(due));
        assert_eq!(UrgencyBand::for_task(&task, test_now()), expected, "{} days", days);
    }
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
        }
        assert_eq!(
            UrgencyBand::from_parts(days, true, false, true),
            UrgencyBand::Overdue
        );
    }
}

#[test]
fn test_completing_overdue_event_changes_band() {
    let mut event = create_test_task(1, "Concert", Some(date(2025, 3, 13)));
    event.is_event = true;
    assert_eq!(UrgencyBand::for_task(&event, test_now()), UrgencyBand::Overdue);

    event.completed = true;
    assert_eq!(UrgencyBand::for_task(&event, test_now()), UrgencyBand::EventDone);
}

#[test]
fn test_band_names_parse_back() {
    for band in UrgencyBand::ALL {
        assert_eq!(band.as_str().parse::<UrgencyBand>().unwrap(), band);
    }
    assert!("red".parse::<UrgencyBand>().is_err());
}
