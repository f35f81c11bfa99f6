//! Report time-window arithmetic.
//!
//! Windows are epoch-millisecond bounds anchored to a fixed UTC+7 business
//! day: a reporting day runs from 08:31 on one calendar day to 08:30 on the
//! next. The offset never shifts, so no timezone database is involved; all
//! chrono arithmetic here is the infallible kind.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

/// Report offset east of UTC, in seconds.
const REPORT_OFFSET_SECS: i64 = 7 * 3600;
/// Wall-clock start of a reporting day, minutes after midnight (08:31).
const WINDOW_START_MINUTE: i64 = 8 * 60 + 31;
/// Wall-clock end of a reporting day, minutes after midnight (08:30).
const WINDOW_END_MINUTE: i64 = 8 * 60 + 30;

/// Calendar-date range taken from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Resolved fetch window; construction guarantees `start_ms < end_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

#[derive(Debug)]
pub enum WindowError {
    /// The resolved bounds collapse or invert.
    Empty { start_ms: i64, end_ms: i64 },
}

impl fmt::Display for WindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { start_ms, end_ms } => write!(
                f,
                "window start {start_ms} is not before end {end_ms}; the start date must precede the end date"
            ),
        }
    }
}

impl std::error::Error for WindowError {}

/// Resolve the fetch window.
///
/// With an explicit range the window spans `start` at 08:31 through `end`
/// at 08:30, both UTC+7. Without one it covers the previous UTC+7 calendar
/// day's 08:31 through the current day's 08:30, relative to `now`.
///
/// # Errors
///
/// Returns [`WindowError::Empty`] when the resolved start does not precede
/// the end. Equal dates hit this: 08:31 is not before 08:30 on the same
/// day.
pub fn resolve(range: Option<&DateRange>, now: DateTime<Utc>) -> Result<TimeWindow, WindowError> {
    let (start_ms, end_ms) = match range {
        Some(range) => (
            offset_epoch_ms(range.start, WINDOW_START_MINUTE),
            offset_epoch_ms(range.end, WINDOW_END_MINUTE),
        ),
        None => {
            let today = current_report_date(now);
            (
                offset_epoch_ms(today - TimeDelta::days(1), WINDOW_START_MINUTE),
                offset_epoch_ms(today, WINDOW_END_MINUTE),
            )
        }
    };

    if start_ms >= end_ms {
        return Err(WindowError::Empty { start_ms, end_ms });
    }
    Ok(TimeWindow { start_ms, end_ms })
}

/// Calendar date at the report offset for the given instant.
pub fn current_report_date(now: DateTime<Utc>) -> NaiveDate {
    (now + TimeDelta::seconds(REPORT_OFFSET_SECS)).date_naive()
}

/// Epoch milliseconds of `date` at the given wall-clock minute in the
/// report offset. A UTC+7 wall time is its UTC reading minus the offset.
fn offset_epoch_ms(date: NaiveDate, minute_of_day: i64) -> i64 {
    let wall = date.and_time(NaiveTime::MIN) + TimeDelta::minutes(minute_of_day);
    wall.and_utc().timestamp_millis() - REPORT_OFFSET_SECS * 1000
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap().and_utc()
    }

    #[test]
    fn explicit_range_resolves_to_known_epochs() {
        let range = DateRange {
            start: date(2024, 1, 1),
            end: date(2024, 1, 2),
        };
        let window = resolve(Some(&range), utc(2024, 6, 1, 0, 0)).unwrap();
        // 2024-01-01T08:31+07:00 and 2024-01-02T08:30+07:00
        assert_eq!(window.start_ms, 1_704_072_660_000);
        assert_eq!(window.end_ms, 1_704_159_000_000);
    }

    #[test]
    fn default_window_covers_previous_business_day() {
        // 12:00 UTC is 19:00 UTC+7, still 2024-01-01 there.
        let window = resolve(None, utc(2024, 1, 1, 12, 0)).unwrap();
        assert_eq!(window.start_ms, 1_703_986_260_000); // 2023-12-31T08:31+07
        assert_eq!(window.end_ms, 1_704_072_600_000); // 2024-01-01T08:30+07
    }

    #[test]
    fn default_window_matches_explicit_range_for_the_same_day() {
        let now = utc(2024, 1, 1, 12, 0);
        let range = DateRange {
            start: date(2023, 12, 31),
            end: date(2024, 1, 1),
        };
        assert_eq!(resolve(None, now).unwrap(), resolve(Some(&range), now).unwrap());
    }

    #[test]
    fn report_date_rolls_over_before_utc_does() {
        // 17:00 UTC on Jan 1 is already 00:00 Jan 2 at UTC+7.
        assert_eq!(current_report_date(utc(2024, 1, 1, 17, 0)), date(2024, 1, 2));
        assert_eq!(current_report_date(utc(2024, 1, 1, 16, 59)), date(2024, 1, 1));
    }

    #[test]
    fn equal_dates_are_an_empty_window() {
        let range = DateRange {
            start: date(2024, 1, 1),
            end: date(2024, 1, 1),
        };
        let err = resolve(Some(&range), utc(2024, 6, 1, 0, 0)).unwrap_err();
        assert!(matches!(err, WindowError::Empty { .. }));
        assert!(err.to_string().contains("must precede"));
    }

    #[test]
    fn inverted_dates_are_an_empty_window() {
        let range = DateRange {
            start: date(2024, 1, 2),
            end: date(2024, 1, 1),
        };
        let err = resolve(Some(&range), utc(2024, 6, 1, 0, 0)).unwrap_err();
        assert!(matches!(err, WindowError::Empty { .. }));
    }

    #[test]
    fn window_spans_month_boundaries() {
        let range = DateRange {
            start: date(2024, 2, 28),
            end: date(2024, 3, 1),
        };
        let window = resolve(Some(&range), utc(2024, 6, 1, 0, 0)).unwrap();
        // 2024 is a leap year: two full days plus the 08:31→08:30 offset.
        assert_eq!(window.end_ms - window.start_ms, 2 * 86_400_000 - 60_000);
    }
}
