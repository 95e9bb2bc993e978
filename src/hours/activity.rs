use chrono::{DateTime, Datelike, TimeZone, Timelike};

use super::{Day, WorkingHours};

/// True when `moment` falls inside any range of its weekday, both ends inclusive.
///
/// Times are compared as zero-padded `"HH:MM"` strings. That matches numeric
/// order only for two-digit hours; a stored `"8:00"` sorts after `"10:00"`.
pub fn is_active_at<Tz: TimeZone>(hours: &WorkingHours, moment: &DateTime<Tz>) -> bool {
    let day = Day::from(moment.weekday());
    let now = format!("{:02}:{:02}", moment.hour(), moment.minute());
    hours
        .ranges(day)
        .iter()
        .any(|range| range.start.as_str() <= now.as_str() && now.as_str() <= range.end.as_str())
}
