use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Day, WorkingHours};

/// One interval of a day, kept as the `"HH:MM"` strings it was given in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

impl TimeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Half-open intersection test. Ranges with unparseable endpoints never overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        let (Some(s1), Some(e1), Some(s2), Some(e2)) = (
            minutes_since_midnight(&self.start),
            minutes_since_midnight(&self.end),
            minutes_since_midnight(&other.start),
            minutes_since_midnight(&other.end),
        ) else {
            return false;
        };
        s1 < e2 && s2 < e1
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

/// Accepts `H:MM` or `HH:MM` with hour 0-23 and a two-digit minute 00-59.
pub fn is_valid_time_format(value: &str) -> bool {
    minutes_since_midnight(value).is_some()
}

/// Minutes since midnight for a well-formed time, `None` otherwise.
pub fn minutes_since_midnight(value: &str) -> Option<u16> {
    let (hour, minute) = value.split_once(':')?;
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    if !hour.bytes().chain(minute.bytes()).all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u16 = hour.parse().ok()?;
    let minute: u16 = minute.parse().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

/// Both ends well-formed and start strictly before end.
pub fn is_valid_time_range(start: &str, end: &str) -> bool {
    match (minutes_since_midnight(start), minutes_since_midnight(end)) {
        (Some(start), Some(end)) => start < end,
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Formato de hora inválido. Use HH:MM")]
    InvalidFormat,
    #[error("La hora de inicio debe ser menor que la hora de fin")]
    StartNotBeforeEnd,
    #[error("Este horario se solapa con uno existente")]
    Overlap { existing: TimeRange },
}

/// Checks a candidate range against the editing rules before it is added to `day`.
pub fn validate_new_range(
    hours: &WorkingHours,
    day: Day,
    start: &str,
    end: &str,
) -> Result<TimeRange, RangeError> {
    if !is_valid_time_format(start) || !is_valid_time_format(end) {
        return Err(RangeError::InvalidFormat);
    }
    if !is_valid_time_range(start, end) {
        return Err(RangeError::StartNotBeforeEnd);
    }
    let candidate = TimeRange::new(start, end);
    if let Some(existing) = hours
        .ranges(day)
        .iter()
        .find(|existing| candidate.overlaps(existing))
    {
        return Err(RangeError::Overlap {
            existing: existing.clone(),
        });
    }
    Ok(candidate)
}
