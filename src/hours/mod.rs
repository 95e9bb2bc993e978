//! Working-hours model: which days and time ranges a screen is running.
mod activity;
mod codec;
mod range;
mod schedule;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use activity::is_active_at;
pub use codec::{Decoded, DefaultReason, decode_lenient, json_string_to_working_hours};
pub use range::{RangeError, TimeRange, validate_new_range};
pub use schedule::WorkingHours;

/// The fixed day-keys of a working week, ordered Monday first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    /// Lowercase English key used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
            Day::Saturday => "saturday",
            Day::Sunday => "sunday",
        }
    }

    /// Spanish label shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Lunes",
            Day::Tuesday => "Martes",
            Day::Wednesday => "Miércoles",
            Day::Thursday => "Jueves",
            Day::Friday => "Viernes",
            Day::Saturday => "Sábado",
            Day::Sunday => "Domingo",
        }
    }

    pub fn from_key(key: &str) -> Option<Day> {
        Day::ALL.into_iter().find(|day| day.key() == key)
    }

    pub fn next(self) -> Day {
        Day::ALL[(self.index() + 1) % Day::ALL.len()]
    }

    pub fn prev(self) -> Day {
        Day::ALL[(self.index() + Day::ALL.len() - 1) % Day::ALL.len()]
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl From<chrono::Weekday> for Day {
    fn from(weekday: chrono::Weekday) -> Self {
        Day::ALL[weekday.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
