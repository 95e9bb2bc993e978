use super::{Day, TimeRange, WorkingHours};

/// Why a lenient decode fell back to the empty mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultReason {
    Missing,
    Malformed,
    NotAnObject,
}

/// Outcome of [`decode_lenient`]. Both variants are successes; `Defaulted`
/// stands for the empty mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decoded {
    Parsed(WorkingHours),
    Defaulted(DefaultReason),
}

impl Decoded {
    pub fn into_hours(self) -> WorkingHours {
        match self {
            Decoded::Parsed(hours) => hours,
            Decoded::Defaulted(_) => WorkingHours::default(),
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Decoded::Defaulted(_))
    }
}

impl WorkingHours {
    /// Canonical JSON object, days in week order, absent days omitted.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Best-effort decode of a `rules` string. Never fails: missing, malformed or
/// non-object input decodes to the empty mapping. Unknown day keys are skipped.
pub fn decode_lenient(raw: Option<&str>) -> Decoded {
    let raw = match raw {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Decoded::Defaulted(DefaultReason::Missing),
    };
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!("working hours not valid json: {err}");
            return Decoded::Defaulted(DefaultReason::Malformed);
        }
    };
    let serde_json::Value::Object(entries) = value else {
        tracing::debug!("working hours json is not an object");
        return Decoded::Defaulted(DefaultReason::NotAnObject);
    };
    let mut days = Vec::with_capacity(entries.len());
    for (key, ranges) in entries {
        let Some(day) = Day::from_key(&key) else {
            tracing::debug!("skipping unknown working hours key '{key}'");
            continue;
        };
        match serde_json::from_value::<Vec<TimeRange>>(ranges) {
            Ok(ranges) => days.push((day, ranges)),
            Err(err) => {
                tracing::debug!("working hours for '{key}' malformed: {err}");
                return Decoded::Defaulted(DefaultReason::Malformed);
            }
        }
    }
    Decoded::Parsed(days.into_iter().collect())
}

pub fn json_string_to_working_hours(raw: Option<&str>) -> WorkingHours {
    decode_lenient(raw).into_hours()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hours::range::is_valid_time_range;

    #[test]
    fn encodes_in_week_order_and_omits_absent_days() {
        let hours = WorkingHours::default()
            .with_range(Day::Sunday, TimeRange::new("10:00", "14:00"))
            .with_range(Day::Monday, TimeRange::new("08:00", "13:00"));
        assert_eq!(
            hours.to_json_string().unwrap(),
            concat!(
                r#"{"monday":[{"start":"08:00","end":"13:00"}],"#,
                r#""sunday":[{"start":"10:00","end":"14:00"}]}"#
            )
        );
        assert_eq!(WorkingHours::default().to_json_string().unwrap(), "{}");
    }

    #[test]
    fn round_trips_well_formed_hours() {
        let hours = WorkingHours::empty_week()
            .with_range(Day::Monday, TimeRange::new("08:00", "13:00"))
            .with_range(Day::Monday, TimeRange::new("16:30", "23:00"))
            .with_range(Day::Saturday, TimeRange::new("9:00", "12:00"));
        let json = hours.to_json_string().unwrap();
        assert_eq!(decode_lenient(Some(&json)), Decoded::Parsed(hours));
    }

    #[test]
    fn garbage_decodes_to_empty() {
        assert_eq!(
            decode_lenient(Some("not json")),
            Decoded::Defaulted(DefaultReason::Malformed)
        );
        assert_eq!(decode_lenient(None), Decoded::Defaulted(DefaultReason::Missing));
        assert_eq!(decode_lenient(Some("")), Decoded::Defaulted(DefaultReason::Missing));
        assert_eq!(
            decode_lenient(Some("null")),
            Decoded::Defaulted(DefaultReason::NotAnObject)
        );
        assert_eq!(
            decode_lenient(Some("[1,2]")),
            Decoded::Defaulted(DefaultReason::NotAnObject)
        );
        assert_eq!(
            decode_lenient(Some(r#"{"monday":"08:00"}"#)),
            Decoded::Defaulted(DefaultReason::Malformed)
        );
        assert_eq!(json_string_to_working_hours(Some("not json")), WorkingHours::default());
        assert_eq!(json_string_to_working_hours(None), WorkingHours::default());
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let decoded = decode_lenient(Some(
            r#"{"holiday":[{"start":"10:00","end":"11:00"}],"friday":[]}"#,
        ));
        let hours = decoded.into_hours();
        assert_eq!(hours, WorkingHours::default().without_range(Day::Friday, 0));
    }

    #[test]
    fn unknown_keys_of_any_shape_keep_the_known_days() {
        let raw = concat!(
            r#"{"monday":[{"start":"08:00","end":"12:00"}],"#,
            r#""timezone":"America/Buenos_Aires","version":2}"#,
        );
        let hours = json_string_to_working_hours(Some(raw));
        assert_eq!(hours.ranges(Day::Monday), &[TimeRange::new("08:00", "12:00")]);
        assert_eq!(hours.iter().count(), 1);
    }

    #[test]
    fn invalid_ranges_survive_decoding() {
        let hours = json_string_to_working_hours(Some(
            r#"{"monday":[{"start":"20:00","end":"08:00"},{"start":"07:00","end":"21:00"}]}"#,
        ));
        assert_eq!(hours.ranges(Day::Monday).len(), 2);
        let first = &hours.ranges(Day::Monday)[0];
        assert!(!is_valid_time_range(&first.start, &first.end));
    }
}
