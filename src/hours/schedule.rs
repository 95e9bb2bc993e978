use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Day, TimeRange};

/// Day-keyed time ranges. A day may be absent, present and empty, or hold
/// ranges in insertion order. Overlaps are not rejected here; see
/// [`super::validate_new_range`] for the editing rules.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingHours {
    days: BTreeMap<Day, Vec<TimeRange>>,
}

impl WorkingHours {
    /// All seven days present with no ranges.
    pub fn empty_week() -> Self {
        Day::ALL.into_iter().map(|day| (day, Vec::new())).collect()
    }

    pub fn ranges(&self, day: Day) -> &[TimeRange] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Day, &[TimeRange])> {
        self.days.iter().map(|(day, ranges)| (*day, ranges.as_slice()))
    }

    pub fn has_working_hours(&self) -> bool {
        self.iter().any(|(_, ranges)| !ranges.is_empty())
    }

    /// Returns a copy with `range` appended to `day`.
    pub fn with_range(&self, day: Day, range: TimeRange) -> Self {
        let mut next = self.clone();
        next.days.entry(day).or_default().push(range);
        next
    }

    /// Returns a copy without the range at `index` on `day`. The day is present
    /// afterwards; an out-of-range index leaves its ranges untouched.
    pub fn without_range(&self, day: Day, index: usize) -> Self {
        let mut next = self.clone();
        let ranges = next.days.entry(day).or_default();
        if index < ranges.len() {
            ranges.remove(index);
        }
        next
    }

    /// One `"<Label>: <start> - <end>, ..."` line per configured day, Monday first.
    pub fn display_lines(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, ranges)| !ranges.is_empty())
            .map(|(day, ranges)| {
                let text = ranges
                    .iter()
                    .map(TimeRange::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: {}", day.label(), text)
            })
            .collect()
    }
}

impl FromIterator<(Day, Vec<TimeRange>)> for WorkingHours {
    fn from_iter<I: IntoIterator<Item = (Day, Vec<TimeRange>)>>(iter: I) -> Self {
        Self {
            days: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::new(start, end)
    }

    #[test]
    fn empty_week_has_every_day_and_no_hours() {
        let hours = WorkingHours::empty_week();
        let days: Vec<Day> = hours.iter().map(|(day, _)| day).collect();
        assert_eq!(days, Day::ALL.to_vec());
        for day in Day::ALL {
            assert!(hours.ranges(day).is_empty());
        }
        assert!(!hours.has_working_hours());
        assert!(!WorkingHours::default().has_working_hours());
    }

    #[test]
    fn with_range_appends_without_sorting() {
        let original = WorkingHours::empty_week();
        let hours = original
            .with_range(Day::Friday, range("16:30", "23:00"))
            .with_range(Day::Friday, range("08:00", "13:00"));

        assert_eq!(
            hours.ranges(Day::Friday),
            &[range("16:30", "23:00"), range("08:00", "13:00")]
        );
        assert!(hours.has_working_hours());
        assert!(original.ranges(Day::Friday).is_empty());
    }

    #[test]
    fn add_then_remove_restores_the_day() {
        let hours = WorkingHours::default()
            .with_range(Day::Monday, range("08:00", "10:00"))
            .with_range(Day::Monday, range("12:00", "14:00"));
        let added = hours.with_range(Day::Monday, range("18:00", "20:00"));
        let restored = added.without_range(Day::Monday, 2);
        assert_eq!(restored.ranges(Day::Monday), hours.ranges(Day::Monday));
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let hours = WorkingHours::default()
            .with_range(Day::Tuesday, range("08:00", "09:00"))
            .with_range(Day::Tuesday, range("10:00", "11:00"))
            .with_range(Day::Tuesday, range("12:00", "13:00"));
        let removed = hours.without_range(Day::Tuesday, 1);
        assert_eq!(
            removed.ranges(Day::Tuesday),
            &[range("08:00", "09:00"), range("12:00", "13:00")]
        );
    }

    #[test]
    fn out_of_range_remove_is_a_no_op() {
        let hours = WorkingHours::default().with_range(Day::Monday, range("08:00", "09:00"));
        assert_eq!(hours.without_range(Day::Monday, 5), hours);

        let missing = WorkingHours::default().without_range(Day::Sunday, 0);
        assert_eq!(missing.iter().map(|(day, _)| day).collect::<Vec<_>>(), vec![Day::Sunday]);
        assert!(missing.ranges(Day::Sunday).is_empty());
    }

    #[test]
    fn display_single_day() {
        let hours = WorkingHours::default().with_range(Day::Monday, range("08:00", "12:00"));
        assert_eq!(hours.display_lines(), vec!["Lunes: 08:00 - 12:00".to_string()]);
    }

    #[test]
    fn display_uses_week_order_and_skips_empty_days() {
        let hours = WorkingHours::empty_week()
            .with_range(Day::Sunday, range("10:00", "14:00"))
            .with_range(Day::Wednesday, range("16:30", "23:00"))
            .with_range(Day::Wednesday, range("08:00", "13:00"));
        assert_eq!(
            hours.display_lines(),
            vec![
                "Miércoles: 16:30 - 23:00, 08:00 - 13:00".to_string(),
                "Domingo: 10:00 - 14:00".to_string(),
            ]
        );
        assert!(WorkingHours::empty_week().display_lines().is_empty());
    }

    #[test]
    fn overlapping_ranges_are_storable() {
        let hours = WorkingHours::default()
            .with_range(Day::Monday, range("08:00", "12:00"))
            .with_range(Day::Monday, range("10:00", "14:00"));
        assert_eq!(hours.ranges(Day::Monday).len(), 2);
    }
}
