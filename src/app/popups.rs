use chrono::NaiveDate;
use crossterm::event::KeyCode;

use crate::hours::{Day, RangeError, TimeRange, WorkingHours, validate_new_range};
use crate::types::{AuthBody, DateRange, PriceRange, ScreenId};

/// Applies a text-editing key to `target`. Returns false for keys it ignores.
fn edit_text(target: &mut String, key: KeyCode, accept: impl Fn(char) -> bool) -> bool {
    match key {
        KeyCode::Backspace => {
            target.pop();
            true
        }
        KeyCode::Char(ch) if !ch.is_control() && accept(ch) => {
            target.push(ch);
            true
        }
        _ => false,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairField {
    First,
    Second,
}

impl PairField {
    fn toggle(self) -> Self {
        match self {
            PairField::First => PairField::Second,
            PairField::Second => PairField::First,
        }
    }
}

#[derive(Clone, Debug)]
pub struct DateRangePopup {
    pub start: String,
    pub end: String,
    pub field: PairField,
}

impl DateRangePopup {
    pub fn new(current: Option<&DateRange>) -> Self {
        let format = |day: NaiveDate| day.format("%Y-%m-%d").to_string();
        Self {
            start: current.map(|range| format(range.start)).unwrap_or_default(),
            end: current.map(|range| format(range.end)).unwrap_or_default(),
            field: PairField::First,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        if key == KeyCode::Tab {
            self.field = self.field.toggle();
            return;
        }
        let target = match self.field {
            PairField::First => &mut self.start,
            PairField::Second => &mut self.end,
        };
        edit_text(target, key, |ch| ch.is_ascii_digit() || ch == '-');
    }

    pub fn parse(&self) -> Result<DateRange, String> {
        let parse = |value: &str, what: &str| {
            NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
                .map_err(|_| format!("Fecha de {what} inválida. Use AAAA-MM-DD"))
        };
        let start = parse(&self.start, "inicio")?;
        let end = parse(&self.end, "fin")?;
        if start > end {
            return Err("La fecha de inicio debe ser anterior a la de fin".to_string());
        }
        Ok(DateRange { start, end })
    }
}

#[derive(Clone, Debug)]
pub struct PriceFilterPopup {
    pub min: String,
    pub max: String,
    pub field: PairField,
}

impl PriceFilterPopup {
    pub fn new(current: Option<PriceRange>) -> Self {
        Self {
            min: current.map(|range| range.min.to_string()).unwrap_or_default(),
            max: current.map(|range| range.max.to_string()).unwrap_or_default(),
            field: PairField::First,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        if key == KeyCode::Tab {
            self.field = self.field.toggle();
            return;
        }
        let target = match self.field {
            PairField::First => &mut self.min,
            PairField::Second => &mut self.max,
        };
        edit_text(target, key, |ch| ch.is_ascii_digit() || ch == '.');
    }

    /// Both fields empty clears the price filter. A single empty bound is open.
    pub fn parse(&self) -> Result<Option<PriceRange>, String> {
        let min = self.min.trim();
        let max = self.max.trim();
        if min.is_empty() && max.is_empty() {
            return Ok(None);
        }
        let bound = |value: &str, open: f64| {
            if value.is_empty() {
                return Ok(open);
            }
            value
                .parse::<f64>()
                .map_err(|_| format!("Precio inválido: {value}"))
        };
        let range = PriceRange {
            min: bound(min, 0.0)?,
            max: bound(max, f64::MAX)?,
        };
        if range.min > range.max {
            return Err("El precio mínimo supera al máximo".to_string());
        }
        Ok(Some(range))
    }
}

#[derive(Clone, Debug)]
pub struct LoginPopup {
    pub email: String,
    pub password: String,
    pub field: PairField,
}

impl LoginPopup {
    pub fn new(email: Option<&str>) -> Self {
        let email = email.unwrap_or_default().to_string();
        let field = if email.is_empty() {
            PairField::First
        } else {
            PairField::Second
        };
        Self {
            email,
            password: String::new(),
            field,
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        if key == KeyCode::Tab {
            self.field = self.field.toggle();
            return;
        }
        let target = match self.field {
            PairField::First => &mut self.email,
            PairField::Second => &mut self.password,
        };
        edit_text(target, key, |_| true);
    }

    pub fn body(&self) -> AuthBody {
        AuthBody {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        }
    }
}

/// Working-hours editor for one screen. Every accepted edit replaces `hours`.
#[derive(Clone, Debug)]
pub struct HoursEditor {
    pub screen_id: ScreenId,
    pub hours: WorkingHours,
    pub day: Day,
    pub start: String,
    pub end: String,
    pub field: PairField,
    pub selected: usize,
    pub error: Option<String>,
}

impl HoursEditor {
    pub fn new(screen_id: ScreenId, hours: WorkingHours) -> Self {
        Self {
            screen_id,
            hours,
            day: Day::Monday,
            start: String::new(),
            end: String::new(),
            field: PairField::First,
            selected: 0,
            error: None,
        }
    }

    pub fn day_ranges(&self) -> &[TimeRange] {
        self.hours.ranges(self.day)
    }

    pub fn next_day(&mut self) {
        self.day = self.day.next();
        self.selected = 0;
    }

    pub fn prev_day(&mut self) {
        self.day = self.day.prev();
        self.selected = 0;
    }

    pub fn select_prev(&mut self) {
        let len = self.day_ranges().len();
        if len == 0 {
            return;
        }
        self.selected = if self.selected == 0 {
            len - 1
        } else {
            self.selected - 1
        };
    }

    pub fn select_next(&mut self) {
        let len = self.day_ranges().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1) % len;
    }

    pub fn toggle_field(&mut self) {
        self.field = self.field.toggle();
    }

    pub fn edit(&mut self, key: KeyCode) {
        let target = match self.field {
            PairField::First => &mut self.start,
            PairField::Second => &mut self.end,
        };
        if edit_text(target, key, |ch| ch.is_ascii_digit() || ch == ':') {
            self.error = None;
        }
    }

    /// Validates the typed range against the selected day and appends it.
    pub fn add_range(&mut self) -> Result<(), RangeError> {
        match validate_new_range(&self.hours, self.day, &self.start, &self.end) {
            Ok(range) => {
                self.hours = self.hours.with_range(self.day, range);
                self.start.clear();
                self.end.clear();
                self.field = PairField::First;
                self.selected = self.day_ranges().len().saturating_sub(1);
                self.error = None;
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Removes the selected range. Returns false when the day has none.
    pub fn remove_selected(&mut self) -> bool {
        if self.selected >= self.day_ranges().len() {
            return false;
        }
        self.hours = self.hours.without_range(self.day, self.selected);
        let len = self.day_ranges().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(editor: &mut HoursEditor, text: &str) {
        for ch in text.chars() {
            editor.edit(KeyCode::Char(ch));
        }
    }

    #[test]
    fn date_popup_parses_and_orders() {
        let mut popup = DateRangePopup::new(None);
        for ch in "2024-01-01x".chars() {
            popup.handle_key(KeyCode::Char(ch));
        }
        popup.handle_key(KeyCode::Tab);
        for ch in "2024-01-31".chars() {
            popup.handle_key(KeyCode::Char(ch));
        }
        assert_eq!(popup.start, "2024-01-01");
        let range = popup.parse().unwrap();
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());

        let reversed = DateRangePopup {
            start: "2024-02-01".into(),
            end: "2024-01-01".into(),
            field: PairField::First,
        };
        assert!(reversed.parse().is_err());
        let prefilled = DateRangePopup::new(Some(&range));
        assert_eq!(prefilled.end, "2024-01-31");
    }

    #[test]
    fn price_popup_bounds() {
        let popup = PriceFilterPopup::new(None);
        assert_eq!(popup.parse(), Ok(None));

        let only_min = PriceFilterPopup {
            min: "100".into(),
            max: String::new(),
            field: PairField::First,
        };
        let range = only_min.parse().unwrap().unwrap();
        assert_eq!(range.min, 100.0);
        assert_eq!(range.max, f64::MAX);

        let inverted = PriceFilterPopup {
            min: "500".into(),
            max: "100".into(),
            field: PairField::First,
        };
        assert!(inverted.parse().is_err());
    }

    #[test]
    fn login_popup_starts_on_password_when_email_known() {
        let mut popup = LoginPopup::new(Some("ana@example.com"));
        assert_eq!(popup.field, PairField::Second);
        popup.handle_key(KeyCode::Char('x'));
        popup.handle_key(KeyCode::Backspace);
        popup.handle_key(KeyCode::Char('y'));
        assert_eq!(popup.body().password, "y");
        assert_eq!(popup.body().email, "ana@example.com");
    }

    #[test]
    fn editor_adds_validated_ranges() {
        let mut editor = HoursEditor::new("1".into(), WorkingHours::empty_week());
        type_into(&mut editor, "08:00");
        editor.toggle_field();
        type_into(&mut editor, "12:00");
        editor.add_range().unwrap();
        assert_eq!(editor.day_ranges(), &[TimeRange::new("08:00", "12:00")]);
        assert!(editor.start.is_empty());

        type_into(&mut editor, "11:00");
        editor.toggle_field();
        type_into(&mut editor, "13:00");
        assert!(matches!(editor.add_range(), Err(RangeError::Overlap { .. })));
        assert_eq!(
            editor.error.as_deref(),
            Some("Este horario se solapa con uno existente")
        );
        assert_eq!(editor.day_ranges().len(), 1);
    }

    #[test]
    fn editor_selection_and_removal() {
        let hours = WorkingHours::empty_week()
            .with_range(Day::Tuesday, TimeRange::new("08:00", "09:00"))
            .with_range(Day::Tuesday, TimeRange::new("10:00", "11:00"));
        let mut editor = HoursEditor::new("1".into(), hours);
        assert!(!editor.remove_selected());

        editor.next_day();
        assert_eq!(editor.day, Day::Tuesday);
        editor.select_prev();
        assert_eq!(editor.selected, 1);
        assert!(editor.remove_selected());
        assert_eq!(editor.selected, 0);
        assert_eq!(editor.day_ranges(), &[TimeRange::new("08:00", "09:00")]);

        editor.prev_day();
        editor.prev_day();
        assert_eq!(editor.day, Day::Sunday);
    }
}
