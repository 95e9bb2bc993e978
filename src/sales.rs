//! Sales aggregation, date filtering and display formatting.
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::config::ReferenceZone;
use crate::types::{DateRange, Sale, SalesStats};

const SHORT_MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Sum, rounded average, first-occurrence min/max and count. Empty input gives
/// zeros with placeholder sales.
pub fn calculate_sales_stats(sales: &[Sale]) -> SalesStats {
    let Some((first, rest)) = sales.split_first() else {
        return SalesStats {
            total_sales: 0.0,
            average_sales: 0.0,
            min_sales: Sale::placeholder(),
            max_sales: Sale::placeholder(),
            total_days: 0,
        };
    };

    let mut total = first.value;
    let mut min = first;
    let mut max = first;
    for sale in rest {
        total += sale.value;
        if sale.value < min.value {
            min = sale;
        }
        if sale.value > max.value {
            max = sale;
        }
    }

    SalesStats {
        total_sales: total,
        average_sales: round_half_up_2(total / sales.len() as f64),
        min_sales: min.clone(),
        max_sales: max.clone(),
        total_days: sales.len(),
    }
}

fn round_half_up_2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Keeps sales between the start of `range.start` and the last millisecond of
/// `range.end`, both read as wall-clock time in `zone`.
pub fn filter_sales_by_date_range<Tz: TimeZone>(
    sales: &[Sale],
    range: &DateRange,
    zone: &Tz,
) -> Vec<Sale> {
    let start = range.start.and_time(NaiveTime::MIN);
    let Some(end) = range.end.and_hms_milli_opt(23, 59, 59, 999) else {
        return Vec::new();
    };
    sales
        .iter()
        .filter(|sale| {
            sale_local_time(&sale.date, zone).is_some_and(|at| at >= start && at <= end)
        })
        .cloned()
        .collect()
}

/// Date-only values are midnight in `zone`; timestamps are converted into it.
fn sale_local_time<Tz: TimeZone>(date: &str, zone: &Tz) -> Option<NaiveDateTime> {
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(day.and_time(NaiveTime::MIN));
    }
    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|at| at.with_timezone(zone).naive_local())
}

/// Argentine pesos without decimals, e.g. `$ 12.500`.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let grouped = group_thousands(&digits);
    if rounded < 0.0 {
        format!("-$ {grouped}")
    } else {
        format!("$ {grouped}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Compact chart label: `05 ene`.
pub fn format_date_for_display(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(day) => format!("{:02} {}", day.day(), SHORT_MONTHS[day.month0() as usize]),
        Err(_) => date.to_string(),
    }
}

/// Full date for metrics: `05/01/2024`.
pub fn format_date_for_metrics(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(day) => day.format("%d/%m/%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

pub fn chart_points(sales: &[Sale]) -> Vec<(String, f64)> {
    sales
        .iter()
        .map(|sale| (format_date_for_display(&sale.date), sale.value))
        .collect()
}

/// Fetched sales plus the currently filtered view and its stats.
#[derive(Clone, Debug)]
pub struct SalesBoard {
    all: Vec<Sale>,
    visible: Vec<Sale>,
    stats: SalesStats,
    range: Option<DateRange>,
}

impl Default for SalesBoard {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl SalesBoard {
    pub fn new(sales: Vec<Sale>) -> Self {
        let stats = calculate_sales_stats(&sales);
        Self {
            visible: sales.clone(),
            all: sales,
            stats,
            range: None,
        }
    }

    pub fn all(&self) -> &[Sale] {
        &self.all
    }

    pub fn visible(&self) -> &[Sale] {
        &self.visible
    }

    pub fn stats(&self) -> &SalesStats {
        &self.stats
    }

    pub fn range(&self) -> Option<&DateRange> {
        self.range.as_ref()
    }

    pub fn filter_by_date_range<Tz: TimeZone>(&mut self, range: DateRange, zone: &Tz) {
        self.visible = filter_sales_by_date_range(&self.all, &range, zone);
        self.stats = calculate_sales_stats(&self.visible);
        self.range = Some(range);
    }

    pub fn filter_in(&mut self, range: DateRange, zone: ReferenceZone) {
        match zone {
            ReferenceZone::Local => self.filter_by_date_range(range, &chrono::Local),
            ReferenceZone::Fixed(offset) => self.filter_by_date_range(range, &offset),
        }
    }

    pub fn reset_filter(&mut self) {
        self.visible = self.all.clone();
        self.stats = calculate_sales_stats(&self.visible);
        self.range = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    fn sale(id: i64, date: &str, value: f64) -> Sale {
        Sale {
            id,
            date: date.to_string(),
            value,
        }
    }

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange {
            start: day(start),
            end: day(end),
        }
    }

    #[test]
    fn empty_stats_use_placeholders() {
        let stats = calculate_sales_stats(&[]);
        assert_eq!(stats.total_sales, 0.0);
        assert_eq!(stats.average_sales, 0.0);
        assert_eq!(stats.min_sales, Sale::placeholder());
        assert_eq!(stats.max_sales, Sale::placeholder());
        assert_eq!(stats.total_days, 0);
    }

    #[test]
    fn two_sale_stats() {
        let sales = vec![sale(1, "2024-01-01", 100.0), sale(2, "2024-01-02", 300.0)];
        let stats = calculate_sales_stats(&sales);
        assert_eq!(stats.total_sales, 400.0);
        assert_eq!(stats.average_sales, 200.0);
        assert_eq!(stats.min_sales, sales[0]);
        assert_eq!(stats.max_sales, sales[1]);
        assert_eq!(stats.total_days, 2);
    }

    #[test]
    fn ties_keep_first_occurrence() {
        let sales = vec![
            sale(1, "2024-01-01", 50.0),
            sale(2, "2024-01-02", 80.0),
            sale(3, "2024-01-03", 50.0),
            sale(4, "2024-01-04", 80.0),
        ];
        let stats = calculate_sales_stats(&sales);
        assert_eq!(stats.min_sales.id, 1);
        assert_eq!(stats.max_sales.id, 2);
    }

    #[test]
    fn average_rounds_to_cents_but_total_does_not() {
        let sales = vec![
            sale(1, "2024-01-01", 10.0),
            sale(2, "2024-01-02", 10.0),
            sale(3, "2024-01-03", 10.01),
        ];
        let stats = calculate_sales_stats(&sales);
        assert!((stats.total_sales - 30.01).abs() < 1e-9);
        assert_eq!(stats.average_sales, 10.0);

        let halves = vec![sale(1, "2024-01-01", 0.125), sale(2, "2024-01-02", 0.125)];
        assert_eq!(calculate_sales_stats(&halves).average_sales, 0.13);
    }

    #[test]
    fn filter_includes_both_bounds() {
        let sales = vec![
            sale(1, "2024-01-01", 1.0),
            sale(2, "2024-01-05", 2.0),
            sale(3, "2024-01-10", 3.0),
            sale(4, "2024-01-11", 4.0),
        ];
        let filtered = filter_sales_by_date_range(&sales, &range("2024-01-05", "2024-01-10"), &Utc);
        let ids: Vec<_> = filtered.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn bounds_do_not_depend_on_the_zone_for_plain_dates() {
        let sales = vec![sale(1, "2024-01-05", 1.0)];
        let buenos_aires = FixedOffset::west_opt(3 * 3600).unwrap();
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let window = range("2024-01-05", "2024-01-05");
        assert_eq!(filter_sales_by_date_range(&sales, &window, &buenos_aires).len(), 1);
        assert_eq!(filter_sales_by_date_range(&sales, &window, &tokyo).len(), 1);
    }

    #[test]
    fn timestamps_are_read_in_the_reference_zone() {
        let sales = vec![sale(1, "2024-01-06T01:00:00Z", 1.0)];
        let window = range("2024-01-05", "2024-01-05");
        let buenos_aires = FixedOffset::west_opt(3 * 3600).unwrap();
        assert_eq!(filter_sales_by_date_range(&sales, &window, &buenos_aires).len(), 1);
        assert!(filter_sales_by_date_range(&sales, &window, &Utc).is_empty());
    }

    #[test]
    fn unparseable_dates_are_dropped() {
        let sales = vec![sale(1, "yesterday", 1.0)];
        let window = range("2000-01-01", "2100-01-01");
        assert!(filter_sales_by_date_range(&sales, &window, &Utc).is_empty());
    }

    #[test]
    fn currency_uses_peso_format() {
        assert_eq!(format_currency(0.0), "$ 0");
        assert_eq!(format_currency(999.4), "$ 999");
        assert_eq!(format_currency(1234.5), "$ 1.235");
        assert_eq!(format_currency(1_234_567.0), "$ 1.234.567");
        assert_eq!(format_currency(-4500.0), "-$ 4.500");
        assert_eq!(format_currency(-0.2), "$ 0");
    }

    #[test]
    fn date_formats() {
        assert_eq!(format_date_for_display("2024-01-05"), "05 ene");
        assert_eq!(format_date_for_display("2024-09-30"), "30 sept");
        assert_eq!(format_date_for_metrics("2024-01-05"), "05/01/2024");
        assert_eq!(format_date_for_metrics("soon"), "soon");
    }

    #[test]
    fn chart_points_follow_sale_order() {
        let sales = vec![sale(1, "2024-03-02", 5.0), sale(2, "2024-03-01", 7.0)];
        assert_eq!(
            chart_points(&sales),
            vec![("02 mar".to_string(), 5.0), ("01 mar".to_string(), 7.0)]
        );
    }

    #[test]
    fn board_filters_and_resets() {
        let mut board = SalesBoard::new(vec![
            sale(1, "2024-01-01", 100.0),
            sale(2, "2024-01-02", 300.0),
            sale(3, "2024-02-01", 50.0),
        ]);
        assert_eq!(board.stats().total_days, 3);

        board.filter_by_date_range(range("2024-01-01", "2024-01-31"), &Utc);
        assert_eq!(board.visible().len(), 2);
        assert_eq!(board.stats().total_sales, 400.0);
        assert!(board.range().is_some());

        board.reset_filter();
        assert_eq!(board.visible().len(), 3);
        assert_eq!(board.stats().min_sales.id, 3);
        assert!(board.range().is_none());
    }

    #[test]
    fn board_filters_in_a_fixed_reference_zone() {
        let mut board = SalesBoard::new(vec![
            sale(1, "2024-01-06T01:00:00Z", 10.0),
            sale(2, "2024-01-06T04:00:00Z", 20.0),
        ]);
        let buenos_aires = FixedOffset::west_opt(3 * 3600).unwrap();
        board.filter_in(range("2024-01-05", "2024-01-05"), ReferenceZone::Fixed(buenos_aires));
        assert_eq!(board.visible().len(), 1);
        assert_eq!(board.stats().total_sales, 10.0);
    }
}
