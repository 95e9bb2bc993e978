use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::bar;
use super::theme::Theme;
use crate::app::App;
use crate::sales::{chart_points, format_currency, format_date_for_metrics};

const BAR_WIDTH: usize = 40;

pub fn build_sales_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();

    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Theme::warn()),
        )));
        lines.push(Line::from(""));
    }

    if let Some(range) = app.sales.range() {
        lines.push(Line::from(vec![
            Span::styled("Filtrado: ", Style::default().fg(Theme::warn())),
            Span::styled(
                format!(
                    "{} - {}",
                    range.start.format("%d/%m/%Y"),
                    range.end.format("%d/%m/%Y")
                ),
                Style::default().fg(Theme::text()),
            ),
            Span::styled(
                format!(
                    "  {} de {} ventas (x para quitar)",
                    app.sales.visible().len(),
                    app.sales.all().len()
                ),
                Style::default().fg(Theme::dim()),
            ),
        ]));
        lines.push(Line::from(""));
    }

    let stats = app.sales.stats();
    let label = |name: &str| Span::styled(format!("{name:<18}"), Style::default().fg(Theme::dim()));
    let money = |value: f64| {
        Span::styled(
            format_currency(value),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )
    };

    lines.push(Line::from(vec![label("Ventas totales"), money(stats.total_sales)]));
    lines.push(Line::from(vec![label("Promedio diario"), money(stats.average_sales)]));
    if stats.total_days > 0 {
        lines.push(Line::from(vec![
            label("Mayor venta"),
            money(stats.max_sales.value),
            Span::styled(
                format!("  {}", format_date_for_metrics(&stats.max_sales.date)),
                Style::default().fg(Theme::dim()),
            ),
        ]));
        lines.push(Line::from(vec![
            label("Menor venta"),
            money(stats.min_sales.value),
            Span::styled(
                format!("  {}", format_date_for_metrics(&stats.min_sales.date)),
                Style::default().fg(Theme::dim()),
            ),
        ]));
    }
    lines.push(Line::from(vec![
        label("Días"),
        Span::raw(stats.total_days.to_string()),
    ]));
    lines.push(Line::from(""));

    let points = chart_points(app.sales.visible());
    if points.is_empty() {
        lines.push(Line::from("No hay ventas para mostrar. Presiona 'r' para recargar."));
        return Text::from(lines);
    }

    let max = points.iter().map(|(_, value)| *value).fold(0.0, f64::max);
    for (day, value) in points {
        lines.push(Line::from(vec![
            Span::styled(format!("{day:>8} "), Style::default().fg(Theme::dim())),
            Span::styled(bar(value, max, BAR_WIDTH), Style::default().fg(Theme::primary())),
            Span::styled(
                format!(" {}", format_currency(value)),
                Style::default().fg(Theme::text()),
            ),
        ]));
    }
    Text::from(lines)
}
