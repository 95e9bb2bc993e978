use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{clamp_name, format_km};
use super::theme::Theme;
use crate::app::App;
use crate::geo::calculate_distance;
use crate::sales::format_currency;
use crate::types::MapFilters;

const NAME_WIDTH: usize = 24;

fn filters_line(filters: &MapFilters) -> Line<'static> {
    let kind = filters
        .screen_type
        .map_or("todos".to_string(), |kind| kind.to_string());
    let price = filters.price_range.map_or("-".to_string(), |range| {
        if range.max == f64::MAX {
            format!("desde {}", format_currency(range.min))
        } else {
            format!("{} - {}", format_currency(range.min), format_currency(range.max))
        }
    });
    let active = match filters.is_active {
        None => "todas",
        Some(true) => "activas",
        Some(false) => "inactivas",
    };
    let radius = filters
        .radius_km
        .map_or("-".to_string(), |radius| format!("{radius} km"));

    let style = if filters.is_empty() {
        Style::default().fg(Theme::dim())
    } else {
        Style::default().fg(Theme::warn())
    };
    Line::from(Span::styled(
        format!("Tipo: {kind}  Precio: {price}  Estado: {active}  Radio: {radius}"),
        style,
    ))
}

fn loaded_summary(visible: usize, loaded: usize, total: u64) -> String {
    if total > loaded as u64 {
        format!("{visible} de {loaded} pantallas (primera página de {total})")
    } else {
        format!("{visible} de {loaded} pantallas")
    }
}

pub fn build_screens_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();

    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Theme::warn()),
        )));
        lines.push(Line::from(""));
    }
    if !app.auth.is_logged_in() {
        lines.push(Line::from("Sin sesión. Presiona 'l' para iniciar sesión."));
        return Text::from(lines);
    }

    lines.push(filters_line(app.map.filters()));
    lines.push(Line::from(Span::styled(
        loaded_summary(app.map.visible().len(), app.map.all().len(), app.screens_total),
        Style::default().fg(Theme::dim()),
    )));
    lines.push(Line::from(""));

    let screens = app.map.visible();
    if screens.is_empty() {
        lines.push(Line::from(
            "Ninguna pantalla coincide. Presiona 'x' para quitar los filtros.",
        ));
        return Text::from(lines);
    }

    let center = app.map.full_center();
    for (index, entry) in screens.iter().enumerate() {
        let selected = index == app.selected_screen_index;
        let line_style = if selected {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::text())
        };
        let marker_style = if selected {
            Style::default().fg(Theme::selection_marker())
        } else {
            Style::default().fg(Theme::dim())
        };
        let (active_mark, active_color) = if app.is_active(entry) {
            ("●", Theme::active())
        } else {
            ("○", Theme::inactive())
        };
        let price = entry
            .screen
            .price()
            .map_or("-".to_string(), format_currency);
        let distance = format_km(calculate_distance(&center, &entry.location));
        let mut spans = vec![
            Span::styled(if selected { "> " } else { "  " }, marker_style),
            Span::styled(format!("{active_mark} "), Style::default().fg(active_color)),
            Span::styled(clamp_name(&entry.screen.name, NAME_WIDTH), line_style),
            Span::styled(
                format!(" {:<8}", entry.screen.screen_type),
                Style::default().fg(Theme::screen_type(entry.screen.screen_type)),
            ),
            Span::styled(format!("{price:>12}"), Style::default().fg(Theme::accent())),
            Span::styled(format!("{distance:>10}"), Style::default().fg(Theme::dim())),
        ];
        if app.drafts.contains_key(&entry.id) {
            spans.push(Span::styled(" *", Style::default().fg(Theme::warn())));
        }
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}
