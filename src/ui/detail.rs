use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::format_km;
use super::theme::Theme;
use crate::app::App;
use crate::geo::calculate_distance;
use crate::hours::{Decoded, DefaultReason};
use crate::sales::format_currency;

/// Rules were present but not a readable working-hours object.
fn unreadable_rules(decoded: &Decoded) -> bool {
    matches!(
        decoded,
        Decoded::Defaulted(DefaultReason::Malformed | DefaultReason::NotAnObject)
    )
}

pub fn build_screen_detail_text(app: &App) -> Text<'_> {
    let mut lines = Vec::new();
    if let Some(status) = &app.status {
        lines.push(Line::from(Span::styled(
            status.as_str(),
            Style::default().fg(Theme::warn()),
        )));
        lines.push(Line::from(""));
    }
    let Some(entry) = app.detail_screen() else {
        lines.push(Line::from("No hay pantalla seleccionada."));
        return Text::from(lines);
    };
    let screen = &entry.screen;

    const LABEL_WIDTH: usize = 13;
    let label_style = Style::default().fg(Theme::dim());
    let label = |name: &str| {
        let label_text = format!("{name}:");
        Span::styled(
            format!("{label_text:width$}", width = LABEL_WIDTH),
            label_style,
        )
    };
    let value = |text: String| Span::raw(text);

    let (status, status_color) = if app.is_active(entry) {
        ("Activa", Theme::active())
    } else {
        ("Inactiva", Theme::inactive())
    };
    let distance = calculate_distance(&app.map.full_center(), &entry.location);

    lines.push(Line::from(vec![
        Span::styled(
            "Pantalla",
            Style::default()
                .fg(Theme::primary())
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            screen.name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from("----------------------------------------"));
    if !screen.description.is_empty() {
        lines.push(Line::from(vec![label("Descripción"), value(screen.description.clone())]));
    }
    lines.push(Line::from(vec![
        label("Tipo"),
        Span::styled(
            screen.screen_type.to_string(),
            Style::default()
                .fg(Theme::screen_type(screen.screen_type))
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(vec![
        label("Precio/día"),
        value(screen.price().map_or_else(|| screen.price_per_day.clone(), format_currency)),
    ]));
    lines.push(Line::from(vec![
        label("Resolución"),
        value(format!("{}x{}", screen.resolution_width, screen.resolution_height)),
    ]));
    lines.push(Line::from(vec![label("Dirección"), value(entry.location.address.clone())]));
    lines.push(Line::from(vec![
        label("Coordenadas"),
        value(format!("{:.4}, {:.4}", entry.location.lat, entry.location.lng)),
    ]));
    lines.push(Line::from(vec![label("Al centro"), value(format_km(distance))]));
    lines.push(Line::from(vec![
        label("Estado"),
        Span::styled(
            status,
            Style::default()
                .fg(status_color)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines.push(Line::from(""));

    let (hours, is_draft) = app.hours_for(entry);
    let mut title = vec![Span::styled(
        "Horario de funcionamiento",
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )];
    if is_draft {
        title.push(Span::styled(
            "  (borrador sin enviar)",
            Style::default().fg(Theme::warn()),
        ));
    }
    lines.push(Line::from(title));

    if hours.has_working_hours() {
        lines.extend(
            hours
                .display_lines()
                .into_iter()
                .map(|line| Line::from(format!("  {line}"))),
        );
    } else {
        lines.push(Line::from(Span::styled("  sin horario", label_style)));
    }
    if !is_draft && unreadable_rules(&screen.decoded_hours()) {
        lines.push(Line::from(Span::styled(
            "  El horario guardado no se pudo leer",
            Style::default().fg(Theme::warn()),
        )));
    }
    Text::from(lines)
}
