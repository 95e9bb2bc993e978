use ratatui::{
    Frame,
    prelude::Alignment,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Clear, Paragraph},
};

use super::theme::Theme;
use super::{bordered, centered_rect};
use crate::app::{DateRangePopup, HoursEditor, LoginPopup, PairField, PriceFilterPopup};
use crate::hours::Day;

fn field_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Theme::highlight())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::text())
    }
}

fn heading(text: &str) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    ))
}

fn hint(text: &str) -> Line<'static> {
    Line::from(Span::styled(text.to_string(), Style::default().fg(Theme::dim())))
}

/// `label: value` with the cursor marker on the active field.
fn input_line<'a>(label: &'a str, value: &'a str, placeholder: &'a str, active: bool) -> Line<'a> {
    let shown = if value.is_empty() && !active { placeholder } else { value };
    let mut spans = vec![
        Span::styled(
            if active { "> " } else { "  " },
            Style::default().fg(Theme::selection_marker()),
        ),
        Span::styled(label, Style::default().fg(Theme::dim())),
        Span::styled(shown, field_style(active)),
    ];
    if active {
        spans.push(Span::styled("_", Style::default().fg(Theme::highlight())));
    }
    Line::from(spans)
}

fn render(frame: &mut Frame, lines: Vec<Line<'_>>, title: &str, size: (u16, u16)) {
    let area = centered_rect(size.0, size.1, frame.area());
    frame.render_widget(Clear, area);
    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(bordered().title(format!(" {title} ")));
    frame.render_widget(widget, area);
}

pub fn render_date_popup(frame: &mut Frame, popup: &DateRangePopup) {
    let lines = vec![
        heading("Filtrar ventas por fecha"),
        Line::from(""),
        input_line("Desde: ", &popup.start, "AAAA-MM-DD", popup.field == PairField::First),
        input_line("Hasta: ", &popup.end, "AAAA-MM-DD", popup.field == PairField::Second),
        Line::from(""),
        hint("Tab: cambiar campo. Enter: aplicar. Esc: cancelar."),
    ];
    render(frame, lines, "Fechas", (50, 35));
}

pub fn render_price_popup(frame: &mut Frame, popup: &PriceFilterPopup) {
    let lines = vec![
        heading("Filtrar pantallas por precio diario"),
        Line::from(""),
        input_line("Mínimo: ", &popup.min, "sin mínimo", popup.field == PairField::First),
        input_line("Máximo: ", &popup.max, "sin máximo", popup.field == PairField::Second),
        Line::from(""),
        hint("Ambos vacíos quitan el filtro. Enter: aplicar. Esc: cancelar."),
    ];
    render(frame, lines, "Precio", (50, 35));
}

pub fn render_login_popup(frame: &mut Frame, popup: &LoginPopup, error: Option<&str>) {
    let masked = "*".repeat(popup.password.chars().count());
    let mut lines = vec![
        heading("Iniciar sesión"),
        Line::from(""),
        input_line("Email:      ", &popup.email, "", popup.field == PairField::First),
        input_line("Contraseña: ", &masked, "", popup.field == PairField::Second),
        Line::from(""),
    ];
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            error,
            Style::default().fg(Theme::inactive()),
        )));
        lines.push(Line::from(""));
    }
    lines.push(hint("Tab: cambiar campo. Enter: ingresar. Esc: cancelar."));
    render(frame, lines, "Sesión", (55, 40));
}

pub fn render_hours_editor(frame: &mut Frame, editor: &HoursEditor) {
    let mut day_spans = Vec::new();
    for day in Day::ALL {
        let style = if day == editor.day {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else if editor.hours.ranges(day).is_empty() {
            Style::default().fg(Theme::dim())
        } else {
            Style::default().fg(Theme::text())
        };
        let short: String = day.label().chars().take(3).collect();
        day_spans.push(Span::styled(format!(" {short} "), style));
    }

    let mut lines = vec![
        heading("Horario de funcionamiento"),
        Line::from(""),
        Line::from(day_spans),
        Line::from(""),
    ];

    let ranges = editor.day_ranges();
    if ranges.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {} sin rangos", editor.day.label()),
            Style::default().fg(Theme::dim()),
        )));
    }
    for (index, range) in ranges.iter().enumerate() {
        let selected = index == editor.selected;
        lines.push(Line::from(vec![
            Span::styled(
                if selected { "> " } else { "  " },
                Style::default().fg(Theme::selection_marker()),
            ),
            Span::styled(range.to_string(), field_style(selected)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(input_line("Inicio: ", &editor.start, "HH:MM", editor.field == PairField::First));
    lines.push(input_line("Fin:    ", &editor.end, "HH:MM", editor.field == PairField::Second));
    lines.push(Line::from(""));
    if let Some(error) = &editor.error {
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(Theme::inactive()),
        )));
        lines.push(Line::from(""));
    }
    lines.push(hint("Left/Right: día. Tab: campo. Enter: agregar. Up/Down + Delete: quitar."));
    lines.push(hint("p: enviar. Esc: cerrar (el borrador queda guardado)."));
    render(frame, lines, "Editar horario", (70, 75));
}
