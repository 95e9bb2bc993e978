mod detail;
mod help;
mod helpers;
mod popups;
mod sales;
mod screens;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Flex, Layout, Rect},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::app::{App, AppView, FocusMode};
use theme::Theme;

fn bordered() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Theme::secondary()))
}

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let (title, body_text) = match app.view {
        AppView::Sales => (" Ventas ", sales::build_sales_text(app)),
        AppView::Screens => (" Pantallas ", screens::build_screens_text(app)),
        AppView::ScreenDetail => (" Detalle ", detail::build_screen_detail_text(app)),
        AppView::Help => (" Ayuda ", help::build_help_text()),
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "  Screenboard  ",
            Style::default().fg(Color::Black).bg(Theme::primary()),
        ),
        Span::raw(" "),
        Span::styled(
            "marketplace de pantallas",
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Left)
    .block(bordered());
    frame.render_widget(header, layout[0]);

    let mut body_lines = vec![
        tabs_line(app),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    body_lines.extend(body_text.lines);
    body_lines.push(Line::from(""));
    body_lines.push(Line::from(Span::styled(
        "----------------------------------------",
        Style::default().fg(Theme::dim()),
    )));
    body_lines.extend(keybinds_lines(app));
    let body = Paragraph::new(Text::from(body_lines))
        .style(Style::default().fg(Theme::text()))
        .alignment(Alignment::Left)
        .block(bordered());
    frame.render_widget(body, layout[1]);

    let footer = Paragraph::new(footer_line(app))
        .alignment(Alignment::Left)
        .block(bordered());
    frame.render_widget(footer, layout[2]);

    if let Some(popup) = &app.date_popup {
        popups::render_date_popup(frame, popup);
    }
    if let Some(popup) = &app.price_popup {
        popups::render_price_popup(frame, popup);
    }
    if let Some(editor) = &app.hours_editor {
        popups::render_hours_editor(frame, editor);
    }
    if let Some(popup) = &app.login_popup {
        popups::render_login_popup(frame, popup, app.auth.error());
    }
}

/// A `percent_x` by `percent_y` rectangle centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

fn tabs_line(app: &App) -> Line<'_> {
    let tabs = [("Ventas", AppView::Sales), ("Pantallas", AppView::Screens)];

    let mut spans = Vec::new();
    for (index, (name, view)) in tabs.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let active = match app.view {
            AppView::ScreenDetail => *view == AppView::Screens,
            _ => *view == app.view,
        };
        let focused = app.focus_mode == FocusMode::TabBar && app.selected_tab_index == index;
        let style = if active {
            Style::default()
                .fg(Color::Black)
                .bg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else if focused {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Theme::dim())
        };
        spans.push(Span::styled(format!(" {name} "), style));
    }

    Line::from(spans)
}

fn footer_line(app: &App) -> Line<'_> {
    let user = match app.auth.user() {
        Some(user) => Span::styled(
            format!("● {} <{}>", user.name, user.email),
            Style::default()
                .fg(Theme::active())
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("○ Sin sesión", Style::default().fg(Theme::dim())),
    };
    let mut spans = vec![user];
    if !app.drafts.is_empty() {
        spans.push(Span::styled(
            format!("  {} borrador(es)", app.drafts.len()),
            Style::default().fg(Theme::warn()),
        ));
    }
    if let Some(status) = &app.status {
        spans.push(Span::styled("  |  ", Style::default().fg(Theme::dim())));
        spans.push(Span::styled(status.as_str(), Style::default().fg(Theme::text())));
    }
    Line::from(spans)
}

fn keybinds_lines(app: &App) -> Vec<Line<'static>> {
    let focus_hint = if app.focus_mode == FocusMode::TabBar {
        "Tab: Ir al contenido  ←/→: Pestañas  Enter: Elegir"
    } else {
        "Tab: Ir a pestañas  s/m: Ventas/Pantallas"
    };

    let (primary, secondary) = match app.view {
        AppView::Sales => (
            "f: Filtrar fechas  x: Quitar filtro",
            "r: Recargar  ?: Ayuda  q: Salir",
        ),
        AppView::Screens => (
            "Up/Down: Elegir  Enter: Detalle  o: Tipo  a: Estado  f: Precio  k: Radio  x: Limpiar",
            "r: Recargar  L: Cerrar sesión  ?: Ayuda  q: Salir",
        ),
        AppView::ScreenDetail => ("e: Editar horario", "esc: Volver  ?: Ayuda  q: Salir"),
        AppView::Help => ("Presiona ? o esc para cerrar la ayuda", ""),
    };
    vec![
        Line::from(Span::styled(
            focus_hint,
            Style::default().fg(Theme::highlight()),
        )),
        Line::from(Span::styled(primary, Style::default().fg(Theme::dim()))),
        Line::from(Span::styled(secondary, Style::default().fg(Theme::dim()))),
    ]
}
