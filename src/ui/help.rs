use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;

pub fn build_help_text() -> Text<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Atajos de teclado",
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    let sections: [(&str, &[&str]); 6] = [
        (
            "General",
            &[
                "q: Salir",
                "?: Mostrar/ocultar ayuda",
                "s/m: Ventas / Pantallas",
                "Tab: Alternar foco (pestañas / contenido)",
                "Left/Right, Enter: Elegir pestaña (foco en pestañas)",
                "r: Recargar vista",
                "l: Iniciar sesión   L: Cerrar sesión",
                "esc: Volver",
            ],
        ),
        (
            "Ventas",
            &["f: Filtrar por fechas", "x: Quitar filtro"],
        ),
        (
            "Pantallas",
            &[
                "Up/Down: Mover selección   Enter: Detalle",
                "o: Tipo (todos/outdoor/indoor)",
                "a: Estado (todas/activas/inactivas)",
                "f: Rango de precio",
                "k: Radio (sin límite/1/2/5/10 km)",
                "x: Quitar filtros",
            ],
        ),
        ("Detalle", &["e: Editar horario"]),
        (
            "Editor de horario",
            &[
                "Left/Right: Día   Tab: Inicio/fin   Enter: Agregar rango",
                "Up/Down: Elegir rango   Delete: Quitar rango",
                "p: Enviar horario   esc: Cerrar (el borrador queda guardado)",
            ],
        ),
        (
            "Ventanas emergentes",
            &["Tab: Cambiar campo   Enter: Aceptar   esc: Cancelar"],
        ),
    ];

    for (index, (title, items)) in sections.iter().enumerate() {
        if index > 0 {
            lines.push(Line::from(""));
        }
        lines.push(section_title(title));
        lines.extend(section_lines(items));
    }
    Text::from(lines)
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    ))
}

fn section_lines(items: &[&str]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!("  - {item}"),
                Style::default().fg(Theme::text()),
            ))
        })
        .collect()
}
