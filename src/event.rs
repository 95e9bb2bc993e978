use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

use crate::app::{App, AppEvent};

const TICK_RATE: Duration = Duration::from_millis(250);

/// Maps a key event to an `AppEvent`. Repeats and releases are dropped.
fn map_key(key: KeyEvent) -> Option<AppEvent> {
    (key.kind == KeyEventKind::Press).then_some(AppEvent::KeyPress(key.code))
}

/// Waits up to `timeout` for input. Resizes and other terminal events yield
/// nothing; a quiet timeout yields a tick.
pub fn poll(timeout: Duration) -> Result<Option<AppEvent>> {
    if !event::poll(timeout)? {
        return Ok(Some(AppEvent::Tick));
    }
    match event::read()? {
        Event::Key(key) => Ok(map_key(key)),
        _ => Ok(None),
    }
}

/// Runs the main event loop until the app stops.
pub fn run(app: &mut App, terminal: &mut crate::tui::Terminal) -> Result<()> {
    while app.running {
        terminal.draw(|frame| crate::ui::draw(frame, app))?;

        if let Some(event) = poll(TICK_RATE)? {
            app.update(event);
        }
    }
    Ok(())
}
