mod popups;
mod state;

use crossterm::event::KeyCode;

pub use popups::{DateRangePopup, HoursEditor, LoginPopup, PairField, PriceFilterPopup};
pub use state::App;

/// Possible input events the app reacts to.
pub enum AppEvent {
    Tick,
    KeyPress(KeyCode),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppView {
    Sales,
    Screens,
    ScreenDetail,
    Help,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusMode {
    TabBar,
    Content,
}

pub const TABS: [AppView; 2] = [AppView::Sales, AppView::Screens];

/// Radius filter steps cycled with `k`.
pub const RADIUS_STEPS: [Option<f64>; 5] = [None, Some(1.0), Some(2.0), Some(5.0), Some(10.0)];

/// any -> active -> inactive -> any
pub fn next_active_filter(current: Option<bool>) -> Option<bool> {
    match current {
        None => Some(true),
        Some(true) => Some(false),
        Some(false) => None,
    }
}

pub fn next_radius(current: Option<f64>) -> Option<f64> {
    let index = RADIUS_STEPS
        .iter()
        .position(|step| *step == current)
        .map_or(0, |index| (index + 1) % RADIUS_STEPS.len());
    RADIUS_STEPS[index]
}
