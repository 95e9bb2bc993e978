use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use rusqlite::Connection;

use crate::api::{ApiError, MarketplaceApi};
use crate::config::{Config, ReferenceZone};
use crate::db;
use crate::geo::{ScreenMap, add_location_to_screens};
use crate::hours::WorkingHours;
use crate::sales::SalesBoard;
use crate::session::AuthState;
use crate::types::{MapFilters, QueryParams, ScreenId, ScreenType, ScreenWithLocation};

use super::{
    AppEvent, AppView, DateRangePopup, FocusMode, HoursEditor, LoginPopup, PriceFilterPopup,
    TABS, next_active_filter, next_radius,
};

/// How often the active filter is re-evaluated while the app sits idle.
const ACTIVE_REFRESH: Duration = Duration::from_secs(30);

/// The top-level application state.
pub struct App {
    pub running: bool,
    api: Box<dyn MarketplaceApi>,
    pub db: Connection,
    pub config: Config,
    pub zone: ReferenceZone,
    pub auth: AuthState,
    pub view: AppView,
    view_history: Vec<AppView>,
    pub focus_mode: FocusMode,
    pub selected_tab_index: usize,
    pub status: Option<String>,
    pub sales: SalesBoard,
    sales_loaded: bool,
    pub map: ScreenMap,
    pub screens_total: u64,
    screens_loaded: bool,
    pub selected_screen_index: usize,
    pub detail_id: Option<ScreenId>,
    pub drafts: HashMap<ScreenId, WorkingHours>,
    pub date_popup: Option<DateRangePopup>,
    pub price_popup: Option<PriceFilterPopup>,
    pub login_popup: Option<LoginPopup>,
    pub hours_editor: Option<HoursEditor>,
    last_refresh: Instant,
}

impl App {
    pub fn new(
        api: Box<dyn MarketplaceApi>,
        db: Connection,
        config: Config,
        zone: ReferenceZone,
    ) -> Self {
        let auth = AuthState::restore(&db);
        let drafts = match db::query_drafts(&db) {
            Ok(drafts) => drafts
                .into_iter()
                .map(|draft| (draft.screen_id, draft.hours))
                .collect(),
            Err(err) => {
                tracing::warn!("could not read drafts: {err:#}");
                HashMap::new()
            }
        };
        let mut app = Self {
            running: true,
            api,
            db,
            config,
            zone,
            auth,
            view: AppView::Sales,
            view_history: Vec::new(),
            focus_mode: FocusMode::Content,
            selected_tab_index: 0,
            status: None,
            sales: SalesBoard::default(),
            sales_loaded: false,
            map: ScreenMap::default(),
            screens_total: 0,
            screens_loaded: false,
            selected_screen_index: 0,
            detail_id: None,
            drafts,
            date_popup: None,
            price_popup: None,
            login_popup: None,
            hours_editor: None,
            last_refresh: Instant::now(),
        };
        app.load_sales();
        app
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => {
                if self.map.filters().is_active.is_some()
                    && self.last_refresh.elapsed() >= ACTIVE_REFRESH
                {
                    self.map.refresh(&self.zone.now());
                    self.clamp_screen_selection();
                    self.last_refresh = Instant::now();
                }
            }
            AppEvent::KeyPress(key) => self.handle_key(key),
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.login_popup.is_some() {
            self.handle_login_key(key);
            return;
        }
        if self.hours_editor.is_some() {
            self.handle_editor_key(key);
            return;
        }
        if self.date_popup.is_some() {
            self.handle_date_key(key);
            return;
        }
        if self.price_popup.is_some() {
            self.handle_price_key(key);
            return;
        }

        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('s') => self.navigate_to(AppView::Sales),
            KeyCode::Char('m') => self.navigate_to(AppView::Screens),
            KeyCode::Char('?') => {
                if self.view == AppView::Help {
                    self.go_back();
                } else {
                    self.navigate_to(AppView::Help);
                }
            }
            KeyCode::Tab => {
                self.focus_mode = match self.focus_mode {
                    FocusMode::TabBar => FocusMode::Content,
                    FocusMode::Content => FocusMode::TabBar,
                };
            }
            KeyCode::Left if self.focus_mode == FocusMode::TabBar => {
                self.selected_tab_index = (self.selected_tab_index + TABS.len() - 1) % TABS.len();
            }
            KeyCode::Right if self.focus_mode == FocusMode::TabBar => {
                self.selected_tab_index = (self.selected_tab_index + 1) % TABS.len();
            }
            KeyCode::Up if self.focus_mode == FocusMode::Content => self.move_selection_up(),
            KeyCode::Down if self.focus_mode == FocusMode::Content => self.move_selection_down(),
            KeyCode::Enter => {
                if self.focus_mode == FocusMode::TabBar {
                    self.navigate_to(TABS[self.selected_tab_index].clone());
                    self.focus_mode = FocusMode::Content;
                } else if self.view == AppView::Screens {
                    self.open_selected_screen();
                }
            }
            KeyCode::Esc => self.go_back(),
            KeyCode::Char('r') => match self.view {
                AppView::Sales => self.load_sales(),
                AppView::Screens | AppView::ScreenDetail => self.load_screens(),
                AppView::Help => {}
            },
            KeyCode::Char('l') if !self.auth.is_logged_in() => self.open_login_popup(),
            KeyCode::Char('L') => self.logout(),
            KeyCode::Char('f') => match self.view {
                AppView::Sales => self.date_popup = Some(DateRangePopup::new(self.sales.range())),
                AppView::Screens => {
                    self.price_popup = Some(PriceFilterPopup::new(self.map.filters().price_range))
                }
                _ => {}
            },
            KeyCode::Char('x') => match self.view {
                AppView::Sales => {
                    self.sales.reset_filter();
                    self.status = None;
                }
                AppView::Screens => {
                    self.map.reset_filters();
                    self.clamp_screen_selection();
                }
                _ => {}
            },
            KeyCode::Char('o') if self.view == AppView::Screens => {
                self.update_filters(|filters| {
                    filters.screen_type = match filters.screen_type {
                        None => Some(ScreenType::Outdoor),
                        Some(ScreenType::Outdoor) => Some(ScreenType::Indoor),
                        Some(ScreenType::Indoor) => None,
                    }
                });
            }
            KeyCode::Char('a') if self.view == AppView::Screens => {
                self.update_filters(|filters| {
                    filters.is_active = next_active_filter(filters.is_active)
                });
            }
            KeyCode::Char('k') if self.view == AppView::Screens => {
                self.update_filters(|filters| filters.radius_km = next_radius(filters.radius_km));
            }
            KeyCode::Char('e') if self.view == AppView::ScreenDetail => self.open_hours_editor(),
            _ => {}
        }
    }

    fn navigate_to(&mut self, view: AppView) {
        if self.view == view {
            return;
        }
        self.view_history.push(self.view.clone());
        self.view = view;
        self.load_content_for_view();
        if let Some(index) = TABS.iter().position(|tab| {
            *tab == self.view || (self.view == AppView::ScreenDetail && *tab == AppView::Screens)
        }) {
            self.selected_tab_index = index;
        }
    }

    fn go_back(&mut self) {
        if let Some(previous) = self.view_history.pop() {
            self.view = previous;
            self.load_content_for_view();
        }
        self.status = None;
    }

    fn load_content_for_view(&mut self) {
        match self.view {
            AppView::Sales if !self.sales_loaded => self.load_sales(),
            AppView::Screens if !self.screens_loaded => self.load_screens(),
            _ => {}
        }
    }

    fn load_sales(&mut self) {
        match self.api.fetch_sales() {
            Ok(sales) => {
                let range = self.sales.range().copied();
                self.sales = SalesBoard::new(sales);
                if let Some(range) = range {
                    self.sales.filter_in(range, self.zone);
                }
                self.sales_loaded = true;
                self.status = None;
            }
            Err(err) => {
                tracing::warn!("loading sales failed: {err}");
                self.status = Some(err.user_message());
            }
        }
    }

    fn load_screens(&mut self) {
        let Some(session) = self.auth.session() else {
            self.status = Some("Inicia sesión para ver las pantallas".to_string());
            self.open_login_popup();
            return;
        };
        let params = QueryParams::first_page(self.config.page_size);
        match self.api.fetch_screens(session, &params) {
            Ok(response) => {
                let located = add_location_to_screens(response.data, &mut rand::rng());
                let mut filters = self.map.filters().clone();
                if !self.screens_loaded {
                    filters.radius_km = self.config.default_radius_km;
                }
                self.map = ScreenMap::new(located);
                self.map.apply_filters(filters, &self.zone.now());
                self.screens_total = response.total_count;
                self.screens_loaded = true;
                self.clamp_screen_selection();
                self.status = None;
            }
            Err(err) => {
                tracing::warn!("loading screens failed: {err}");
                self.status = Some(err.user_message());
                if matches!(err, ApiError::Unauthorized) {
                    self.open_login_popup();
                }
            }
        }
    }

    fn update_filters(&mut self, change: impl FnOnce(&mut MapFilters)) {
        let mut filters = self.map.filters().clone();
        change(&mut filters);
        self.map.apply_filters(filters, &self.zone.now());
        self.last_refresh = Instant::now();
        self.clamp_screen_selection();
    }

    fn clamp_screen_selection(&mut self) {
        let len = self.map.visible().len();
        if self.selected_screen_index >= len {
            self.selected_screen_index = len.saturating_sub(1);
        }
    }

    fn move_selection_up(&mut self) {
        if self.view != AppView::Screens || self.map.visible().is_empty() {
            return;
        }
        let len = self.map.visible().len();
        self.selected_screen_index = (self.selected_screen_index + len - 1) % len;
    }

    fn move_selection_down(&mut self) {
        if self.view != AppView::Screens || self.map.visible().is_empty() {
            return;
        }
        self.selected_screen_index = (self.selected_screen_index + 1) % self.map.visible().len();
    }

    fn open_selected_screen(&mut self) {
        let Some(screen) = self.map.visible().get(self.selected_screen_index) else {
            self.status = Some("No hay pantalla seleccionada".to_string());
            return;
        };
        self.detail_id = Some(screen.id.clone());
        self.navigate_to(AppView::ScreenDetail);
    }

    pub fn detail_screen(&self) -> Option<&ScreenWithLocation> {
        self.detail_id.as_deref().and_then(|id| self.map.find(id))
    }

    /// The draft for `screen` if one exists, else its stored hours.
    pub fn hours_for(&self, screen: &ScreenWithLocation) -> (WorkingHours, bool) {
        match self.drafts.get(&screen.id) {
            Some(draft) => (draft.clone(), true),
            None => (screen.screen.editable_hours(), false),
        }
    }

    pub fn is_active(&self, screen: &ScreenWithLocation) -> bool {
        screen.screen.is_active_at(&self.zone.now())
    }

    fn open_login_popup(&mut self) {
        self.auth.clear_error();
        let email = self.auth.user().map(|user| user.email.clone());
        self.login_popup = Some(LoginPopup::new(email.as_deref()));
    }

    fn handle_login_key(&mut self, key: KeyCode) {
        let Some(popup) = self.login_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => {
                self.login_popup = None;
                self.auth.clear_error();
            }
            KeyCode::Enter => {
                let body = popup.body();
                if self.auth.login(self.api.as_ref(), &self.db, &body) {
                    self.login_popup = None;
                    let name = self.auth.user().map(|user| user.name.clone()).unwrap_or_default();
                    if matches!(self.view, AppView::Screens | AppView::ScreenDetail) {
                        self.load_screens();
                    }
                    self.status = Some(format!("Sesión iniciada como {name}"));
                }
            }
            other => popup.handle_key(other),
        }
    }

    fn logout(&mut self) {
        if let Err(err) = self.auth.logout(&self.db) {
            tracing::warn!("clearing session failed: {err:#}");
        }
        self.map = ScreenMap::default();
        self.screens_total = 0;
        self.screens_loaded = false;
        self.detail_id = None;
        self.view_history.clear();
        self.view = AppView::Sales;
        self.selected_tab_index = 0;
        self.status = Some("Sesión cerrada".to_string());
    }

    fn handle_date_key(&mut self, key: KeyCode) {
        let Some(popup) = self.date_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => self.date_popup = None,
            KeyCode::Enter => match popup.parse() {
                Ok(range) => {
                    self.sales.filter_in(range, self.zone);
                    self.date_popup = None;
                    self.status = None;
                }
                Err(message) => self.status = Some(message),
            },
            other => popup.handle_key(other),
        }
    }

    fn handle_price_key(&mut self, key: KeyCode) {
        let Some(popup) = self.price_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => self.price_popup = None,
            KeyCode::Enter => match popup.parse() {
                Ok(range) => {
                    self.price_popup = None;
                    self.status = None;
                    self.update_filters(|filters| filters.price_range = range);
                }
                Err(message) => self.status = Some(message),
            },
            other => popup.handle_key(other),
        }
    }

    fn open_hours_editor(&mut self) {
        let Some(screen) = self.detail_screen() else {
            return;
        };
        let (hours, _) = self.hours_for(screen);
        let editor = HoursEditor::new(screen.id.clone(), hours);
        self.hours_editor = Some(editor);
    }

    fn handle_editor_key(&mut self, key: KeyCode) {
        let Some(editor) = self.hours_editor.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => self.hours_editor = None,
            KeyCode::Left => editor.prev_day(),
            KeyCode::Right => editor.next_day(),
            KeyCode::Up => editor.select_prev(),
            KeyCode::Down => editor.select_next(),
            KeyCode::Tab => editor.toggle_field(),
            KeyCode::Enter => {
                if editor.add_range().is_ok() {
                    let (id, hours) = (editor.screen_id.clone(), editor.hours.clone());
                    self.store_draft(id, hours);
                }
            }
            KeyCode::Delete => {
                if editor.remove_selected() {
                    let (id, hours) = (editor.screen_id.clone(), editor.hours.clone());
                    self.store_draft(id, hours);
                }
            }
            KeyCode::Char('p') => {
                let (id, hours) = (editor.screen_id.clone(), editor.hours.clone());
                self.push_hours(id, hours);
            }
            other => editor.edit(other),
        }
    }

    fn store_draft(&mut self, screen_id: ScreenId, hours: WorkingHours) {
        match db::save_draft(&screen_id, &hours, &self.db) {
            Ok(()) => {
                self.drafts.insert(screen_id, hours);
                self.status = Some("Borrador guardado".to_string());
            }
            Err(err) => self.status = Some(format!("No se pudo guardar el borrador: {err}")),
        }
    }

    fn push_hours(&mut self, screen_id: ScreenId, hours: WorkingHours) {
        let Some(session) = self.auth.session() else {
            self.status = Some("Inicia sesión para guardar el horario".to_string());
            self.open_login_popup();
            return;
        };
        if let Err(err) = self.api.update_screen_rules(session, &screen_id, &hours) {
            tracing::warn!("pushing hours for {screen_id} failed: {err}");
            self.status = Some(err.user_message());
            return;
        }
        if let Err(err) = db::delete_draft(&screen_id, &self.db) {
            tracing::warn!("deleting draft for {screen_id} failed: {err:#}");
        }
        self.drafts.remove(&screen_id);
        match hours.to_json_string() {
            Ok(rules) => {
                self.map.set_rules(&screen_id, rules);
                self.map.refresh(&self.zone.now());
                self.clamp_screen_selection();
            }
            Err(err) => tracing::warn!("encoding hours for {screen_id} failed: {err}"),
        }
        self.hours_editor = None;
        self.status = Some("Horario actualizado".to_string());
    }
}
