//! In-memory `MarketplaceApi` for tests.
use std::cell::{Cell, RefCell};

use reqwest::StatusCode;

use super::{ApiError, ApiResult, MarketplaceApi};
use crate::hours::WorkingHours;
use crate::session::Session;
use crate::types::{
    AuthBody, LoginResponse, QueryParams, Sale, Screen, ScreenListResponse, ScreenType,
};

pub const TOKEN: &str = "tok";
pub const PASSWORD: &str = "secret";

#[derive(Default)]
pub struct StubApi {
    pub sales: Vec<Sale>,
    pub screens: Vec<Screen>,
    pub sales_status: Option<StatusCode>,
    pub login_calls: Cell<usize>,
    pub pushed: RefCell<Vec<(String, String)>>,
}

impl StubApi {
    pub fn with_sales(mut self, sales: Vec<Sale>) -> Self {
        self.sales = sales;
        self
    }

    pub fn with_screens(mut self, screens: Vec<Screen>) -> Self {
        self.screens = screens;
        self
    }

    pub fn failing_sales(mut self, status: StatusCode) -> Self {
        self.sales_status = Some(status);
        self
    }
}

impl MarketplaceApi for StubApi {
    fn fetch_sales(&self) -> ApiResult<Vec<Sale>> {
        match self.sales_status {
            Some(status) => Err(ApiError::from_status(status, "ventas")),
            None => Ok(self.sales.clone()),
        }
    }

    fn fetch_screens(
        &self,
        session: &Session,
        params: &QueryParams,
    ) -> ApiResult<ScreenListResponse> {
        if session.token != TOKEN {
            return Err(ApiError::Unauthorized);
        }
        let matching: Vec<Screen> = self
            .screens
            .iter()
            .filter(|screen| {
                params
                    .name
                    .as_deref()
                    .is_none_or(|name| screen.name.to_lowercase().contains(&name.to_lowercase()))
            })
            .filter(|screen| params.screen_type.is_none_or(|kind| screen.screen_type == kind))
            .cloned()
            .collect();
        Ok(ScreenListResponse {
            total_count: matching.len() as u64,
            data: matching
                .into_iter()
                .skip(params.offset as usize)
                .take(params.page_size as usize)
                .collect(),
        })
    }

    fn login(&self, body: &AuthBody) -> ApiResult<LoginResponse> {
        self.login_calls.set(self.login_calls.get() + 1);
        if body.password != PASSWORD {
            return Err(ApiError::Unauthorized);
        }
        Ok(LoginResponse {
            token: TOKEN.to_string(),
            email: body.email.clone(),
            name: "Ana".to_string(),
        })
    }

    fn update_screen_rules(
        &self,
        session: &Session,
        screen_id: &str,
        hours: &WorkingHours,
    ) -> ApiResult<()> {
        if session.token != TOKEN {
            return Err(ApiError::Unauthorized);
        }
        if !self.screens.iter().any(|s| s.id.as_deref() == Some(screen_id)) {
            return Err(ApiError::NotFound {
                resource: "pantalla",
            });
        }
        self.pushed
            .borrow_mut()
            .push((screen_id.to_string(), hours.to_json_string()?));
        Ok(())
    }
}

pub fn screen(id: &str, kind: ScreenType, price: &str, rules: Option<&str>) -> Screen {
    Screen {
        id: Some(id.to_string()),
        name: format!("Pantalla {id}"),
        description: String::new(),
        picture_url: None,
        user_id: Some(1),
        price_per_day: price.to_string(),
        resolution_height: "1080".to_string(),
        resolution_width: "1920".to_string(),
        screen_type: kind,
        rules: rules.map(str::to_string),
    }
}

pub fn sale(id: i64, date: &str, value: f64) -> Sale {
    Sale {
        id,
        date: date.to_string(),
        value,
    }
}
