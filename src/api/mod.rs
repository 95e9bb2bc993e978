//! REST collaborator: sales, screens, login and working-hours submission.
mod client;
mod error;
#[cfg(test)]
pub mod stub;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};

use crate::hours::WorkingHours;
use crate::session::Session;
use crate::types::{AuthBody, LoginResponse, QueryParams, Sale, ScreenListResponse};

/// Remote operations the dashboard depends on.
pub trait MarketplaceApi {
    fn fetch_sales(&self) -> ApiResult<Vec<Sale>>;

    fn fetch_screens(&self, session: &Session, params: &QueryParams)
    -> ApiResult<ScreenListResponse>;

    fn login(&self, body: &AuthBody) -> ApiResult<LoginResponse>;

    /// Submits `hours` as the screen's JSON-encoded `rules` field.
    fn update_screen_rules(
        &self,
        session: &Session,
        screen_id: &str,
        hours: &WorkingHours,
    ) -> ApiResult<()>;
}
