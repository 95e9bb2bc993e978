//! Blocking HTTP client for the marketplace REST API.
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult, MarketplaceApi};
use crate::hours::WorkingHours;
use crate::session::Session;
use crate::types::{AuthBody, LoginResponse, QueryParams, Sale, ScreenListResponse};

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(request: RequestBuilder, session: &Session) -> RequestBuilder {
        request.header(AUTHORIZATION, format!("Bearer {}", session.token))
    }

    fn read_json<T: DeserializeOwned>(response: Response, resource: &'static str) -> ApiResult<T> {
        let response = Self::check_status(response, resource)?;
        Ok(response.json()?)
    }

    fn check_status(response: Response, resource: &'static str) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        tracing::warn!("{} {} -> {}", resource, response.url(), status);
        Err(ApiError::from_status(status, resource))
    }
}

impl MarketplaceApi for ApiClient {
    fn fetch_sales(&self) -> ApiResult<Vec<Sale>> {
        let url = self.url("sales");
        tracing::debug!("GET {url}");
        let response = self.client.get(&url).send()?;
        Self::read_json(response, "ventas")
    }

    fn fetch_screens(
        &self,
        session: &Session,
        params: &QueryParams,
    ) -> ApiResult<ScreenListResponse> {
        let url = self.url("screens");
        tracing::debug!("GET {url} page_size={} offset={}", params.page_size, params.offset);
        let request = Self::authorized(self.client.get(&url).query(params), session);
        Self::read_json(request.send()?, "pantallas")
    }

    fn login(&self, body: &AuthBody) -> ApiResult<LoginResponse> {
        let url = self.url("auth/login");
        tracing::debug!("POST {url} for {}", body.email);
        let response = self.client.post(&url).json(body).send()?;
        Self::read_json(response, "usuario")
    }

    fn update_screen_rules(
        &self,
        session: &Session,
        screen_id: &str,
        hours: &WorkingHours,
    ) -> ApiResult<()> {
        #[derive(serde::Serialize)]
        struct RulesPatch {
            rules: String,
        }

        let url = self.url(&format!("screens/{screen_id}"));
        let body = RulesPatch {
            rules: hours.to_json_string()?,
        };
        tracing::debug!("PATCH {url}");
        let request = Self::authorized(self.client.patch(&url).json(&body), session);
        Self::check_status(request.send()?, "pantalla")?;
        Ok(())
    }
}
