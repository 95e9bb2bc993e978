use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use crate::hours::{self, Decoded, WorkingHours};

pub type ScreenId = String;
pub type SaleId = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenType {
    Outdoor,
    Indoor,
}

impl ScreenType {
    pub fn as_str(self) -> &'static str {
        match self {
            ScreenType::Outdoor => "outdoor",
            ScreenType::Indoor => "indoor",
        }
    }
}

impl fmt::Display for ScreenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ScreenType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "outdoor" => Ok(ScreenType::Outdoor),
            "indoor" => Ok(ScreenType::Indoor),
            other => Err(format!("unknown screen type '{other}'")),
        }
    }
}

/// A bookable display as the API returns it. Numeric fields arrive as strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Screen {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ScreenId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub price_per_day: String,
    pub resolution_height: String,
    pub resolution_width: String,
    #[serde(rename = "type")]
    pub screen_type: ScreenType,
    /// JSON-encoded working hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
}

impl Screen {
    /// `None` when the price is not a number.
    pub fn price(&self) -> Option<f64> {
        self.price_per_day
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite())
    }

    pub fn decoded_hours(&self) -> Decoded {
        hours::decode_lenient(self.rules.as_deref())
    }

    /// Decoded `rules`; empty when missing or malformed.
    pub fn working_hours(&self) -> WorkingHours {
        self.decoded_hours().into_hours()
    }

    /// Starting point for an edit: the stored hours, or a blank week when the
    /// screen has none or they cannot be read.
    pub fn editable_hours(&self) -> WorkingHours {
        let decoded = self.decoded_hours();
        if decoded.is_defaulted() {
            WorkingHours::empty_week()
        } else {
            decoded.into_hours()
        }
    }

    pub fn is_active_at<Tz: TimeZone>(&self, moment: &DateTime<Tz>) -> bool {
        hours::is_active_at(&self.working_hours(), moment)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScreenWithLocation {
    pub id: ScreenId,
    pub screen: Screen,
    pub location: Location,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapFilters {
    pub screen_type: Option<ScreenType>,
    pub price_range: Option<PriceRange>,
    pub is_active: Option<bool>,
    pub radius_km: Option<f64>,
}

impl MapFilters {
    pub fn is_empty(&self) -> bool {
        *self == MapFilters::default()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParams {
    pub page_size: u32,
    pub offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub screen_type: Option<ScreenType>,
}

impl QueryParams {
    pub fn first_page(page_size: u32) -> Self {
        Self {
            page_size,
            offset: 0,
            name: None,
            screen_type: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenListResponse {
    pub total_count: u64,
    pub data: Vec<Screen>,
}

/// One dated revenue point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: SaleId,
    pub date: String,
    pub value: f64,
}

impl Sale {
    pub fn placeholder() -> Self {
        Self {
            id: 0,
            date: String::new(),
            value: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesStats {
    pub total_sales: f64,
    pub average_sales: f64,
    pub min_sales: Sale,
    pub max_sales: Sale,
    pub total_days: usize,
}

/// Inclusive calendar range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub email: String,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct AuthBody {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub name: String,
}

/// Locally edited working hours that have not been pushed yet.
#[derive(Clone, Debug, PartialEq)]
pub struct HoursDraft {
    pub screen_id: ScreenId,
    pub hours: WorkingHours,
    pub updated_at: DateTime<Local>,
}
