//! Mock geolocation of screens, map center and screen filtering.
use chrono::{DateTime, TimeZone};
use rand::{Rng, RngExt};

use crate::types::{Location, MapFilters, Screen, ScreenWithLocation};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Known Buenos Aires locations keyed by screen id.
const MOCK_LOCATIONS: [(&str, f64, f64, &str); 10] = [
    ("1", -34.6037, -58.3816, "Av. Corrientes 1234, CABA"),
    ("2", -34.6118, -58.396, "Av. Santa Fe 5678, CABA"),
    ("3", -34.6097, -58.3732, "Av. 9 de Julio 1000, CABA"),
    ("4", -34.6158, -58.4333, "Av. Rivadavia 2000, CABA"),
    ("5", -34.6205, -58.3732, "Av. Callao 1500, CABA"),
    ("6", -34.6037, -58.3816, "Av. Corrientes 2000, CABA"),
    ("7", -34.6118, -58.396, "Av. Santa Fe 3000, CABA"),
    ("8", -34.6097, -58.3732, "Av. 9 de Julio 2000, CABA"),
    ("9", -34.6158, -58.4333, "Av. Rivadavia 3000, CABA"),
    ("10", -34.6205, -58.3732, "Av. Callao 2500, CABA"),
];

fn location_at(index: usize) -> Location {
    let (_, lat, lng, address) = MOCK_LOCATIONS[index];
    Location {
        lat,
        lng,
        address: address.to_string(),
    }
}

pub fn mock_location(id: &str) -> Option<Location> {
    MOCK_LOCATIONS
        .iter()
        .position(|(key, ..)| *key == id)
        .map(location_at)
}

pub fn random_location<R: Rng + ?Sized>(rng: &mut R) -> Location {
    location_at(rng.random_range(0..MOCK_LOCATIONS.len()))
}

/// Gives every screen an id and a location. Unknown or missing ids draw a
/// table entry from `rng`.
pub fn add_location_to_screens<R: Rng + ?Sized>(
    screens: Vec<Screen>,
    rng: &mut R,
) -> Vec<ScreenWithLocation> {
    screens
        .into_iter()
        .map(|screen| {
            let location = screen
                .id
                .as_deref()
                .and_then(mock_location)
                .unwrap_or_else(|| random_location(rng));
            let id = match &screen.id {
                Some(id) if !id.is_empty() => id.clone(),
                _ => format!("local-{:016x}", rng.random::<u64>()),
            };
            ScreenWithLocation {
                id,
                screen,
                location,
            }
        })
        .collect()
}

pub fn default_center() -> Location {
    Location {
        lat: -34.6037,
        lng: -58.3816,
        address: "Centro de Buenos Aires".to_string(),
    }
}

/// Mean latitude and longitude, or the Buenos Aires center when empty.
pub fn get_map_center(screens: &[ScreenWithLocation]) -> Location {
    if screens.is_empty() {
        return default_center();
    }
    let count = screens.len() as f64;
    let lat = screens.iter().map(|s| s.location.lat).sum::<f64>() / count;
    let lng = screens.iter().map(|s| s.location.lng).sum::<f64>() / count;
    Location {
        lat,
        lng,
        address: "Centro calculado".to_string(),
    }
}

/// Haversine great-circle distance in kilometers.
pub fn calculate_distance(a: &Location, b: &Location) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

pub fn filter_screens_by_radius(
    screens: &[ScreenWithLocation],
    center: &Location,
    radius_km: f64,
) -> Vec<ScreenWithLocation> {
    screens
        .iter()
        .filter(|screen| calculate_distance(center, &screen.location) <= radius_km)
        .cloned()
        .collect()
}

/// Runs the type, price, active and radius filters in that order. The radius
/// is measured from the center of the unfiltered set.
pub fn apply_filters<Tz: TimeZone>(
    screens: &[ScreenWithLocation],
    filters: &MapFilters,
    moment: &DateTime<Tz>,
) -> Vec<ScreenWithLocation> {
    let matching: Vec<ScreenWithLocation> = screens
        .iter()
        .filter(|s| {
            filters
                .screen_type
                .is_none_or(|wanted| s.screen.screen_type == wanted)
        })
        .filter(|s| {
            filters.price_range.is_none_or(|range| {
                s.screen
                    .price()
                    .is_some_and(|price| price >= range.min && price <= range.max)
            })
        })
        .filter(|s| {
            filters
                .is_active
                .is_none_or(|wanted| s.screen.is_active_at(moment) == wanted)
        })
        .cloned()
        .collect();
    match filters.radius_km {
        Some(radius) => filter_screens_by_radius(&matching, &get_map_center(screens), radius),
        None => matching,
    }
}

/// Located screens with the filters currently applied to them.
#[derive(Clone, Debug, Default)]
pub struct ScreenMap {
    all: Vec<ScreenWithLocation>,
    visible: Vec<ScreenWithLocation>,
    filters: MapFilters,
}

impl ScreenMap {
    pub fn new(screens: Vec<ScreenWithLocation>) -> Self {
        Self {
            visible: screens.clone(),
            all: screens,
            filters: MapFilters::default(),
        }
    }

    pub fn all(&self) -> &[ScreenWithLocation] {
        &self.all
    }

    pub fn visible(&self) -> &[ScreenWithLocation] {
        &self.visible
    }

    pub fn filters(&self) -> &MapFilters {
        &self.filters
    }

    pub fn apply_filters<Tz: TimeZone>(&mut self, filters: MapFilters, moment: &DateTime<Tz>) {
        self.visible = apply_filters(&self.all, &filters, moment);
        self.filters = filters;
    }

    pub fn reset_filters(&mut self) {
        self.filters = MapFilters::default();
        self.visible = self.all.clone();
    }

    /// Re-runs the current filters, e.g. after the active check's minute changed.
    pub fn refresh<Tz: TimeZone>(&mut self, moment: &DateTime<Tz>) {
        self.visible = apply_filters(&self.all, &self.filters, moment);
    }

    pub fn find(&self, id: &str) -> Option<&ScreenWithLocation> {
        self.all.iter().find(|screen| screen.id == id)
    }

    /// Replaces a screen's encoded rules. Returns false for unknown ids.
    pub fn set_rules(&mut self, id: &str, rules: String) -> bool {
        let mut found = false;
        for screen in self.all.iter_mut().chain(self.visible.iter_mut()) {
            if screen.id == id {
                screen.screen.rules = Some(rules.clone());
                found = true;
            }
        }
        found
    }

    /// Center of every loaded screen; the radius filter measures from here.
    pub fn full_center(&self) -> Location {
        get_map_center(&self.all)
    }
}
