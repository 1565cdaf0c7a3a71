//! Place-name geocoding.
//!
//! Failures here never abort a chart: the pipeline substitutes its fallback
//! observer and reports a warning instead.

use std::collections::HashMap;

use ephemeris::ObserverLocation;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GeocoderConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not resolve '{query}': {reason}")]
pub struct Unresolved {
    pub query: String,
    pub reason: String,
}

impl Unresolved {
    fn new(query: &str, reason: impl Into<String>) -> Self {
        Self {
            query: query.to_string(),
            reason: reason.into(),
        }
    }
}

/// Resolves place names to observer locations.
pub trait Geocoder {
    fn geocode(&self, name: &str) -> Result<ObserverLocation, Unresolved>;
}

/// Geocoder backed by an OpenStreetMap Nominatim search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    agent: ureq::Agent,
    endpoint: String,
    user_agent: String,
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout()))
            .build()
            .into();
        Self {
            agent,
            endpoint: config.endpoint.clone(),
            user_agent: config.user_agent.clone(),
        }
    }

    fn search(&self, name: &str) -> Result<Vec<Place>, String> {
        self.agent
            .get(&self.endpoint)
            .query("q", name)
            .query("format", "jsonv2")
            .query("limit", "1")
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|e| e.to_string())?
            .body_mut()
            .read_json::<Vec<Place>>()
            .map_err(|e| e.to_string())
    }
}

/// Turn a Nominatim result's string coordinates into a validated location.
fn place_location(place: &Place) -> Option<ObserverLocation> {
    let latitude = place.lat.trim().parse().ok()?;
    let longitude = place.lon.trim().parse().ok()?;
    ObserverLocation::new(latitude, longitude).ok()
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, name: &str) -> Result<ObserverLocation, Unresolved> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Unresolved::new(name, "empty place name"));
        }

        let places = self
            .search(name)
            .map_err(|reason| Unresolved::new(name, reason))?;
        let place = places
            .first()
            .ok_or_else(|| Unresolved::new(name, "no matching place"))?;
        let location = place_location(place)
            .ok_or_else(|| Unresolved::new(name, format!("bad coordinates {}, {}", place.lat, place.lon)))?;

        debug!(
            "Geocoded '{}' to {} ({})",
            name,
            location,
            place.display_name.as_deref().unwrap_or("unnamed")
        );
        Ok(location)
    }
}

/// Geocoder over a fixed table of names, matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    places: HashMap<String, ObserverLocation>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_place(mut self, name: &str, location: ObserverLocation) -> Self {
        self.places.insert(name.trim().to_lowercase(), location);
        self
    }
}

impl Geocoder for StaticGeocoder {
    fn geocode(&self, name: &str) -> Result<ObserverLocation, Unresolved> {
        self.places
            .get(&name.trim().to_lowercase())
            .copied()
            .ok_or_else(|| Unresolved::new(name, "not in place table"))
    }
}
