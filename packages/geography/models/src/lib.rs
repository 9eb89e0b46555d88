#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood and coordinate types for the Salvador map.
//!
//! Neighborhoods are a small static table; statistics and victim lights
//! are derived from it plus a city-wide homicide total.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Violence level shown on a neighborhood card.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ViolenceLevel {
    /// `alto`
    #[serde(rename = "alto")]
    #[strum(serialize = "alto")]
    High,
    /// `medio`
    #[serde(rename = "medio")]
    #[strum(serialize = "medio")]
    Medium,
    /// `baixo`
    #[serde(rename = "baixo")]
    #[strum(serialize = "baixo")]
    Low,
}

/// A neighborhood from the static table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighborhood {
    /// Slug, e.g. `"centro-historico"`.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Centre latitude.
    pub lat: f64,
    /// Centre longitude.
    pub lng: f64,
    /// Resident population.
    pub population: u32,
    /// Share of city homicides attributed when no real count is known.
    pub violence_share: f64,
    /// Short description.
    pub description: &'static str,
    /// Violence level.
    pub level: ViolenceLevel,
}

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CityBounds {
    /// Northern latitude limit.
    pub north: f64,
    /// Southern latitude limit.
    pub south: f64,
    /// Eastern longitude limit.
    pub east: f64,
    /// Western longitude limit.
    pub west: f64,
}

impl CityBounds {
    #[must_use]
    pub fn contains_lat(&self, lat: f64) -> bool {
        (self.south..=self.north).contains(&lat)
    }

    #[must_use]
    pub fn contains_lng(&self, lng: f64) -> bool {
        (self.west..=self.east).contains(&lng)
    }

    /// Inclusive on every edge.
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        self.contains_lat(lat) && self.contains_lng(lng)
    }
}

/// A named point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Label used in warnings.
    pub name: String,
}

/// Result of validating a batch of coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateReport {
    /// Coordinates on land inside the city.
    pub valid: Vec<Coordinate>,
    /// Coordinates that failed at least one rule.
    pub invalid: Vec<Coordinate>,
    /// One message per violated rule.
    pub warnings: Vec<String>,
}

/// A known landmark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Landmark {
    /// Slug.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

/// A real homicide count reported for a neighborhood name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodCount {
    /// Neighborhood name as reported by the source.
    pub neighborhood: String,
    /// Homicides.
    pub homicides: u64,
}

/// Derived statistics for one neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodStats {
    /// Slug.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Centre latitude.
    pub lat: f64,
    /// Centre longitude.
    pub lng: f64,
    /// Homicides, real or estimated.
    pub homicides: u64,
    /// Whether `homicides` came from a real per-neighborhood count.
    pub from_source: bool,
    /// Resident population.
    pub population: u32,
    /// Homicides per 100 000 residents, one decimal.
    pub rate: f64,
    /// Short description.
    pub description: String,
    /// Violence level.
    pub level: ViolenceLevel,
    /// Share used for estimation.
    pub violence_share: f64,
}

/// One point of light per victim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VictimLight {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Neighborhood display name.
    pub neighborhood: String,
}
