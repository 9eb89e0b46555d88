#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the memorial server.
//!
//! Payloads the web frontend consumes use its Portuguese keys
//! (`totalHomicidios`, `fallbackData`, ...).

use memorial_fogo_cruzado_models::{FogoCruzadoReport, NeighborhoodSummary};
use memorial_geography_models::{CoordinateReport, Landmark, NeighborhoodStats, VictimLight};
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

/// `{ "error": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable message.
    pub error: String,
}

impl ApiError {
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `{ "message": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    /// Human-readable message.
    pub message: String,
}

/// Query parameters for `GET /api/fogo-cruzado`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FogoCruzadoQueryParams {
    /// `YYYY-MM-DD`. Defaults to 365 days ago.
    pub initial_date: Option<String>,
    /// `YYYY-MM-DD`. Defaults to today.
    pub final_date: Option<String>,
}

/// Successful `GET /api/fogo-cruzado` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FogoCruzadoResponse {
    /// Always `true`.
    pub success: bool,
    /// The report.
    pub data: FogoCruzadoReport,
}

/// Local numbers served when the API is unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackData {
    /// Homicides.
    pub total_homicidios: u64,
    /// Injured.
    pub total_feridos: u64,
    /// Occurrences.
    pub total_ocorrencias: u64,
    /// Always empty.
    pub bairros: Vec<NeighborhoodSummary>,
    /// Source attribution.
    pub fonte: String,
    /// Explanation shown to the user.
    pub note: String,
}

impl Default for FallbackData {
    fn default() -> Self {
        Self {
            total_homicidios: 161,
            total_feridos: 50,
            total_ocorrencias: 200,
            bairros: Vec::new(),
            fonte: "Dados locais (SSP-BA)".to_string(),
            note: "Dados do Fogo Cruzado indisponíveis, usando dados locais".to_string(),
        }
    }
}

/// Degraded `GET /api/fogo-cruzado` response, still sent with HTTP 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FogoCruzadoFallback {
    /// Always `false`.
    pub success: bool,
    /// Short error message.
    pub error: String,
    /// Local numbers.
    pub fallback_data: FallbackData,
}

impl Default for FogoCruzadoFallback {
    fn default() -> Self {
        Self {
            success: false,
            error: "API Fogo Cruzado indisponível".to_string(),
            fallback_data: FallbackData::default(),
        }
    }
}

/// Query parameters for `GET /api/neighborhoods`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NeighborhoodsQueryParams {
    /// Include victim lights.
    #[serde(default)]
    pub lights: Option<bool>,
}

/// Where the neighborhood total came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TotalSource {
    /// The crime-data API.
    FogoCruzado,
    /// The local statistics file.
    Local,
    /// The built-in constant.
    Fallback,
}

/// `GET /api/neighborhoods` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodsResponse {
    /// City-wide homicide total the stats were derived from.
    pub total_homicides: u64,
    /// Where the total came from.
    pub source: TotalSource,
    /// Per-neighborhood stats.
    pub neighborhoods: Vec<NeighborhoodStats>,
    /// Victim lights, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lights: Option<Vec<VictimLight>>,
}

/// `GET /api/landmarks` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandmarksResponse {
    /// Reference landmarks.
    pub landmarks: Vec<Landmark>,
    /// Land/water check of every neighborhood centre and landmark.
    pub coordinates: CoordinateReport,
}
