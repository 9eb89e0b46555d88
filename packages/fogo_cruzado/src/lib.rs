#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Client for the Fogo Cruzado crime-data API.
//!
//! [`FogoCruzadoClient`] authenticates with account credentials, caches
//! the bearer token in a [`token::TokenCache`] and retries transient HTTP
//! failures. [`rollup`] condenses raw occurrences into per-neighborhood and
//! per-month summaries. The HTTP layer depends on the [`OccurrenceSource`]
//! trait rather than on the client directly.

pub mod client;
pub mod retry;
pub mod rollup;
pub mod token;

use std::fmt;

use async_trait::async_trait;
use memorial_fogo_cruzado_models::{FogoCruzadoReport, ReportPeriod};

pub use client::{FogoCruzadoClient, OccurrenceQuery};

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api-service.fogocruzado.org.br/api/v2";

/// Source attribution for reports built from this API.
pub const SOURCE_LABEL: &str = "Instituto Fogo Cruzado";

/// Errors that can occur while talking to the API.
#[derive(Debug, thiserror::Error)]
pub enum FogoCruzadoError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// `FOGO_CRUZADO_EMAIL` / `FOGO_CRUZADO_PASSWORD` are not set.
    #[error("Fogo Cruzado credentials are not configured")]
    MissingCredentials,

    /// Login was rejected.
    #[error("Authentication failed: {message}")]
    Auth {
        /// Description of what went wrong.
        message: String,
    },

    /// The server answered 401 to an authenticated request.
    #[error("Unauthorized")]
    Unauthorized,

    /// The server answered with a non-success status.
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// A state or city could not be resolved by name.
    #[error("{kind} not found: {name}")]
    NotFound {
        /// What was being looked up (`"state"`, `"city"`).
        kind: &'static str,
        /// The name that was searched for.
        name: String,
    },
}

/// Account credentials for `POST /auth/login`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Reads `FOGO_CRUZADO_EMAIL` and `FOGO_CRUZADO_PASSWORD`.
    ///
    /// Returns `None` when either is unset or empty.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("FOGO_CRUZADO_EMAIL").ok()?;
        let password = std::env::var("FOGO_CRUZADO_PASSWORD").ok()?;
        if email.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { email, password })
    }
}

/// A provider of city-level occurrence reports.
#[async_trait]
pub trait OccurrenceSource: Send + Sync {
    /// Builds the report for `period`.
    ///
    /// # Errors
    ///
    /// Returns [`FogoCruzadoError`] if the data cannot be fetched.
    async fn report(&self, period: &ReportPeriod) -> Result<FogoCruzadoReport, FogoCruzadoError>;
}

#[async_trait]
impl OccurrenceSource for FogoCruzadoClient {
    async fn report(&self, period: &ReportPeriod) -> Result<FogoCruzadoReport, FogoCruzadoError> {
        self.target_report(period).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials {
            email: "someone@example.org".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{credentials:?}");
        assert!(debug.contains("someone@example.org"));
        assert!(!debug.contains("hunter2"));
    }

    #[test]
    fn not_found_message() {
        let err = FogoCruzadoError::NotFound {
            kind: "city",
            name: "Salvador".to_string(),
        };
        assert_eq!(err.to_string(), "city not found: Salvador");
    }
}
