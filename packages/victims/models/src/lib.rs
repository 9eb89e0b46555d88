#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Victim tribute types.
//!
//! [`NewVictimRequest`] mirrors the submission form; [`NewVictimRequest::validate`]
//! turns it into a [`NewVictim`] ready to be stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A stored tribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Victim {
    /// UUID v4.
    pub id: String,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Neighborhood where it happened.
    pub neighborhood: String,
    /// Date of death.
    pub date: NaiveDate,
    /// Tribute text.
    pub tribute: String,
    /// Who submitted the tribute.
    pub submitted_by: String,
    /// Optional image URL.
    pub image: Option<String>,
    /// Whether the tribute is publicly listed.
    pub is_approved: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Accepts `"age": 25` as well as `"age": "25"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AgeInput {
    /// JSON number.
    Number(i64),
    /// JSON string.
    Text(String),
}

/// A submission as sent by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewVictimRequest {
    /// Full name.
    #[serde(default)]
    pub name: Option<String>,
    /// Age, number or numeric string.
    #[serde(default)]
    pub age: Option<AgeInput>,
    /// `YYYY-MM-DD` or RFC 3339.
    #[serde(default)]
    pub date: Option<String>,
    /// Neighborhood.
    #[serde(default)]
    pub location: Option<String>,
    /// Tribute text.
    #[serde(default)]
    pub description: Option<String>,
    /// Submitter.
    #[serde(default)]
    pub author: Option<String>,
    /// Optional image URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// A validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVictim {
    pub name: String,
    pub age: u32,
    pub neighborhood: String,
    pub date: NaiveDate,
    pub tribute: String,
    pub submitted_by: String,
    pub image: Option<String>,
}

/// Why a submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A required field is absent or blank.
    #[error("Campo obrigatório ausente: {0}")]
    Missing(&'static str),

    /// The age is not a positive integer.
    #[error("Idade inválida: {0}")]
    InvalidAge(String),

    /// The date is neither `YYYY-MM-DD` nor RFC 3339.
    #[error("Data inválida: {0}")]
    InvalidDate(String),
}

fn required(value: Option<&str>, field: &'static str) -> Result<String, ValidationError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(ValidationError::Missing(field))
}

/// Parses a positive age from either a number or a numeric string.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidAge`] for zero, negative, fractional
/// or non-numeric input.
pub fn parse_age(age: &AgeInput) -> Result<u32, ValidationError> {
    let parsed = match age {
        AgeInput::Number(n) => u32::try_from(*n).ok(),
        AgeInput::Text(text) => text.trim().parse::<u32>().ok(),
    };
    parsed.filter(|n| *n > 0).ok_or_else(|| {
        ValidationError::InvalidAge(match age {
            AgeInput::Number(n) => n.to_string(),
            AgeInput::Text(text) => text.clone(),
        })
    })
}

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp (taking its UTC date).
///
/// # Errors
///
/// Returns [`ValidationError::InvalidDate`] otherwise.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc).date_naive()))
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

impl NewVictimRequest {
    /// Checks every required field and normalizes the age and date.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking fields in
    /// form order.
    pub fn validate(&self) -> Result<NewVictim, ValidationError> {
        let name = required(self.name.as_deref(), "name")?;
        let age = self.age.as_ref().ok_or(ValidationError::Missing("age"))?;
        let age = parse_age(age)?;
        let date = required(self.date.as_deref(), "date")?;
        let date = parse_date(&date)?;
        let neighborhood = required(self.location.as_deref(), "location")?;
        let tribute = required(self.description.as_deref(), "description")?;
        let submitted_by = required(self.author.as_deref(), "author")?;
        let image = self
            .image
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);

        Ok(NewVictim {
            name,
            age,
            neighborhood,
            date,
            tribute,
            submitted_by,
            image,
        })
    }
}

/// Partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VictimPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub tribute: Option<String>,
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub is_approved: Option<bool>,
}

impl VictimPatch {
    /// `true` when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.neighborhood.is_none()
            && self.date.is_none()
            && self.tribute.is_none()
            && self.submitted_by.is_none()
            && self.image.is_none()
            && self.is_approved.is_none()
    }

    /// Applies the set fields onto `victim`.
    pub fn apply(&self, victim: &mut Victim) {
        if let Some(name) = &self.name {
            victim.name.clone_from(name);
        }
        if let Some(age) = self.age {
            victim.age = age;
        }
        if let Some(neighborhood) = &self.neighborhood {
            victim.neighborhood.clone_from(neighborhood);
        }
        if let Some(date) = self.date {
            victim.date = date;
        }
        if let Some(tribute) = &self.tribute {
            victim.tribute.clone_from(tribute);
        }
        if let Some(submitted_by) = &self.submitted_by {
            victim.submitted_by.clone_from(submitted_by);
        }
        if let Some(image) = &self.image {
            victim.image = Some(image.clone());
        }
        if let Some(is_approved) = self.is_approved {
            victim.is_approved = is_approved;
        }
    }
}
