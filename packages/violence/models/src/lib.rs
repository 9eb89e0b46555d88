#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Violent-death record, category and statistics types.
//!
//! The SSP-BA open-data export lists victims of violent deaths per
//! municipality, month and crime category. These types describe a raw row
//! of that export, the typed record it normalizes into, and the derived
//! rollups served to the dashboard.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of positional columns in a source row.
pub const RAW_FIELD_COUNT: usize = 9;

/// Portuguese month names, indexed by `month - 1`.
pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// Returns the Portuguese name for a 1-based month, or `None` when the
/// month is outside 1-12.
#[must_use]
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(index).copied()
}

/// Violent-death categories as labelled by the upstream export.
///
/// `Display`/`FromStr` use the exact upstream label, so parsing a label is
/// case- and punctuation-sensitive.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrimeCategory {
    /// Homicídio doloso
    #[strum(serialize = "HOMICIDIO DOLOSO")]
    IntentionalHomicide,
    /// Latrocínio (robbery followed by death)
    #[strum(serialize = "ROUBO COM RESULTADO MORTE - (LATROCINIO)")]
    RobberyResultingInDeath,
    /// Lesão corporal seguida de morte
    #[strum(serialize = "LESAO CORPORAL SEGUIDA DE MORTE")]
    BodilyHarmResultingInDeath,
}

impl CrimeCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::IntentionalHomicide,
            Self::RobberyResultingInDeath,
            Self::BodilyHarmResultingInDeath,
        ]
    }

    /// Human-readable Portuguese label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::IntentionalHomicide => "Homicídio Doloso",
            Self::RobberyResultingInDeath => "Latrocínio",
            Self::BodilyHarmResultingInDeath => "Lesão Corporal Seguida de Morte",
        }
    }
}

/// The crime category of a normalized record.
///
/// Labels outside [`CrimeCategory`] are preserved verbatim: they still count
/// toward overall totals but never toward a named category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum RecordCategory {
    /// One of the recognized upstream labels.
    Known(CrimeCategory),
    /// Any other label, as it appeared in the source.
    Unrecognized(String),
}

impl RecordCategory {
    /// Classifies an upstream label.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        CrimeCategory::from_str(label)
            .map_or_else(|_| Self::Unrecognized(label.to_owned()), Self::Known)
    }

    /// Returns the recognized category, if any.
    #[must_use]
    pub const fn known(&self) -> Option<CrimeCategory> {
        match self {
            Self::Known(category) => Some(*category),
            Self::Unrecognized(_) => None,
        }
    }
}

/// One positional row of the source export.
///
/// Every field is kept as the raw string from the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// `ANO_1`, a year label column.
    pub year_label: String,
    /// `ID_REGIAO`
    pub region_id: String,
    /// `REGIAO`
    pub region: String,
    /// `ID_MUNICIPIO`
    pub municipality_id: String,
    /// `MUNICIPIO`
    pub municipality: String,
    /// `ANO`
    pub year: String,
    /// `MES`
    pub month: String,
    /// `GR_NATUREZA`
    pub category: String,
    /// `QT_VITIMAS`
    pub victims: String,
}

impl RawRecord {
    /// Builds a record from positional fields.
    ///
    /// Returns `None` when fewer than [`RAW_FIELD_COUNT`] fields are
    /// supplied. Fields beyond the ninth are ignored.
    #[must_use]
    pub fn from_fields<'a, I>(fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut fields = fields.into_iter();
        let mut next = || fields.next().map(str::to_owned);

        Some(Self {
            year_label: next()?,
            region_id: next()?,
            region: next()?,
            municipality_id: next()?,
            municipality: next()?,
            year: next()?,
            month: next()?,
            category: next()?,
            victims: next()?,
        })
    }
}

/// A `YYYY-MM` grouping key.
///
/// Ordering compares the year and month numerically, so it never depends
/// on the textual form of the key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateKey {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12 for well-formed rows.
    pub month: u32,
}

impl DateKey {
    /// Creates a key from its parts.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Parses a `YYYY-MM` key.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.split_once('-')?;
        Some(Self {
            year: year.parse().ok()?,
            month: month.parse().ok()?,
        })
    }
}

impl Ord for DateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.month.cmp(&other.month))
    }
}

impl PartialOrd for DateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date key: {s:?}")))
    }
}

/// A typed violent-death record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    /// Calendar year (`ANO`).
    pub year: i32,
    /// Month (`MES`).
    pub month: u32,
    /// Municipality name, exactly as in the source.
    pub municipality: String,
    /// Region name.
    pub region: String,
    /// Crime category.
    pub category: RecordCategory,
    /// Number of victims.
    pub victims: u64,
}

impl NormalizedRecord {
    /// The `YYYY-MM` key for this record, always derived from `year` and
    /// `month`.
    #[must_use]
    pub const fn date_key(&self) -> DateKey {
        DateKey::new(self.year, self.month)
    }
}

/// Victim sums per named category plus an overall total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    /// [`CrimeCategory::IntentionalHomicide`]
    pub homicides: u64,
    /// [`CrimeCategory::RobberyResultingInDeath`]
    pub latrocinio: u64,
    /// [`CrimeCategory::BodilyHarmResultingInDeath`]
    pub lesao_corporal: u64,
    /// Every record, including unrecognized categories.
    pub total: u64,
}

impl CategoryTotals {
    /// Adds one record's victims into these totals.
    pub const fn add(&mut self, category: Option<CrimeCategory>, victims: u64) {
        self.total += victims;
        match category {
            Some(CrimeCategory::IntentionalHomicide) => self.homicides += victims,
            Some(CrimeCategory::RobberyResultingInDeath) => self.latrocinio += victims,
            Some(CrimeCategory::BodilyHarmResultingInDeath) => self.lesao_corporal += victims,
            None => {}
        }
    }

    /// Returns the sum for a named category.
    #[must_use]
    pub const fn get(&self, category: CrimeCategory) -> u64 {
        match category {
            CrimeCategory::IntentionalHomicide => self.homicides,
            CrimeCategory::RobberyResultingInDeath => self.latrocinio,
            CrimeCategory::BodilyHarmResultingInDeath => self.lesao_corporal,
        }
    }
}

/// One month of the monthly series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    /// Grouping key.
    pub date_key: DateKey,
    /// Portuguese month name (empty for out-of-range months).
    pub month_label: String,
    /// Sums for the month.
    pub totals: CategoryTotals,
}

/// Per-year rollup used for year-over-year comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearTotals {
    /// Calendar year.
    pub year: i32,
    /// Intentional homicide victims in the year.
    pub homicides: u64,
    /// All victims in the year.
    pub total: u64,
}

/// Derived statistics for one municipality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedStats {
    /// Sums across every input record.
    pub totals: CategoryTotals,
    /// Year the monthly series was restricted to, if any.
    pub series_year: Option<i32>,
    /// Months of `series_year`, ascending.
    pub monthly_series: Vec<MonthlyPoint>,
    /// Every year present, ascending.
    pub yearly_comparison: Vec<YearTotals>,
}

/// Year-over-year percentage changes, unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSummary {
    /// Year treated as current, if any year was present.
    pub current_year: Option<i32>,
    /// The year before `current_year`, if it was present.
    pub previous_year: Option<i32>,
    /// Percentage change in intentional homicides.
    pub homicide_change: f64,
    /// Percentage change in all victims.
    pub total_change: f64,
}

/// Data-quality counters gathered while ingesting a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestSummary {
    /// Non-empty data lines read (header excluded).
    pub lines_read: u64,
    /// Lines dropped for having fewer than nine fields.
    pub lines_dropped: u64,
    /// Numeric fields that could not be parsed and were replaced by zero.
    pub defaulted_fields: u64,
    /// Records whose category label is outside the known set.
    pub unrecognized_categories: u64,
    /// Records kept after the municipality filter.
    pub records_matched: u64,
}

/// Headline figures of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadlineMetrics {
    /// Intentional homicide victims.
    pub total_homicides: u64,
    /// Latrocínio victims.
    pub total_latrocinio: u64,
    /// Bodily harm resulting in death victims.
    pub total_lesao_corporal: u64,
    /// All victims.
    pub total_victims: u64,
    /// Homicide change, rounded to one decimal place.
    pub homicide_change: f64,
    /// Total change, rounded to one decimal place.
    pub total_change: f64,
}

/// One point of the dashboard time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Month label.
    pub date: String,
    /// Intentional homicide victims.
    pub homicides: u64,
    /// Latrocínio victims.
    pub latrocinio: u64,
    /// Bodily harm resulting in death victims.
    pub lesao_corporal: u64,
    /// All victims.
    pub total: u64,
}

impl From<&MonthlyPoint> for TimeSeriesPoint {
    fn from(point: &MonthlyPoint) -> Self {
        Self {
            date: point.month_label.clone(),
            homicides: point.totals.homicides,
            latrocinio: point.totals.latrocinio,
            lesao_corporal: point.totals.lesao_corporal,
            total: point.totals.total,
        }
    }
}

/// The statistics payload served to the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViolenceReport {
    /// Headline metrics.
    pub metrics: HeadlineMetrics,
    /// Most recent months of the monthly series.
    pub time_series: Vec<TimeSeriesPoint>,
    /// Per-year totals.
    pub year_comparison: Vec<YearTotals>,
    /// When the report was built (RFC 3339).
    pub last_update: String,
    /// Source attribution.
    pub source: String,
    /// Data-quality counters for the run.
    pub ingest: IngestSummary,
}
