//! Dashboard report assembly.
//!
//! This is the boundary where exact statistics become display values:
//! percentage changes are rounded to one decimal place and the monthly
//! series is cut to the most recent months.

use chrono::{DateTime, SecondsFormat, Utc};
use memorial_violence_models::{HeadlineMetrics, TimeSeriesPoint, ViolenceReport};

use crate::PipelineOutput;

/// Default municipality for the dashboard.
pub const DEFAULT_MUNICIPALITY: &str = "Salvador";

/// Default source attribution.
pub const DEFAULT_SOURCE_LABEL: &str = "SSP-BA / Portal de Dados Abertos";

/// Default number of months shown in the time series.
pub const DEFAULT_RECENT_MONTHS: usize = 6;

/// Options for a statistics run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsOptions {
    /// Municipality to keep (exact match).
    pub municipality: String,
    /// Year treated as current. `None` uses the latest year in the data.
    pub reference_year: Option<i32>,
    /// How many trailing months of the series to report.
    pub recent_months: usize,
    /// Source attribution string.
    pub source_label: String,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            municipality: DEFAULT_MUNICIPALITY.to_string(),
            reference_year: None,
            recent_months: DEFAULT_RECENT_MONTHS,
            source_label: DEFAULT_SOURCE_LABEL.to_string(),
        }
    }
}

/// Rounds to one decimal place, halves rounding up.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value.mul_add(10.0, 0.5)).floor() / 10.0
}

/// Builds the dashboard payload from a pipeline run.
#[must_use]
pub fn build_report(
    output: &PipelineOutput,
    options: &StatsOptions,
    now: DateTime<Utc>,
) -> ViolenceReport {
    let totals = output.stats.totals;
    let series = &output.stats.monthly_series;
    let skip = series.len().saturating_sub(options.recent_months);

    ViolenceReport {
        metrics: HeadlineMetrics {
            total_homicides: totals.homicides,
            total_latrocinio: totals.latrocinio,
            total_lesao_corporal: totals.lesao_corporal,
            total_victims: totals.total,
            homicide_change: round_one_decimal(output.change.homicide_change),
            total_change: round_one_decimal(output.change.total_change),
        },
        time_series: series[skip..].iter().map(TimeSeriesPoint::from).collect(),
        year_comparison: output.stats.yearly_comparison.clone(),
        last_update: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        source: options.source_label.clone(),
        ingest: output.summary,
    }
}
