//! Year-over-year percentage change.
//!
//! Results are exact; rounding for display happens in [`crate::report`].

use memorial_violence_models::{ChangeSummary, YearTotals};

/// `(current - previous) / previous * 100`, or `0.0` when `previous` is
/// zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_change(current: u64, previous: u64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    let current = current as f64;
    let previous = previous as f64;
    (current - previous) / previous * 100.0
}

/// Compares the two most recent years in `yearly`.
///
/// The current year is `reference_year` when given, otherwise the latest
/// year present. The previous year is exactly `current - 1`. When either
/// is missing both deltas are `0.0`.
#[must_use]
pub fn year_over_year(yearly: &[YearTotals], reference_year: Option<i32>) -> ChangeSummary {
    let current_year = reference_year.or_else(|| yearly.iter().map(|y| y.year).max());

    let current = current_year.and_then(|year| yearly.iter().find(|y| y.year == year));
    let previous = current_year
        .and_then(|year| year.checked_sub(1))
        .and_then(|year| yearly.iter().find(|y| y.year == year));

    match (current, previous) {
        (Some(current), Some(previous)) => ChangeSummary {
            current_year: Some(current.year),
            previous_year: Some(previous.year),
            homicide_change: percent_change(current.homicides, previous.homicides),
            total_change: percent_change(current.total, previous.total),
        },
        (current, previous) => ChangeSummary {
            current_year: current.map(|y| y.year),
            previous_year: previous.map(|y| y.year),
            homicide_change: 0.0,
            total_change: 0.0,
        },
    }
}
