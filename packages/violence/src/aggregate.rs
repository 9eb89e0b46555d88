//! Category totals, monthly series and yearly comparison.
//!
//! All grouping goes through `BTreeMap`s keyed by [`DateKey`] or year, so
//! output order never depends on input order and two runs over the same
//! records serialize identically.

use std::collections::BTreeMap;

use memorial_violence_models::{
    AggregatedStats, CategoryTotals, CrimeCategory, DateKey, MonthlyPoint, NormalizedRecord,
    YearTotals, month_name,
};

/// Builds [`AggregatedStats`] from already-filtered records.
///
/// The monthly series covers `reference_year` when given, otherwise the
/// most recent year present in `records`. A reference year with no records
/// produces an empty series.
#[must_use]
pub fn aggregate(records: &[NormalizedRecord], reference_year: Option<i32>) -> AggregatedStats {
    let mut totals = CategoryTotals::default();
    let mut years: BTreeMap<i32, YearTotals> = BTreeMap::new();

    for record in records {
        let category = record.category.known();
        totals.add(category, record.victims);

        let year = years.entry(record.year).or_insert(YearTotals {
            year: record.year,
            homicides: 0,
            total: 0,
        });
        year.total += record.victims;
        if category == Some(CrimeCategory::IntentionalHomicide) {
            year.homicides += record.victims;
        }
    }

    let series_year = reference_year.or_else(|| years.keys().next_back().copied());

    let monthly_series = series_year.map_or_else(Vec::new, |year| {
        if !years.contains_key(&year) {
            log::warn!("No records for series year {year}; monthly series is empty");
        }
        monthly_series(records, year)
    });

    AggregatedStats {
        totals,
        series_year,
        monthly_series,
        yearly_comparison: years.into_values().collect(),
    }
}

/// Groups the records of `year` by month, ascending.
#[must_use]
pub fn monthly_series(records: &[NormalizedRecord], year: i32) -> Vec<MonthlyPoint> {
    let mut months: BTreeMap<DateKey, CategoryTotals> = BTreeMap::new();

    for record in records.iter().filter(|r| r.year == year) {
        months
            .entry(record.date_key())
            .or_default()
            .add(record.category.known(), record.victims);
    }

    months
        .into_iter()
        .map(|(date_key, totals)| MonthlyPoint {
            date_key,
            month_label: month_name(date_key.month).unwrap_or_default().to_owned(),
            totals,
        })
        .collect()
}
