//! Municipality filter.

use memorial_violence_models::NormalizedRecord;

/// Whether `record` belongs to `municipality`.
///
/// The comparison is exact: no case folding and no diacritic
/// normalization, so `"SALVADOR"` does not match `"Salvador"`.
#[must_use]
pub fn is_municipality(record: &NormalizedRecord, municipality: &str) -> bool {
    record.municipality == municipality
}

/// Keeps only the records of `municipality`, preserving order.
#[must_use]
pub fn filter_municipality(
    records: Vec<NormalizedRecord>,
    municipality: &str,
) -> Vec<NormalizedRecord> {
    records
        .into_iter()
        .filter(|record| is_municipality(record, municipality))
        .collect()
}
