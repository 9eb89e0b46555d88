#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Violent-death statistics pipeline.
//!
//! Turns the SSP-BA positional CSV export into dashboard statistics for a
//! single municipality:
//!
//! 1. [`parse`] splits rows into nine positional fields.
//! 2. [`normalize`] converts fields into typed records, defaulting
//!    unparseable numbers to zero.
//! 3. [`filter`] keeps the target municipality.
//! 4. [`aggregate`] builds category totals, the monthly series and the
//!    yearly comparison.
//! 5. [`change`] derives year-over-year percentage changes.
//!
//! [`report`] rounds and packages the result for the HTTP layer. Every run
//! is a fresh computation over the full file; nothing is cached.

pub mod aggregate;
pub mod change;
pub mod filter;
pub mod normalize;
pub mod parse;
pub mod report;

use std::io::Read;
use std::path::Path;

use memorial_violence_models::{AggregatedStats, ChangeSummary, IngestSummary, ViolenceReport};

pub use report::StatsOptions;

/// Errors that can occur while reading a source file.
#[derive(Debug, thiserror::Error)]
pub enum ViolenceError {
    /// The source file could not be opened or read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Output of a full pipeline run, before rounding.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Aggregated statistics for the municipality.
    pub stats: AggregatedStats,
    /// Year-over-year changes (exact).
    pub change: ChangeSummary,
    /// Data-quality counters.
    pub summary: IngestSummary,
}

/// Runs the full pipeline over a CSV document.
///
/// # Errors
///
/// Returns [`ViolenceError`] if the document cannot be read.
pub fn run_pipeline<R: Read>(
    reader: R,
    options: &StatsOptions,
) -> Result<PipelineOutput, ViolenceError> {
    let document = parse::parse_document(reader)?;

    let mut summary = IngestSummary {
        lines_read: document.lines_read,
        lines_dropped: document.lines_dropped,
        ..IngestSummary::default()
    };

    let mut records = Vec::with_capacity(document.records.len());
    for raw in &document.records {
        let normalized = normalize::normalize(raw);
        for field in &normalized.defaulted {
            log::debug!(
                "Defaulted {} to 0 (raw {:?}: {})",
                field.field,
                field.raw,
                field.reason
            );
        }
        summary.defaulted_fields += normalized.defaulted.len() as u64;
        if normalized.record.category.known().is_none() {
            summary.unrecognized_categories += 1;
        }
        records.push(normalized.record);
    }

    let records = filter::filter_municipality(records, &options.municipality);
    summary.records_matched = records.len() as u64;

    if summary.lines_dropped > 0 || summary.defaulted_fields > 0 {
        log::warn!(
            "Violence data quality: {} of {} lines dropped, {} numeric fields defaulted to 0",
            summary.lines_dropped,
            summary.lines_read,
            summary.defaulted_fields
        );
    }
    if summary.records_matched == 0 {
        log::warn!(
            "No records matched municipality {:?}; statistics will be empty",
            options.municipality
        );
    }

    let stats = aggregate::aggregate(&records, options.reference_year);
    let change = change::year_over_year(&stats.yearly_comparison, options.reference_year);

    Ok(PipelineOutput {
        stats,
        change,
        summary,
    })
}

/// Reads the CSV at `path` and builds the dashboard report.
///
/// # Errors
///
/// Returns [`ViolenceError`] if the file cannot be opened or read.
pub fn load_report(path: &Path, options: &StatsOptions) -> Result<ViolenceReport, ViolenceError> {
    log::debug!("Reading violence data from {}", path.display());
    let file = std::fs::File::open(path)?;
    let output = run_pipeline(file, options)?;

    Ok(report::build_report(&output, options, chrono::Utc::now()))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use memorial_violence_models::YearTotals;

    use super::*;

    const HEADER: &str =
        "ANO_1,ID_REGIAO,REGIAO,ID_MUNICIPIO,MUNICIPIO,ANO,MES,GR_NATUREZA,QT_VITIMAS";

    fn document(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text
    }

    #[test]
    fn scenario_a_year_over_year() {
        let text = document(&[
            "2023,1,RMS,2927408,Salvador,2023,1,HOMICIDIO DOLOSO,5",
            "2024,1,RMS,2927408,Salvador,2024,1,HOMICIDIO DOLOSO,3",
        ]);
        let output = run_pipeline(text.as_bytes(), &StatsOptions::default()).unwrap();

        assert_eq!(
            output.stats.yearly_comparison,
            vec![
                YearTotals {
                    year: 2023,
                    homicides: 5,
                    total: 5
                },
                YearTotals {
                    year: 2024,
                    homicides: 3,
                    total: 3
                },
            ]
        );
        assert!((output.change.homicide_change - -40.0).abs() < 1e-9);
    }

    #[test]
    fn scenario_b_other_municipalities_are_ignored() {
        let text = document(&[
            "2024,1,RMS,2927408,Salvador,2024,2,HOMICIDIO DOLOSO,4",
            "2024,2,CENTRO NORTE,2910800,Feira de Santana,2024,2,HOMICIDIO DOLOSO,9",
            "2024,1,RMS,2927408,Salvador,2024,3,HOMICIDIO DOLOSO,1",
        ]);
        let output = run_pipeline(text.as_bytes(), &StatsOptions::default()).unwrap();

        assert_eq!(output.summary.records_matched, 2);
        assert_eq!(output.stats.totals.homicides, 5);
        assert_eq!(output.stats.totals.total, 5);
    }

    #[test]
    fn scenario_c_unrecognized_category_counts_only_in_totals() {
        let text = document(&["2024,1,RMS,2927408,Salvador,2024,5,OUTRO,2"]);
        let output = run_pipeline(text.as_bytes(), &StatsOptions::default()).unwrap();

        let totals = output.stats.totals;
        assert_eq!(totals.total, 2);
        assert_eq!(totals.homicides, 0);
        assert_eq!(totals.latrocinio, 0);
        assert_eq!(totals.lesao_corporal, 0);
        assert_eq!(output.stats.yearly_comparison[0].total, 2);
        assert_eq!(output.stats.yearly_comparison[0].homicides, 0);
        assert_eq!(output.summary.unrecognized_categories, 1);
    }

    #[test]
    fn scenario_d_short_line_is_dropped_and_processing_continues() {
        let text = document(&[
            "2024,1,RMS,2927408,Salvador,2024",
            "2024,1,RMS,2927408,Salvador,2024,6,HOMICIDIO DOLOSO,7",
        ]);
        let output = run_pipeline(text.as_bytes(), &StatsOptions::default()).unwrap();

        assert_eq!(output.summary.lines_read, 2);
        assert_eq!(output.summary.lines_dropped, 1);
        assert_eq!(output.stats.totals.homicides, 7);
    }

    #[test]
    fn counts_defaulted_fields() {
        let text = document(&["2024,1,RMS,2927408,Salvador,2024,6,HOMICIDIO DOLOSO,n/a"]);
        let output = run_pipeline(text.as_bytes(), &StatsOptions::default()).unwrap();

        assert_eq!(output.summary.defaulted_fields, 1);
        assert_eq!(output.stats.totals.total, 0);
    }

    #[test]
    fn load_report_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "{}",
            document(&[
                "2023,1,RMS,2927408,Salvador,2023,7,HOMICIDIO DOLOSO,2",
                "2024,1,RMS,2927408,Salvador,2024,7,HOMICIDIO DOLOSO,3",
                "2024,1,RMS,2927408,Salvador,2024,8,LESAO CORPORAL SEGUIDA DE MORTE,1",
            ])
        )
        .unwrap();

        let report = load_report(file.path(), &StatsOptions::default()).unwrap();

        assert_eq!(report.metrics.total_homicides, 5);
        assert_eq!(report.metrics.total_lesao_corporal, 1);
        assert!((report.metrics.homicide_change - 50.0).abs() < 1e-9);
        assert_eq!(report.time_series.len(), 2);
        assert_eq!(report.time_series[0].date, "Julho");
        assert_eq!(report.source, "SSP-BA / Portal de Dados Abertos");
    }

    #[test]
    fn load_report_missing_file_is_io_error() {
        let result = load_report(
            Path::new("/definitely/not/here.csv"),
            &StatsOptions::default(),
        );
        assert!(matches!(result, Err(ViolenceError::Io(_))));
    }
}
