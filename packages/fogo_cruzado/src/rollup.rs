//! Per-neighborhood and per-month rollups of raw occurrences.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike as _};
use memorial_fogo_cruzado_models::{
    FogoCruzadoReport, MonthlyOccurrenceStats, NeighborhoodSummary, Occurrence,
    OccurrenceSummary, ReportPeriod, VictimSituation,
};

use crate::SOURCE_LABEL;

/// Bucket for occurrences without a neighborhood.
pub const UNKNOWN_NEIGHBORHOOD: &str = "Não identificado";

/// Reason label when the occurrence carries none.
pub const UNKNOWN_REASON: &str = "Não informado";

fn parse_coordinate(value: Option<&str>) -> Option<f64> {
    value.and_then(|v| v.trim().parse::<f64>().ok())
}

/// Condenses one occurrence and counts its dead and injured victims.
#[must_use]
pub fn summarize_occurrence(occurrence: &Occurrence) -> OccurrenceSummary {
    let mut deaths = 0_u32;
    let mut injured = 0_u32;
    for victim in &occurrence.victims {
        match victim.situation {
            VictimSituation::Dead => deaths += 1,
            VictimSituation::Injured => injured += 1,
            VictimSituation::Unknown => {}
        }
    }

    let reason = occurrence
        .context_info
        .as_ref()
        .and_then(|c| c.main_reason.as_ref())
        .map_or_else(|| UNKNOWN_REASON.to_string(), |r| r.name.clone());

    OccurrenceSummary {
        id: occurrence.id.clone(),
        address: occurrence.address.clone().unwrap_or_default(),
        date: occurrence.date.clone(),
        reason,
        victims: u32::try_from(occurrence.victims.len()).unwrap_or(u32::MAX),
        deaths,
        injured,
    }
}

/// Groups occurrences by neighborhood name.
///
/// The first occurrence seen for a neighborhood provides its coordinates.
/// Output is sorted by deaths descending, then by name.
#[must_use]
pub fn summarize_by_neighborhood(occurrences: &[Occurrence]) -> Vec<NeighborhoodSummary> {
    let mut groups: BTreeMap<String, NeighborhoodSummary> = BTreeMap::new();

    for occurrence in occurrences {
        let name = occurrence
            .neighborhood
            .as_ref()
            .map(|n| n.name.trim())
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_NEIGHBORHOOD);

        let group = groups
            .entry(name.to_string())
            .or_insert_with(|| NeighborhoodSummary {
                neighborhood: name.to_string(),
                deaths: 0,
                injured: 0,
                latitude: parse_coordinate(occurrence.latitude.as_deref()),
                longitude: parse_coordinate(occurrence.longitude.as_deref()),
                occurrences: Vec::new(),
            });

        let summary = summarize_occurrence(occurrence);
        group.deaths += u64::from(summary.deaths);
        group.injured += u64::from(summary.injured);
        group.occurrences.push(summary);
    }

    let mut summaries: Vec<NeighborhoodSummary> = groups.into_values().collect();
    summaries.sort_by(|a, b| b.deaths.cmp(&a.deaths));
    summaries
}

/// `YYYY-MM` of an occurrence date, in the date's own offset.
fn month_key(date: &str) -> Option<String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return Some(format!("{:04}-{:02}", parsed.year(), parsed.month()));
    }
    let prefix = date.get(..7)?;
    let bytes = prefix.as_bytes();
    let well_formed = bytes[4] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || b.is_ascii_digit());
    well_formed.then(|| prefix.to_string())
}

/// Sums occurrences per `YYYY-MM`, ascending.
///
/// Occurrences whose date cannot be read are skipped.
#[must_use]
pub fn monthly_stats(neighborhoods: &[NeighborhoodSummary]) -> Vec<MonthlyOccurrenceStats> {
    let mut months: BTreeMap<String, MonthlyOccurrenceStats> = BTreeMap::new();

    for occurrence in neighborhoods.iter().flat_map(|n| &n.occurrences) {
        let Some(key) = month_key(&occurrence.date) else {
            log::debug!(
                "Skipping occurrence {} with unreadable date {:?}",
                occurrence.id,
                occurrence.date
            );
            continue;
        };

        let month = months
            .entry(key.clone())
            .or_insert_with(|| MonthlyOccurrenceStats {
                month: key,
                deaths: 0,
                injured: 0,
                occurrences: 0,
            });
        month.deaths += u64::from(occurrence.deaths);
        month.injured += u64::from(occurrence.injured);
        month.occurrences += 1;
    }

    months.into_values().collect()
}

/// Builds the city report from raw occurrences.
#[must_use]
pub fn build_report(occurrences: &[Occurrence], period: ReportPeriod) -> FogoCruzadoReport {
    let neighborhoods = summarize_by_neighborhood(occurrences);
    let monthly_stats = monthly_stats(&neighborhoods);

    FogoCruzadoReport {
        total_deaths: neighborhoods.iter().map(|n| n.deaths).sum(),
        total_injured: neighborhoods.iter().map(|n| n.injured).sum(),
        total_occurrences: neighborhoods.iter().map(|n| n.occurrences.len() as u64).sum(),
        neighborhoods,
        monthly_stats,
        source: SOURCE_LABEL.to_string(),
        period,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn occurrence(id: &str, neighborhood: Option<&str>, date: &str, victims: &[&str]) -> Occurrence {
        let victims: Vec<_> = victims
            .iter()
            .enumerate()
            .map(|(i, situation)| json!({ "id": format!("{id}-v{i}"), "situation": situation }))
            .collect();
        let mut value = json!({
            "id": id,
            "address": format!("Rua {id}"),
            "date": date,
            "latitude": "-12.97",
            "longitude": "-38.50",
            "contextInfo": { "mainReason": { "id": "r1", "name": "Ação policial" } },
            "victims": victims,
        });
        if let Some(name) = neighborhood {
            value["neighborhood"] = json!({ "id": name, "name": name });
        }
        serde_json::from_value(value).unwrap()
    }

    fn sample() -> Vec<Occurrence> {
        vec![
            occurrence("a", Some("Liberdade"), "2024-03-02T10:00:00.000Z", &["Dead"]),
            occurrence("b", Some("Brotas"), "2024-03-20T10:00:00.000Z", &["Dead", "Dead"]),
            occurrence("c", None, "2024-04-01T10:00:00.000Z", &["Injured"]),
            occurrence("d", Some("Liberdade"), "2024-04-11T10:00:00.000Z", &["Dead", "Injured"]),
            occurrence("e", Some("Barra"), "2024-02-11T10:00:00.000Z", &["Injured"]),
        ]
    }

    #[test]
    fn counts_dead_and_injured() {
        let summary = summarize_occurrence(&sample()[3]);
        assert_eq!(summary.victims, 2);
        assert_eq!(summary.deaths, 1);
        assert_eq!(summary.injured, 1);
        assert_eq!(summary.reason, "Ação policial");
    }

    #[test]
    fn groups_and_sorts_by_deaths() {
        let summaries = summarize_by_neighborhood(&sample());
        let names: Vec<&str> = summaries.iter().map(|s| s.neighborhood.as_str()).collect();

        assert_eq!(names, vec!["Brotas", "Liberdade", "Barra", UNKNOWN_NEIGHBORHOOD]);
        assert_eq!(summaries[1].deaths, 2);
        assert_eq!(summaries[1].injured, 1);
        assert_eq!(summaries[1].occurrences.len(), 2);
        assert_eq!(summaries[1].latitude, Some(-12.97));
    }

    #[test]
    fn missing_reason_and_coordinates() {
        let value = json!({ "id": "x", "date": "2024-01-01T00:00:00Z", "latitude": "n/a" });
        let occurrence: Occurrence = serde_json::from_value(value).unwrap();

        let summaries = summarize_by_neighborhood(&[occurrence]);
        assert_eq!(summaries[0].latitude, None);
        assert_eq!(summaries[0].longitude, None);
        assert_eq!(summaries[0].occurrences[0].reason, UNKNOWN_REASON);
        assert_eq!(summaries[0].occurrences[0].address, "");
    }

    #[test]
    fn monthly_stats_ascending() {
        let months = monthly_stats(&summarize_by_neighborhood(&sample()));
        let keys: Vec<&str> = months.iter().map(|m| m.month.as_str()).collect();

        assert_eq!(keys, vec!["2024-02", "2024-03", "2024-04"]);
        assert_eq!(months[1].deaths, 3);
        assert_eq!(months[1].occurrences, 2);
        assert_eq!(months[2].injured, 2);
    }

    #[test]
    fn month_key_accepts_plain_dates() {
        assert_eq!(month_key("2024-07-15"), Some("2024-07".to_string()));
        assert_eq!(month_key("15/07/2024"), None);
        assert_eq!(month_key(""), None);
    }

    #[test]
    fn report_totals() {
        let period = ReportPeriod {
            start: "2024-01-01".to_string(),
            end: "2024-12-31".to_string(),
        };
        let report = build_report(&sample(), period);

        assert_eq!(report.total_deaths, 4);
        assert_eq!(report.total_injured, 3);
        assert_eq!(report.total_occurrences, 5);
        assert_eq!(report.source, SOURCE_LABEL);
        assert_eq!(report.monthly_stats.len(), 3);
    }
}
