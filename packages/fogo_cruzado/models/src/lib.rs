#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Wire and summary types for the Fogo Cruzado API (v2).
//!
//! The wire types mirror the JSON the API returns (camelCase). Optional
//! fields are modelled as `Option` and unknown fields are ignored, so a
//! partially populated occurrence still deserializes.

use serde::{Deserialize, Serialize};

/// Generic `{ msg, msgCode, code, data }` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    /// Human-readable status message.
    #[serde(default)]
    pub msg: Option<String>,
    /// Machine-readable status code.
    #[serde(default)]
    pub msg_code: Option<String>,
    /// HTTP-like status code.
    #[serde(default)]
    pub code: Option<u16>,
    /// Payload.
    pub data: T,
}

/// Login payload returned by `POST /auth/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    /// Bearer token.
    pub access_token: String,
    /// Lifetime in seconds.
    pub expires_in: u64,
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    /// Account email.
    pub email: &'a str,
    /// Account password.
    pub password: &'a str,
}

/// A Brazilian state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    /// State id (UUID).
    pub id: String,
    /// State name.
    pub name: String,
}

/// A city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    /// City id (UUID).
    pub id: String,
    /// City name.
    pub name: String,
    /// Owning state.
    #[serde(default)]
    pub state: Option<State>,
}

/// A neighborhood.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Neighborhood {
    /// Neighborhood id.
    pub id: String,
    /// Neighborhood name.
    pub name: String,
}

/// Generic `{ id, name }` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRef {
    /// Reference id.
    pub id: String,
    /// Reference name.
    pub name: String,
}

/// Outcome for a victim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VictimSituation {
    /// Killed.
    Dead,
    /// Wounded.
    Injured,
    /// Any other value the API may add.
    #[serde(other)]
    Unknown,
}

/// A victim attached to an occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Victim {
    /// Victim id.
    pub id: String,
    /// Owning occurrence id.
    #[serde(default)]
    pub occurrence_id: Option<String>,
    /// Victim type (e.g. `"People"`).
    #[serde(default, rename = "type")]
    pub victim_type: Option<String>,
    /// Dead or injured.
    pub situation: VictimSituation,
    /// Circumstance labels.
    #[serde(default)]
    pub circumstances: Vec<serde_json::Value>,
    /// Date of death, if dead.
    #[serde(default)]
    pub death_date: Option<String>,
    /// Person type (civilian, agent).
    #[serde(default)]
    pub person_type: Option<String>,
    /// Age in years.
    #[serde(default)]
    pub age: Option<u32>,
    /// Age bracket.
    #[serde(default)]
    pub age_group: Option<NamedRef>,
    /// Gender.
    #[serde(default)]
    pub genre: Option<NamedRef>,
    /// Where the victim was hit.
    #[serde(default)]
    pub place: Option<NamedRef>,
}

/// Context labels for an occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextInfo {
    /// Main reason for the shooting.
    #[serde(default)]
    pub main_reason: Option<NamedRef>,
    /// Clipping tags.
    #[serde(default)]
    pub clippings: Vec<NamedRef>,
    /// Whether the occurrence was a massacre.
    #[serde(default)]
    pub massacre: bool,
    /// Police unit involved, if any.
    #[serde(default)]
    pub police_unit: Option<String>,
}

/// A shooting occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    /// Occurrence id.
    pub id: String,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// State.
    #[serde(default)]
    pub state: Option<State>,
    /// City.
    #[serde(default)]
    pub city: Option<City>,
    /// Neighborhood, when known.
    #[serde(default)]
    pub neighborhood: Option<Neighborhood>,
    /// Latitude as a decimal string.
    #[serde(default)]
    pub latitude: Option<String>,
    /// Longitude as a decimal string.
    #[serde(default)]
    pub longitude: Option<String>,
    /// When the occurrence happened (ISO 8601).
    pub date: String,
    /// Whether police action was involved.
    #[serde(default)]
    pub police_action: bool,
    /// Whether agents were present.
    #[serde(default)]
    pub agent_presence: bool,
    /// Context labels.
    #[serde(default)]
    pub context_info: Option<ContextInfo>,
    /// Victims.
    #[serde(default)]
    pub victims: Vec<Victim>,
}

/// Pagination metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Current page (1-based).
    pub page: u32,
    /// Page size.
    pub take: u32,
    /// Total matching items.
    pub item_count: u64,
    /// Total pages.
    pub page_count: u32,
    /// Whether an earlier page exists.
    pub has_previous_page: bool,
    /// Whether a later page exists.
    pub has_next_page: bool,
}

/// `GET /occurrences` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrencePage {
    /// Status message.
    #[serde(default)]
    pub msg: Option<String>,
    /// Pagination metadata.
    #[serde(default)]
    pub page_meta: PageMeta,
    /// Occurrences on this page.
    #[serde(default)]
    pub data: Vec<Occurrence>,
}

/// One occurrence condensed for the neighborhood view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceSummary {
    /// Occurrence id.
    pub id: String,
    /// Street address.
    #[serde(rename = "endereco")]
    pub address: String,
    /// Occurrence date (ISO 8601).
    #[serde(rename = "data")]
    pub date: String,
    /// Main reason label.
    #[serde(rename = "motivo")]
    pub reason: String,
    /// Number of victims.
    #[serde(rename = "vitimas")]
    pub victims: u32,
    /// Killed victims.
    #[serde(rename = "mortos")]
    pub deaths: u32,
    /// Injured victims.
    #[serde(rename = "feridos")]
    pub injured: u32,
}

/// Occurrences grouped under one neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborhoodSummary {
    /// Neighborhood name.
    #[serde(rename = "bairro")]
    pub neighborhood: String,
    /// Killed victims.
    #[serde(rename = "homicidios")]
    pub deaths: u64,
    /// Injured victims.
    #[serde(rename = "feridos")]
    pub injured: u64,
    /// Latitude of the first occurrence seen.
    pub latitude: Option<f64>,
    /// Longitude of the first occurrence seen.
    pub longitude: Option<f64>,
    /// Occurrences in this neighborhood.
    #[serde(rename = "ocorrencias")]
    pub occurrences: Vec<OccurrenceSummary>,
}

/// Occurrence totals for one `YYYY-MM` month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyOccurrenceStats {
    /// `YYYY-MM`.
    #[serde(rename = "mes")]
    pub month: String,
    /// Killed victims.
    #[serde(rename = "homicidios")]
    pub deaths: u64,
    /// Injured victims.
    #[serde(rename = "feridos")]
    pub injured: u64,
    /// Number of occurrences.
    #[serde(rename = "ocorrencias")]
    pub occurrences: u64,
}

/// Date range of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    /// Start date (`YYYY-MM-DD`).
    #[serde(rename = "inicio")]
    pub start: String,
    /// End date (`YYYY-MM-DD`).
    #[serde(rename = "fim")]
    pub end: String,
}

/// City-level report built from API occurrences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FogoCruzadoReport {
    /// Killed victims across all neighborhoods.
    #[serde(rename = "totalHomicidios")]
    pub total_deaths: u64,
    /// Injured victims across all neighborhoods.
    #[serde(rename = "totalFeridos")]
    pub total_injured: u64,
    /// Number of occurrences.
    #[serde(rename = "totalOcorrencias")]
    pub total_occurrences: u64,
    /// Per-neighborhood breakdown, most deaths first.
    #[serde(rename = "bairros")]
    pub neighborhoods: Vec<NeighborhoodSummary>,
    /// Per-month breakdown, ascending.
    pub monthly_stats: Vec<MonthlyOccurrenceStats>,
    /// Source attribution.
    #[serde(rename = "fonte")]
    pub source: String,
    /// Requested period.
    #[serde(rename = "periodo")]
    pub period: ReportPeriod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_auth_envelope() {
        let json = serde_json::json!({
            "msg": "ok",
            "msgCode": "success",
            "code": 201,
            "data": { "accessToken": "abc", "expiresIn": 3600 }
        });
        let envelope: ApiEnvelope<AuthToken> = serde_json::from_value(json).unwrap();
        assert_eq!(envelope.data.access_token, "abc");
        assert_eq!(envelope.data.expires_in, 3600);
    }

    #[test]
    fn deserializes_sparse_occurrence() {
        let json = serde_json::json!({
            "id": "occ-1",
            "date": "2024-05-10T22:15:00.000Z",
            "latitude": "-12.97",
            "longitude": "-38.50",
            "victims": [
                { "id": "v1", "situation": "Dead" },
                { "id": "v2", "situation": "Injured" },
                { "id": "v3", "situation": "Missing" }
            ],
            "animalVictims": []
        });
        let occurrence: Occurrence = serde_json::from_value(json).unwrap();
        assert!(occurrence.neighborhood.is_none());
        assert_eq!(occurrence.victims.len(), 3);
        assert_eq!(occurrence.victims[0].situation, VictimSituation::Dead);
        assert_eq!(occurrence.victims[2].situation, VictimSituation::Unknown);
    }

    #[test]
    fn deserializes_page_meta() {
        let json = serde_json::json!({
            "pageMeta": {
                "page": 1,
                "take": 20,
                "itemCount": 45,
                "pageCount": 3,
                "hasPreviousPage": false,
                "hasNextPage": true
            },
            "data": []
        });
        let page: OccurrencePage = serde_json::from_value(json).unwrap();
        assert!(page.page_meta.has_next_page);
        assert_eq!(page.page_meta.page_count, 3);
    }

    #[test]
    fn report_uses_dashboard_keys() {
        let report = FogoCruzadoReport {
            total_deaths: 2,
            total_injured: 1,
            total_occurrences: 1,
            neighborhoods: vec![NeighborhoodSummary {
                neighborhood: "Liberdade".to_string(),
                deaths: 2,
                injured: 1,
                latitude: Some(-12.95),
                longitude: Some(-38.49),
                occurrences: vec![OccurrenceSummary {
                    id: "occ-1".to_string(),
                    address: "Rua Lima e Silva".to_string(),
                    date: "2024-05-02T21:10:00.000Z".to_string(),
                    reason: "Disputa".to_string(),
                    victims: 3,
                    deaths: 2,
                    injured: 1,
                }],
            }],
            monthly_stats: vec![MonthlyOccurrenceStats {
                month: "2024-05".to_string(),
                deaths: 2,
                injured: 1,
                occurrences: 1,
            }],
            source: "Instituto Fogo Cruzado".to_string(),
            period: ReportPeriod {
                start: "2024-01-01".to_string(),
                end: "2024-12-31".to_string(),
            },
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["totalHomicidios"], 2);
        assert_eq!(value["totalFeridos"], 1);
        assert_eq!(value["totalOcorrencias"], 1);
        assert_eq!(value["fonte"], "Instituto Fogo Cruzado");
        assert_eq!(value["periodo"]["inicio"], "2024-01-01");
        assert_eq!(value["periodo"]["fim"], "2024-12-31");

        let bairro = &value["bairros"][0];
        assert_eq!(bairro["bairro"], "Liberdade");
        assert_eq!(bairro["homicidios"], 2);
        assert_eq!(bairro["latitude"], -12.95);

        let ocorrencia = &bairro["ocorrencias"][0];
        assert_eq!(ocorrencia["endereco"], "Rua Lima e Silva");
        assert_eq!(ocorrencia["motivo"], "Disputa");
        assert_eq!(ocorrencia["vitimas"], 3);
        assert_eq!(ocorrencia["mortos"], 2);
        assert_eq!(ocorrencia["feridos"], 1);

        let month = &value["monthlyStats"][0];
        assert_eq!(month["mes"], "2024-05");
        assert_eq!(month["homicidios"], 2);
        assert_eq!(month["ocorrencias"], 1);

        let back: FogoCruzadoReport = serde_json::from_value(value).unwrap();
        assert_eq!(back, report);
    }
}
