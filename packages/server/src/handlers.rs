//! HTTP handler functions for the memorial API.

use std::sync::Arc;

use actix_web::{HttpResponse, web};
use chrono::{Days, NaiveDate, Utc};
use memorial_fogo_cruzado::OccurrenceSource as _;
use memorial_fogo_cruzado_models::{FogoCruzadoReport, ReportPeriod};
use memorial_geography::{
    FALLBACK_TOTAL_HOMICIDES, LANDMARKS, neighborhood_stats, reference_coordinates,
    scatter_victim_lights, validate_coordinates,
};
use memorial_geography_models::NeighborhoodCount;
use memorial_server_models::{
    ApiError, ApiHealth, ApiMessage, FogoCruzadoFallback, FogoCruzadoQueryParams,
    FogoCruzadoResponse, LandmarksResponse, NeighborhoodsQueryParams, NeighborhoodsResponse,
    TotalSource,
};
use memorial_victims::{VictimStore, VictimsError};
use memorial_victims_models::{NewVictimRequest, VictimPatch};
use memorial_violence::load_report;

use crate::AppState;

const DEFAULT_PERIOD_DAYS: u64 = 365;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/violence-data`
///
/// Recomputes the statistics report from the CSV on every request.
pub async fn violence_data(state: web::Data<AppState>) -> HttpResponse {
    let path = state.config.violence_csv_path.clone();
    let options = state.config.stats.clone();

    match web::block(move || load_report(&path, &options)).await {
        Ok(Ok(report)) => HttpResponse::Ok().json(report),
        Ok(Err(e)) => {
            log::error!("Violence data query failed: {e}");
            internal_error()
        }
        Err(e) => {
            log::error!("Violence data task failed: {e}");
            internal_error()
        }
    }
}

/// `GET /api/fogo-cruzado`
///
/// Never fails: an unavailable API yields the local fallback payload
/// with `success: false`.
pub async fn fogo_cruzado(
    state: web::Data<AppState>,
    params: web::Query<FogoCruzadoQueryParams>,
) -> HttpResponse {
    let period = resolve_period(
        params.initial_date.as_deref(),
        params.final_date.as_deref(),
        Utc::now().date_naive(),
    );

    match state.occurrences.report(&period).await {
        Ok(data) => HttpResponse::Ok().json(FogoCruzadoResponse {
            success: true,
            data,
        }),
        Err(e) => {
            log::error!("Fogo Cruzado query failed: {e}");
            HttpResponse::Ok().json(FogoCruzadoFallback::default())
        }
    }
}

/// `GET /api/neighborhoods`
///
/// The city-wide total comes from the crime-data API when it reports any
/// deaths, then from the local statistics, then from
/// [`FALLBACK_TOTAL_HOMICIDES`].
pub async fn neighborhoods(
    state: web::Data<AppState>,
    params: web::Query<NeighborhoodsQueryParams>,
) -> HttpResponse {
    let (total_homicides, source, real) = resolve_total(&state).await;
    let stats = neighborhood_stats(total_homicides, &real);

    let lights = params
        .lights
        .unwrap_or(false)
        .then(|| scatter_victim_lights(&stats, &mut rand::thread_rng()));

    HttpResponse::Ok().json(NeighborhoodsResponse {
        total_homicides,
        source,
        neighborhoods: stats,
        lights,
    })
}

/// `GET /api/landmarks`
pub async fn landmarks() -> HttpResponse {
    let coordinates = validate_coordinates(&reference_coordinates());
    for warning in &coordinates.warnings {
        log::debug!("{warning}");
    }

    HttpResponse::Ok().json(LandmarksResponse {
        landmarks: LANDMARKS.to_vec(),
        coordinates,
    })
}

/// `GET /api/victims`
///
/// Approved tributes, newest first.
pub async fn list_victims(state: web::Data<AppState>) -> HttpResponse {
    match with_store(&state, VictimStore::list_approved).await {
        Ok(victims) => HttpResponse::Ok().json(victims),
        Err(response) => response,
    }
}

/// `POST /api/victims`
pub async fn create_victim(
    state: web::Data<AppState>,
    body: web::Json<NewVictimRequest>,
) -> HttpResponse {
    let new = match body.validate() {
        Ok(new) => new,
        Err(e) => return HttpResponse::BadRequest().json(ApiError::new(e.to_string())),
    };
    let approved = state.config.auto_approve;

    match with_store(&state, move |store| store.create(&new, approved)).await {
        Ok(victim) => {
            log::info!("Created tribute {} ({})", victim.id, victim.name);
            HttpResponse::Created().json(victim)
        }
        Err(response) => response,
    }
}

/// `GET /api/victims/{id}`
pub async fn get_victim(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();

    match with_store(&state, move |store| store.get(&id)).await {
        Ok(victim) => HttpResponse::Ok().json(victim),
        Err(response) => response,
    }
}

/// `PATCH /api/victims/{id}`
pub async fn update_victim(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<VictimPatch>,
) -> HttpResponse {
    let id = path.into_inner();
    let patch = body.into_inner();

    match with_store(&state, move |store| store.update(&id, &patch)).await {
        Ok(victim) => HttpResponse::Ok().json(victim),
        Err(response) => response,
    }
}

/// `DELETE /api/victims/{id}`
pub async fn delete_victim(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();

    match with_store(&state, move |store| store.delete(&id)).await {
        Ok(()) => HttpResponse::Ok().json(ApiMessage {
            message: "Vítima removida com sucesso".to_string(),
        }),
        Err(response) => response,
    }
}

/// Runs a store operation on the blocking pool and maps its error to a
/// response.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, HttpResponse>
where
    T: Send + 'static,
    F: FnOnce(&VictimStore) -> Result<T, VictimsError> + Send + 'static,
{
    let store = Arc::clone(&state.victims);

    match web::block(move || op(&store)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(victims_error(&e)),
        Err(e) => {
            log::error!("Victim store task failed: {e}");
            Err(internal_error())
        }
    }
}

fn victims_error(e: &VictimsError) -> HttpResponse {
    match e {
        VictimsError::NotFound { .. } => {
            HttpResponse::NotFound().json(ApiError::new("Vítima não encontrada"))
        }
        VictimsError::Validation(validation) => {
            HttpResponse::BadRequest().json(ApiError::new(validation.to_string()))
        }
        _ => {
            log::error!("Victim store query failed: {e}");
            internal_error()
        }
    }
}

fn internal_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiError::new("Erro interno do servidor"))
}

/// Fills in missing bounds: the end defaults to `today` and the start to
/// [`DEFAULT_PERIOD_DAYS`] before it.
fn resolve_period(start: Option<&str>, end: Option<&str>, today: NaiveDate) -> ReportPeriod {
    let default_start = today
        .checked_sub_days(Days::new(DEFAULT_PERIOD_DAYS))
        .unwrap_or(today);

    ReportPeriod {
        start: start
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| default_start.format("%Y-%m-%d").to_string(), str::to_string),
        end: end
            .filter(|s| !s.trim().is_empty())
            .map_or_else(|| today.format("%Y-%m-%d").to_string(), str::to_string),
    }
}

fn neighborhood_counts(report: &FogoCruzadoReport) -> Vec<NeighborhoodCount> {
    report
        .neighborhoods
        .iter()
        .map(|n| NeighborhoodCount {
            neighborhood: n.neighborhood.clone(),
            homicides: n.deaths,
        })
        .collect()
}

async fn resolve_total(state: &AppState) -> (u64, TotalSource, Vec<NeighborhoodCount>) {
    let period = resolve_period(None, None, Utc::now().date_naive());

    match state.occurrences.report(&period).await {
        Ok(report) if report.total_deaths > 0 => {
            return (
                report.total_deaths,
                TotalSource::FogoCruzado,
                neighborhood_counts(&report),
            );
        }
        Ok(_) => log::debug!("Fogo Cruzado reported no deaths, trying local statistics"),
        Err(e) => log::warn!("Fogo Cruzado unavailable for neighborhoods: {e}"),
    }

    let path = state.config.violence_csv_path.clone();
    let options = state.config.stats.clone();
    match web::block(move || load_report(&path, &options)).await {
        Ok(Ok(report)) if report.metrics.total_homicides > 0 => {
            return (
                report.metrics.total_homicides,
                TotalSource::Local,
                Vec::new(),
            );
        }
        Ok(Ok(_)) => log::debug!("Local statistics have no homicides, using fallback total"),
        Ok(Err(e)) => log::warn!("Local statistics unavailable for neighborhoods: {e}"),
        Err(e) => log::warn!("Local statistics task failed: {e}"),
    }

    (FALLBACK_TOTAL_HOMICIDES, TotalSource::Fallback, Vec::new())
}
