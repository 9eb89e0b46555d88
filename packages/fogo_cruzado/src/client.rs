//! HTTP client for the Fogo Cruzado API.

use std::time::Duration;

use memorial_fogo_cruzado_models::{
    ApiEnvelope, AuthToken, City, FogoCruzadoReport, LoginRequest, Occurrence, OccurrencePage,
    ReportPeriod, State,
};
use serde::de::DeserializeOwned;

use crate::{
    Credentials, DEFAULT_API_BASE, FogoCruzadoError,
    retry::{self, RetryPolicy},
    rollup,
    token::TokenCache,
};

/// Page size used for city reports.
pub const REPORT_PAGE_SIZE: u32 = 1000;

/// Upper bound on pages fetched for one city report.
pub const DEFAULT_MAX_PAGES: u32 = 5;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Filters for `GET /occurrences`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceQuery {
    /// `idState`.
    pub state_id: Option<String>,
    /// Repeated `idCities`.
    pub city_ids: Vec<String>,
    /// `initialdate` (`YYYY-MM-DD`).
    pub initial_date: Option<String>,
    /// `finaldate` (`YYYY-MM-DD`).
    pub final_date: Option<String>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub take: Option<u32>,
}

impl OccurrenceQuery {
    /// Query-string pairs in the order the API documents them.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(state_id) = &self.state_id {
            pairs.push(("idState", state_id.clone()));
        }
        for city_id in &self.city_ids {
            pairs.push(("idCities", city_id.clone()));
        }
        if let Some(date) = &self.initial_date {
            pairs.push(("initialdate", date.clone()));
        }
        if let Some(date) = &self.final_date {
            pairs.push(("finaldate", date.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(take) = self.take {
            pairs.push(("take", take.to_string()));
        }
        pairs.push(("order", "DESC".to_string()));
        pairs.push(("typeOccurrence", "withVictim".to_string()));
        pairs
    }
}

/// Names used to resolve the report's state and city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityTarget {
    /// Case-insensitive fragment of the state name.
    pub state: String,
    /// Case-insensitive fragment of the city name.
    pub city: String,
}

impl Default for CityTarget {
    fn default() -> Self {
        Self {
            state: "Bahia".to_string(),
            city: "Salvador".to_string(),
        }
    }
}

/// Authenticated client.
#[derive(Debug)]
pub struct FogoCruzadoClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
    tokens: TokenCache,
    retry: RetryPolicy,
    target: CityTarget,
    max_pages: u32,
}

impl FogoCruzadoClient {
    /// Creates a client for `base_url`. Missing credentials are only
    /// reported when a request needs a token.
    #[must_use]
    pub fn new(base_url: impl Into<String>, credentials: Option<Credentials>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("Falling back to default HTTP client: {e}");
                reqwest::Client::new()
            });

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            tokens: TokenCache::new(),
            retry: RetryPolicy::default(),
            target: CityTarget::default(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Reads `FOGO_CRUZADO_API_BASE` and the credential variables.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("FOGO_CRUZADO_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(base_url, Credentials::from_env())
    }

    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: CityTarget) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Logs in and returns a fresh token. Does not touch the cache.
    ///
    /// # Errors
    ///
    /// * [`FogoCruzadoError::MissingCredentials`] without credentials.
    /// * [`FogoCruzadoError::Auth`] when the login is rejected.
    pub async fn authenticate(&self) -> Result<AuthToken, FogoCruzadoError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(FogoCruzadoError::MissingCredentials)?;
        let url = format!("{}/auth/login", self.base_url);
        let body = LoginRequest {
            email: &credentials.email,
            password: &credentials.password,
        };

        log::info!("Authenticating with Fogo Cruzado as {}", credentials.email);

        let envelope: ApiEnvelope<AuthToken> =
            retry::send_json(&self.retry, || self.http.post(&url).json(&body))
                .await
                .map_err(|e| match e {
                    FogoCruzadoError::Unauthorized => FogoCruzadoError::Auth {
                        message: "credentials rejected".to_string(),
                    },
                    FogoCruzadoError::Status { status, .. } => FogoCruzadoError::Auth {
                        message: format!("login returned HTTP {status}"),
                    },
                    other => other,
                })?;

        Ok(envelope.data)
    }

    async fn token(&self) -> Result<String, FogoCruzadoError> {
        self.tokens.get_or_refresh(|| self.authenticate()).await
    }

    /// Authenticated GET. A 401 drops the cached token and retries once.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, FogoCruzadoError> {
        let url = format!("{}{path}", self.base_url);
        let mut refreshed = false;

        loop {
            let token = self.token().await?;
            let result =
                retry::send_json(&self.retry, || self.http.get(&url).query(query).bearer_auth(&token))
                    .await;

            match result {
                Err(FogoCruzadoError::Unauthorized) if !refreshed => {
                    log::warn!("Token rejected for {url}; re-authenticating");
                    self.tokens.invalidate().await;
                    refreshed = true;
                }
                other => return other,
            }
        }
    }

    /// `GET /states`.
    ///
    /// # Errors
    ///
    /// Returns [`FogoCruzadoError`] if the request fails.
    pub async fn states(&self) -> Result<Vec<State>, FogoCruzadoError> {
        let envelope: ApiEnvelope<Vec<State>> = self.get_json("/states", &[]).await?;
        Ok(envelope.data)
    }

    /// `GET /cities`, optionally narrowed to one state.
    ///
    /// # Errors
    ///
    /// Returns [`FogoCruzadoError`] if the request fails.
    pub async fn cities(&self, state_id: Option<&str>) -> Result<Vec<City>, FogoCruzadoError> {
        let query: Vec<_> = state_id
            .map(|id| ("stateId", id.to_string()))
            .into_iter()
            .collect();
        let envelope: ApiEnvelope<Vec<City>> = self.get_json("/cities", &query).await?;
        Ok(envelope.data)
    }

    /// `GET /occurrences`, one page.
    ///
    /// # Errors
    ///
    /// Returns [`FogoCruzadoError`] if the request fails.
    pub async fn occurrences(
        &self,
        query: &OccurrenceQuery,
    ) -> Result<OccurrencePage, FogoCruzadoError> {
        self.get_json("/occurrences", &query.to_pairs()).await
    }

    /// Follows `pageMeta.hasNextPage` for at most `max_pages` pages.
    ///
    /// # Errors
    ///
    /// Returns [`FogoCruzadoError`] if any page fails.
    pub async fn all_occurrences(
        &self,
        query: &OccurrenceQuery,
        max_pages: u32,
    ) -> Result<Vec<Occurrence>, FogoCruzadoError> {
        let mut query = query.clone();
        let mut page = query.page.unwrap_or(1);
        let mut occurrences = Vec::new();

        for _ in 0..max_pages {
            query.page = Some(page);
            let result = self.occurrences(&query).await?;
            log::debug!(
                "Fetched occurrences page {page}/{} ({} items)",
                result.page_meta.page_count,
                result.data.len()
            );
            occurrences.extend(result.data);

            if !result.page_meta.has_next_page {
                return Ok(occurrences);
            }
            page += 1;
        }

        log::warn!("Stopped after {max_pages} occurrence pages; more are available");
        Ok(occurrences)
    }

    /// Resolves a state and a city by case-insensitive substring match
    /// and builds their report for `period`.
    ///
    /// # Errors
    ///
    /// * [`FogoCruzadoError::NotFound`] if the state or city is unknown.
    /// * Any request error.
    pub async fn city_report(
        &self,
        state_name: &str,
        city_name: &str,
        period: &ReportPeriod,
    ) -> Result<FogoCruzadoReport, FogoCruzadoError> {
        let states = self.states().await?;
        let state = find_by_name(&states, state_name, |s| s.name.as_str()).ok_or_else(|| {
            FogoCruzadoError::NotFound {
                kind: "state",
                name: state_name.to_string(),
            }
        })?;

        let cities = self.cities(Some(&state.id)).await?;
        let city = find_by_name(&cities, city_name, |c| c.name.as_str()).ok_or_else(|| {
            FogoCruzadoError::NotFound {
                kind: "city",
                name: city_name.to_string(),
            }
        })?;

        let query = OccurrenceQuery {
            state_id: Some(state.id.clone()),
            city_ids: vec![city.id.clone()],
            initial_date: Some(period.start.clone()),
            final_date: Some(period.end.clone()),
            page: None,
            take: Some(REPORT_PAGE_SIZE),
        };
        let occurrences = self.all_occurrences(&query, self.max_pages).await?;

        log::info!(
            "Fetched {} occurrences for {} ({} to {})",
            occurrences.len(),
            city.name,
            period.start,
            period.end
        );

        Ok(rollup::build_report(&occurrences, period.clone()))
    }

    /// Report for the configured [`CityTarget`].
    ///
    /// # Errors
    ///
    /// See [`Self::city_report`].
    pub async fn target_report(
        &self,
        period: &ReportPeriod,
    ) -> Result<FogoCruzadoReport, FogoCruzadoError> {
        self.city_report(&self.target.state, &self.target.city, period)
            .await
    }
}

fn find_by_name<'a, T>(items: &'a [T], needle: &str, name: impl Fn(&T) -> &str) -> Option<&'a T> {
    let needle = needle.to_lowercase();
    items
        .iter()
        .find(|item| name(item).to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct Counters {
        logins: AtomicUsize,
        occurrence_pages: AtomicUsize,
        reject_next: AtomicUsize,
    }

    fn authorized(req: &HttpRequest) -> bool {
        req.headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "Bearer test-token")
    }

    async fn login(counters: web::Data<Arc<Counters>>) -> HttpResponse {
        counters.logins.fetch_add(1, Ordering::SeqCst);
        HttpResponse::Created().json(json!({
            "msg": "ok",
            "code": 201,
            "data": { "accessToken": "test-token", "expiresIn": 3600 }
        }))
    }

    async fn states(req: HttpRequest, counters: web::Data<Arc<Counters>>) -> HttpResponse {
        if !authorized(&req) {
            return HttpResponse::Unauthorized().finish();
        }
        if counters
            .reject_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return HttpResponse::Unauthorized().finish();
        }
        HttpResponse::Ok().json(json!({
            "code": 200,
            "data": [
                { "id": "st-rj", "name": "Rio de Janeiro" },
                { "id": "st-ba", "name": "Bahia" }
            ]
        }))
    }

    async fn cities(req: HttpRequest) -> HttpResponse {
        if !authorized(&req) {
            return HttpResponse::Unauthorized().finish();
        }
        assert_eq!(req.query_string(), "stateId=st-ba");
        HttpResponse::Ok().json(json!({
            "code": 200,
            "data": [
                { "id": "ct-fsa", "name": "Feira de Santana" },
                { "id": "ct-ssa", "name": "Salvador" }
            ]
        }))
    }

    async fn occurrences(req: HttpRequest, counters: web::Data<Arc<Counters>>) -> HttpResponse {
        if !authorized(&req) {
            return HttpResponse::Unauthorized().finish();
        }
        counters.occurrence_pages.fetch_add(1, Ordering::SeqCst);
        let query = req.query_string();
        assert!(query.contains("idState=st-ba"));
        assert!(query.contains("idCities=ct-ssa"));
        assert!(query.contains("typeOccurrence=withVictim"));

        let page = if query.contains("page=2") { 2 } else { 1 };
        let (neighborhood, situation) = if page == 1 {
            ("Liberdade", "Dead")
        } else {
            ("Brotas", "Injured")
        };
        HttpResponse::Ok().json(json!({
            "pageMeta": {
                "page": page,
                "take": 1000,
                "itemCount": 2,
                "pageCount": 2,
                "hasPreviousPage": page == 2,
                "hasNextPage": page == 1
            },
            "data": [{
                "id": format!("occ-{page}"),
                "date": "2024-06-01T12:00:00.000Z",
                "neighborhood": { "id": neighborhood, "name": neighborhood },
                "victims": [{ "id": "v", "situation": situation }]
            }]
        }))
    }

    async fn start(counters: Arc<Counters>) -> String {
        let data = web::Data::new(counters);
        let server = HttpServer::new(move || {
            App::new()
                .app_data(data.clone())
                .route("/auth/login", web::post().to(login))
                .route("/states", web::get().to(states))
                .route("/cities", web::get().to(cities))
                .route("/occurrences", web::get().to(occurrences))
        })
        .workers(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_rt::spawn(server.run());
        format!("http://{addr}")
    }

    fn credentials() -> Option<Credentials> {
        Some(Credentials {
            email: "test@example.org".to_string(),
            password: "secret".to_string(),
        })
    }

    fn period() -> ReportPeriod {
        ReportPeriod {
            start: "2024-01-01".to_string(),
            end: "2024-12-31".to_string(),
        }
    }

    #[test]
    fn query_pairs_repeat_city_ids() {
        let query = OccurrenceQuery {
            state_id: Some("s".to_string()),
            city_ids: vec!["a".to_string(), "b".to_string()],
            take: Some(10),
            ..OccurrenceQuery::default()
        };
        let pairs = query.to_pairs();
        let cities: Vec<&str> = pairs
            .iter()
            .filter(|(k, _)| *k == "idCities")
            .map(|(_, v)| v.as_str())
            .collect();

        assert_eq!(cities, vec!["a", "b"]);
        assert!(pairs.contains(&("order", "DESC".to_string())));
        assert!(pairs.contains(&("take", "10".to_string())));
        assert!(!pairs.iter().any(|(k, _)| *k == "page"));
    }

    #[test]
    fn finds_names_case_insensitively() {
        let names = vec!["Rio de Janeiro".to_string(), "Bahia".to_string()];
        assert_eq!(
            find_by_name(&names, "bahia", String::as_str),
            Some(&"Bahia".to_string())
        );
        assert_eq!(find_by_name(&names, "pará", String::as_str), None);
    }

    #[actix_web::test]
    async fn missing_credentials_fail_at_first_use() {
        let client = FogoCruzadoClient::new("http://127.0.0.1:9", None);
        let result = client.states().await;
        assert!(matches!(result, Err(FogoCruzadoError::MissingCredentials)));
    }

    #[actix_web::test]
    async fn builds_city_report_across_pages() {
        let counters = Arc::new(Counters::default());
        let base = start(Arc::clone(&counters)).await;
        let client = FogoCruzadoClient::new(base, credentials()).with_retry(RetryPolicy::none());

        let report = client.target_report(&period()).await.unwrap();

        assert_eq!(report.total_occurrences, 2);
        assert_eq!(report.total_deaths, 1);
        assert_eq!(report.total_injured, 1);
        assert_eq!(report.neighborhoods[0].neighborhood, "Liberdade");
        assert_eq!(counters.occurrence_pages.load(Ordering::SeqCst), 2);
        assert_eq!(counters.logins.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn page_limit_stops_pagination() {
        let counters = Arc::new(Counters::default());
        let base = start(Arc::clone(&counters)).await;
        let client = FogoCruzadoClient::new(base, credentials())
            .with_retry(RetryPolicy::none())
            .with_max_pages(1);

        let report = client.target_report(&period()).await.unwrap();

        assert_eq!(report.total_occurrences, 1);
        assert_eq!(counters.occurrence_pages.load(Ordering::SeqCst), 1);
    }

    #[actix_web::test]
    async fn unauthorized_reauthenticates_once() {
        let counters = Arc::new(Counters::default());
        counters.reject_next.store(1, Ordering::SeqCst);
        let base = start(Arc::clone(&counters)).await;
        let client = FogoCruzadoClient::new(base, credentials()).with_retry(RetryPolicy::none());

        let states = client.states().await.unwrap();

        assert_eq!(states.len(), 2);
        assert_eq!(counters.logins.load(Ordering::SeqCst), 2);
    }

    #[actix_web::test]
    async fn repeated_unauthorized_is_an_error() {
        let counters = Arc::new(Counters::default());
        counters.reject_next.store(5, Ordering::SeqCst);
        let base = start(Arc::clone(&counters)).await;
        let client = FogoCruzadoClient::new(base, credentials()).with_retry(RetryPolicy::none());

        let result = client.states().await;

        assert!(matches!(result, Err(FogoCruzadoError::Unauthorized)));
        assert_eq!(counters.logins.load(Ordering::SeqCst), 2);
    }

    #[actix_web::test]
    async fn unknown_city_is_not_found() {
        let counters = Arc::new(Counters::default());
        let base = start(Arc::clone(&counters)).await;
        let client = FogoCruzadoClient::new(base, credentials())
            .with_retry(RetryPolicy::none())
            .with_target(CityTarget {
                state: "bahia".to_string(),
                city: "Ilhéus".to_string(),
            });

        let result = client.target_report(&period()).await;

        assert!(matches!(
            result,
            Err(FogoCruzadoError::NotFound { kind: "city", .. })
        ));
    }
}
