// src/services/flights.rs

//! Flight API client.
//!
//! Every public operation converts failures into values: airport lookups
//! return an empty list, flight searches return a `ReconciledResult`.

use chrono::{Local, NaiveDate};
use serde_json::Value;

use crate::error::{Result, TransportError};
use crate::models::{AirportSuggestion, Config, ReconciledResult, SearchIntent};
use crate::services::normalizer::build_search_params_on;
use crate::services::reconciler::Reconciler;
use crate::utils::http::{ApiRequest, ReqwestTransport, Transport};

pub const SEARCH_AIRPORT_PATH: &str = "/api/v1/flights/searchAirport";
pub const SEARCH_FLIGHTS_PATH: &str = "/api/v1/flights/searchFlights";
pub const NEARBY_AIRPORTS_PATH: &str = "/api/v1/flights/getNearByAirports";

pub const CONFIG_MISSING: &str = "API configuration missing";

/// Client for the upstream flight API.
pub struct FlightsClient<T = ReqwestTransport> {
    config: Config,
    transport: T,
    reconciler: Reconciler,
}

impl FlightsClient<ReqwestTransport> {
    /// Create a client that talks HTTP.
    pub fn new(config: Config) -> Result<Self> {
        let transport = ReqwestTransport::new(&config.api)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> FlightsClient<T> {
    /// Create a client over an arbitrary transport.
    pub fn with_transport(config: Config, transport: T) -> Self {
        let reconciler = Reconciler::new(config.display.clock);
        Self {
            config,
            transport,
            reconciler,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Credentials check performed before every call.
    fn configured(&self) -> bool {
        if self.config.api.is_complete() {
            return true;
        }
        log::error!("Missing required API configuration (base URL, key and host)");
        false
    }

    /// Look up airports matching a free-text query.
    pub async fn search_airport(&self, query: &str) -> Vec<AirportSuggestion> {
        let query = query.trim();
        if query.chars().count() < self.config.search.min_query_len.max(1) {
            return Vec::new();
        }
        if !self.configured() {
            return Vec::new();
        }

        log::info!("Searching airports for: {}", query);
        let request = ApiRequest::new(SEARCH_AIRPORT_PATH, self.config.api.airport_timeout())
            .param("query", query);

        match self.transport.get_json(request).await {
            Ok(body) => {
                log::debug!("Airport search response: {}", body);
                suggestions_from(&body, |data| data.as_array().map(Vec::as_slice))
            }
            Err(error) => {
                log_failure("searching airport", &error);
                Vec::new()
            }
        }
    }

    /// Airports near a coordinate; the current one first.
    pub async fn nearby_airports(&self, lat: f64, lng: f64) -> Vec<AirportSuggestion> {
        if !self.configured() {
            return Vec::new();
        }

        log::info!("Getting nearby airports for: {}, {}", lat, lng);
        let request = ApiRequest::new(NEARBY_AIRPORTS_PATH, self.config.api.airport_timeout())
            .param("lat", lat.to_string())
            .param("lng", lng.to_string());

        match self.transport.get_json(request).await {
            Ok(body) => {
                log::debug!("Nearby airports response: {}", body);
                nearby_from(&body)
            }
            Err(error) => {
                log_failure("getting nearby airports", &error);
                Vec::new()
            }
        }
    }

    /// Validate, call `searchFlights`, and reconcile the response.
    pub async fn search_flights(&self, intent: &SearchIntent) -> ReconciledResult {
        self.search_flights_on(intent, Local::now().date_naive()).await
    }

    /// `search_flights` with an explicit current date.
    pub async fn search_flights_on(&self, intent: &SearchIntent, today: NaiveDate) -> ReconciledResult {
        if !self.configured() {
            return ReconciledResult::api_error(CONFIG_MISSING);
        }

        let params = match build_search_params_on(intent, today) {
            Ok(params) => params,
            Err(error) => {
                log::warn!("Rejected flight search: {}", error);
                return ReconciledResult::api_error(error.to_string());
            }
        };

        log::info!(
            "Searching flights {} -> {} on {}",
            params.origin_sky_id,
            params.destination_sky_id,
            params.date
        );
        let request = ApiRequest::new(SEARCH_FLIGHTS_PATH, self.config.api.search_timeout())
            .params(params.to_query());
        log::debug!("Final request params: {:?}", request.query);

        match self.transport.get_json(request).await {
            Ok(body) => self.reconciler.reconcile(Some(&body)),
            Err(error) => {
                log_failure("searching flights", &error);
                ReconciledResult::api_error(error.user_message())
            }
        }
    }
}

fn log_failure(context: &str, error: &TransportError) {
    match error {
        TransportError::Status { status, body } => log::error!(
            "Error {}: HTTP {} {}",
            context,
            status,
            body.as_ref().map(Value::to_string).unwrap_or_default()
        ),
        other => log::error!("Error {}: {}", context, other),
    }
}

/// Parse suggestions from a `{status, data}` envelope or a bare array.
///
/// `select` picks the element list out of a successful `data` value.
fn suggestions_from<'a, F>(body: &'a Value, select: F) -> Vec<AirportSuggestion>
where
    F: Fn(&'a Value) -> Option<&'a [Value]>,
{
    let items = if body.get("status").and_then(Value::as_bool) == Some(true) {
        body.get("data").and_then(&select)
    } else {
        body.as_array().map(Vec::as_slice)
    };

    let Some(items) = items else {
        log::warn!("Unexpected airport response structure: {}", body);
        return Vec::new();
    };

    let suggestions: Vec<_> = items.iter().filter_map(AirportSuggestion::from_json).collect();
    if suggestions.len() < items.len() {
        log::debug!(
            "Skipped {} airport entries without identifiers",
            items.len() - suggestions.len()
        );
    }
    suggestions
}

/// Nearby data is either a list or `{current, nearby, recent}`.
fn nearby_from(body: &Value) -> Vec<AirportSuggestion> {
    let Some(data) = body
        .get("status")
        .and_then(Value::as_bool)
        .filter(|ok| *ok)
        .and_then(|_| body.get("data"))
    else {
        return Vec::new();
    };

    if data.is_array() {
        return suggestions_from(body, |data| data.as_array().map(Vec::as_slice));
    }

    let mut airports: Vec<AirportSuggestion> = Vec::new();
    let current = data.get("current").and_then(AirportSuggestion::from_json);
    let nearby = data
        .get("nearby")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(AirportSuggestion::from_json);

    for airport in current.into_iter().chain(nearby) {
        if !airports.iter().any(|a| a.entity_id == airport.entity_id) {
            airports.push(airport);
        }
    }
    airports
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::FakeTransport;
    use super::*;
    use crate::models::AirportRef;

    fn configured() -> Config {
        let mut config = Config::default();
        config.api.api_key = Some("key".into());
        config.api.api_host = Some("sky-scrapper.p.rapidapi.com".into());
        config
    }

    fn client(transport: &FakeTransport) -> FlightsClient<FakeTransport> {
        FlightsClient::with_transport(configured(), transport.clone())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
    }

    fn intent() -> SearchIntent {
        SearchIntent {
            origin: Some(AirportRef::new("JFK", "95565058", "New York")),
            destination: Some(AirportRef::new("LHR", "95565050", "London")),
            date: "2025-03-01".into(),
        }
    }

    #[tokio::test]
    async fn missing_credentials_short_circuit() {
        let transport = FakeTransport::answering(json!({ "status": true, "data": [] }));
        let client = FlightsClient::with_transport(Config::default(), transport.clone());

        assert!(client.search_airport("london").await.is_empty());
        assert!(client.nearby_airports(51.5, -0.1).await.is_empty());
        assert_eq!(
            client.search_flights_on(&intent(), today()).await,
            ReconciledResult::api_error(CONFIG_MISSING)
        );
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn search_airport_parses_envelope() {
        let transport = FakeTransport::answering(json!({
            "status": true,
            "data": [
                { "skyId": "LOND", "entityId": "27544008",
                  "presentation": { "title": "London", "suggestionTitle": "London (Any)" } },
                { "presentation": { "title": "no ids" } },
                { "skyId": "LHR", "entityId": "95565050",
                  "presentation": { "title": "London Heathrow" } }
            ]
        }));

        let airports = client(&transport).search_airport("  london ").await;
        assert_eq!(airports.len(), 2);
        assert_eq!(airports[1].sky_id, "LHR");

        let requests = transport.requests();
        assert_eq!(requests[0].path, SEARCH_AIRPORT_PATH);
        assert_eq!(requests[0].query_value("query"), Some("london"));
        assert_eq!(requests[0].timeout.as_secs(), 15);
    }

    #[tokio::test]
    async fn search_airport_tolerates_other_shapes() {
        let transport = FakeTransport::answering(json!([
            { "skyId": "PARI", "entityId": "27539733" }
        ]));
        transport
            .push(Ok(json!({ "status": false, "message": "nope" })))
            .push(Err(TransportError::Timeout));

        let client = client(&transport);
        assert!(client.search_airport("paris").await.is_empty());
        assert!(client.search_airport("paris").await.is_empty());
        assert_eq!(client.search_airport("paris").await.len(), 1);
    }

    #[tokio::test]
    async fn blank_query_is_not_sent() {
        let transport = FakeTransport::answering(json!({ "status": true, "data": [] }));
        assert!(client(&transport).search_airport("   ").await.is_empty());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn search_flights_sends_canonical_params() {
        let transport = FakeTransport::answering(json!({
            "status": true,
            "data": { "itineraries": [{ "id": "a", "price": { "formatted": "$100" } }] }
        }));

        let result = client(&transport).search_flights_on(&intent(), today()).await;
        assert_eq!(result.itineraries().len(), 1);
        assert_eq!(result.itineraries()[0].price, "$100");

        let request = &transport.requests()[0];
        assert_eq!(request.path, SEARCH_FLIGHTS_PATH);
        assert_eq!(request.timeout.as_secs(), 45);
        assert_eq!(request.query_value("originSkyId"), Some("JFK"));
        assert_eq!(request.query_value("destinationEntityId"), Some("95565050"));
        assert_eq!(request.query_value("date"), Some("2025-03-01"));
        assert_eq!(request.query_value("adults"), Some("1"));
        assert_eq!(request.query_value("sortBy"), Some("best"));
    }

    #[tokio::test]
    async fn invalid_intent_never_reaches_network() {
        let transport = FakeTransport::answering(json!({}));
        let mut bad = intent();
        bad.date = "03/01/2025".into();

        let result = client(&transport).search_flights_on(&bad, today()).await;
        assert_eq!(
            result,
            ReconciledResult::api_error("Date must be in YYYY-MM-DD format")
        );
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn past_travel_date_never_reaches_network() {
        let transport = FakeTransport::answering(json!({}));
        let client = client(&transport);

        let result = client
            .search_flights_on(&intent(), NaiveDate::from_ymd_opt(2025, 3, 2).unwrap())
            .await;
        assert_eq!(
            result.error_message(),
            Some("Travel date 2025-03-01 is before 2025-03-02")
        );

        // The intent's date is long gone by the wall clock.
        let result = client.search_flights(&intent()).await;
        assert!(result.error_message().unwrap().starts_with("Travel date 2025-03-01 is before"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn transport_failures_become_api_errors() {
        let transport = FakeTransport::answering(json!({}));
        transport
            .push(Err(TransportError::Status {
                status: 429,
                body: Some(json!({ "message": "slow down" })),
            }))
            .push(Err(TransportError::Timeout))
            .push(Ok(Value::Null));

        let client = client(&transport);
        assert_eq!(
            client.search_flights_on(&intent(), today()).await.error_message(),
            Some("Too many requests. Please wait before trying again.")
        );
        assert_eq!(
            client.search_flights_on(&intent(), today()).await.error_message(),
            Some("Request timeout. Please check your internet connection.")
        );
        assert_eq!(
            client.search_flights_on(&intent(), today()).await,
            ReconciledResult::malformed("No data received")
        );
    }

    #[tokio::test]
    async fn nearby_merges_current_and_nearby() {
        let airport = |sky: &str, entity: &str| {
            json!({
                "presentation": { "title": sky },
                "navigation": { "relevantFlightParams": { "skyId": sky, "entityId": entity } }
            })
        };
        let transport = FakeTransport::answering(json!({
            "status": true,
            "data": {
                "current": airport("LHR", "95565050"),
                "nearby": [airport("LHR", "95565050"), airport("LGW", "95565051")],
                "recent": [airport("CDG", "95565041")]
            }
        }));

        let airports = client(&transport).nearby_airports(51.47, -0.45).await;
        let ids: Vec<&str> = airports.iter().map(|a| a.sky_id.as_str()).collect();
        assert_eq!(ids, ["LHR", "LGW"]);

        let request = &transport.requests()[0];
        assert_eq!(request.path, NEARBY_AIRPORTS_PATH);
        assert_eq!(request.query_value("lat"), Some("51.47"));
        assert_eq!(request.query_value("lng"), Some("-0.45"));
    }

    #[tokio::test]
    async fn nearby_accepts_list_and_ignores_failure() {
        let transport = FakeTransport::answering(json!({
            "status": true,
            "data": [{ "skyId": "SFO", "entityId": "1" }]
        }));
        transport.push(Ok(json!({ "status": false })));

        let client = client(&transport);
        assert!(client.nearby_airports(0.0, 0.0).await.is_empty());
        assert_eq!(client.nearby_airports(0.0, 0.0).await.len(), 1);
    }
}
