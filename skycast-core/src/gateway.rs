use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::LocationQuery;

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

/// Gateway to the OpenWeather HTTP API.
///
/// One lookup issues two requests, current conditions and the 5-day
/// forecast, and returns both raw payloads as a [`WeatherBundle`]. Either
/// request failing fails the whole bundle; there are no retries and no
/// partial results.
#[derive(Debug, Clone)]
pub struct OpenWeatherGateway {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenWeatherGateway {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
            base_url: OPENWEATHER_BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self { api_key, http: Client::new(), base_url }
    }

    /// Fetch current conditions and forecast for a location key.
    ///
    /// The key is classified syntactically: `lat=..&lon=..` text is forwarded
    /// verbatim, anything else goes out as a `q=` place-name parameter.
    pub async fn fetch_bundle(&self, location: &str) -> Result<WeatherBundle> {
        let query = LocationQuery::classify(location);

        let current = self
            .fetch_json::<OwCurrentResponse>("/data/2.5/weather", &query, "current conditions")
            .await?;
        let forecast = self
            .fetch_json::<OwForecastResponse>("/data/2.5/forecast", &query, "forecast")
            .await?;

        Ok(WeatherBundle { current, forecast })
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &LocationQuery,
        what: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, what, "requesting OpenWeather endpoint");

        let request = match query {
            // Coordinate keys already are query text; splice them in as-is.
            LocationQuery::Coordinates(raw) => self.http.get(format!("{url}?{raw}")),
            LocationQuery::Name(name) => self.http.get(url).query(&[("q", name.as_str())]),
        };

        let response = request
            .query(&[("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = provider_message(&body);
            warn!(status = status.as_u16(), %message, what, "OpenWeather request failed");
            return Err(Error::Upstream { status: status.as_u16(), message });
        }

        serde_json::from_str(&body)
            .map_err(|err| Error::MalformedData(format!("{what} response: {err}")))
    }
}

/// Pull the provider's own error text out of a failure body, if any.
fn provider_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct OwErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<OwErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// Both raw provider payloads for one lookup, unmodified.
#[derive(Debug, Clone)]
pub struct WeatherBundle {
    pub current: OwCurrentResponse,
    pub forecast: OwForecastResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWeather {
    pub id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWind {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwSys {
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwCurrentResponse {
    pub name: String,
    pub dt: i64,
    pub main: OwMain,
    pub weather: Vec<OwWeather>,
    pub wind: OwWind,
    pub sys: OwSys,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastEntry {
    pub dt: i64,
    pub main: OwMain,
    pub weather: Vec<OwWeather>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastResponse {
    pub list: Vec<OwForecastEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn current_body(name: &str, temp: f64) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "dt": 1_717_243_200_i64,
            "main": { "temp": temp, "feels_like": temp - 1.0, "humidity": 64 },
            "weather": [ { "id": 800, "description": "clear sky" } ],
            "wind": { "speed": 3.4 },
            "sys": { "sunrise": 1_717_212_000_i64, "sunset": 1_717_269_000_i64 }
        })
    }

    fn forecast_body(entries: &[(i64, f64, i64)]) -> serde_json::Value {
        let list: Vec<serde_json::Value> = entries
            .iter()
            .map(|(dt, temp, code)| {
                serde_json::json!({
                    "dt": dt,
                    "main": { "temp": temp, "feels_like": temp, "humidity": 70 },
                    "weather": [ { "id": code, "description": "whatever" } ]
                })
            })
            .collect();
        serde_json::json!({ "list": list })
    }

    #[tokio::test]
    async fn fetches_both_payloads_for_a_place_name() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "London"))
            .and(query_param("units", "metric"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London", 12.3)))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .and(query_param("q", "London"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(forecast_body(&[(1_717_243_200, 10.0, 800)])),
            )
            .mount(&server)
            .await;

        let gateway = OpenWeatherGateway::with_base_url("KEY".to_string(), server.uri());
        let bundle = gateway.fetch_bundle("London").await.unwrap();

        assert_eq!(bundle.current.name, "London");
        assert_eq!(bundle.current.main.temp, 12.3);
        assert_eq!(bundle.current.weather[0].id, 800);
        assert_eq!(bundle.forecast.list.len(), 1);
    }

    #[tokio::test]
    async fn coordinate_key_is_forwarded_verbatim() {
        let server = MockServer::start().await;

        for endpoint in ["/data/2.5/weather", "/data/2.5/forecast"] {
            let body = if endpoint.ends_with("weather") {
                current_body("New York", 20.0)
            } else {
                forecast_body(&[(1_717_243_200, 18.0, 500)])
            };
            Mock::given(method("GET"))
                .and(path(endpoint))
                .and(query_param("lat", "40.7"))
                .and(query_param("lon", "-74.0"))
                .and(query_param("units", "metric"))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&server)
                .await;
        }

        let gateway = OpenWeatherGateway::with_base_url("KEY".to_string(), server.uri());
        let bundle = gateway.fetch_bundle("lat=40.7&lon=-74.0").await.unwrap();

        assert_eq!(bundle.current.name, "New York");
    }

    #[tokio::test]
    async fn upstream_error_carries_status_and_provider_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({ "cod": "404", "message": "city not found" })),
            )
            .mount(&server)
            .await;
        // No forecast mock mounted: with current conditions failing first,
        // the forecast endpoint must never be required.

        let gateway = OpenWeatherGateway::with_base_url("KEY".to_string(), server.uri());
        let err = gateway.fetch_bundle("Atlantis").await.unwrap_err();

        match err {
            Error::Upstream { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "city not found");
            }
            other => panic!("expected Upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn upstream_error_without_message_falls_back_to_unknown() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string("not even json"))
            .mount(&server)
            .await;

        let gateway = OpenWeatherGateway::with_base_url("KEY".to_string(), server.uri());
        let err = gateway.fetch_bundle("London").await.unwrap_err();

        match err {
            Error::Upstream { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Unknown error");
            }
            other => panic!("expected Upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn forecast_failure_fails_the_whole_bundle() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London", 12.3)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({ "message": "Invalid API key" })),
            )
            .mount(&server)
            .await;

        let gateway = OpenWeatherGateway::with_base_url("BAD".to_string(), server.uri());
        let err = gateway.fetch_bundle("London").await.unwrap_err();

        match err {
            Error::Upstream { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("expected Upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn success_body_with_missing_fields_is_malformed_data() {
        let server = MockServer::start().await;

        // `main` is missing entirely.
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "London",
                "dt": 1_717_243_200_i64
            })))
            .mount(&server)
            .await;

        let gateway = OpenWeatherGateway::with_base_url("KEY".to_string(), server.uri());
        let err = gateway.fetch_bundle("London").await.unwrap_err();

        assert!(matches!(err, Error::MalformedData(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn transport_failure_is_distinct_from_upstream() {
        // Nothing is listening on this port.
        let gateway = OpenWeatherGateway::with_base_url(
            "KEY".to_string(),
            "http://127.0.0.1:9".to_string(),
        );
        let err = gateway.fetch_bundle("London").await.unwrap_err();

        assert!(matches!(err, Error::Transport(_)), "got {err:?}");
    }
}
