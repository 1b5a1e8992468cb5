//! Forecast gateway
//!
//! Every call is a fresh round trip to the provider; nothing is cached.

pub mod codes;
pub mod open_meteo;

use std::time::{Duration, Instant};

use reqwest::Url;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tracing::{debug, instrument, warn};

use crate::config::WeatherConfig;
use crate::error::AtlasError;
use crate::models::Forecast;
use crate::Result;
pub use codes::{weather_code_to_description, weather_code_to_icon};
use open_meteo::{CURRENT_VARIABLES, DAILY_VARIABLES, FORECAST_DAYS, ForecastResponse};

/// HTTP client for the `OpenMeteo` forecast endpoint
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: ClientWithMiddleware,
    base_url: String,
}

impl ForecastClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .user_agent(concat!("airport-atlas/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AtlasError::config(format!("Failed to build HTTP client: {e}")))?;

        let mut builder = ClientBuilder::new(http);
        if config.max_retries > 0 {
            let retry_policy =
                ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }

        Ok(Self {
            client: builder.build(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Request URL for a position
    pub fn forecast_url(&self, latitude: f64, longitude: f64) -> Result<Url> {
        let endpoint = format!("{}/forecast", self.base_url);
        let params = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_VARIABLES.to_string()),
            ("daily", DAILY_VARIABLES.to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", FORECAST_DAYS.to_string()),
        ];
        Url::parse_with_params(&endpoint, &params)
            .map_err(|e| AtlasError::config(format!("Invalid weather base URL '{endpoint}': {e}")))
    }

    /// Fetch and reshape the forecast for a position
    #[instrument(skip(self))]
    pub async fn get_forecast(&self, latitude: f64, longitude: f64) -> Result<Forecast> {
        let url = self.forecast_url(latitude, longitude)?;
        debug!("Requesting forecast from {}", url);
        let started = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Weather provider unreachable: {}", e);
            AtlasError::upstream(format!("Request failed: {e}"))
        })?;

        let status = response.status();
        debug!(
            "Weather provider answered {} in {} ms",
            status,
            started.elapsed().as_millis()
        );
        if !status.is_success() {
            warn!("Weather provider answered {}", status);
            return Err(AtlasError::upstream_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error"),
            ));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| AtlasError::upstream(format!("Failed to parse forecast response: {e}")))?;

        let forecast = Forecast::from_open_meteo(body)?;
        debug!(
            "Forecast for {} with {} days",
            forecast.timezone,
            forecast.daily.len()
        );
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, http::StatusCode, routing::get};
    use serde_json::json;
    use std::collections::HashMap;

    fn config(base_url: &str) -> WeatherConfig {
        WeatherConfig {
            base_url: base_url.to_string(),
            ..WeatherConfig::default()
        }
    }

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    #[test]
    fn test_forecast_url_parameters() {
        let client = ForecastClient::new(&config("https://api.open-meteo.com/v1/")).unwrap();
        let url = client.forecast_url(35.55, 139.78).unwrap();

        assert_eq!(url.path(), "/v1/forecast");
        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(params["latitude"], "35.55");
        assert_eq!(params["longitude"], "139.78");
        assert_eq!(params["current"], CURRENT_VARIABLES);
        assert_eq!(params["daily"], DAILY_VARIABLES);
        assert_eq!(params["timezone"], "auto");
        assert_eq!(params["forecast_days"], "7");
    }

    #[tokio::test]
    async fn test_get_forecast_from_provider() {
        let app = Router::new().route(
            "/v1/forecast",
            get(|| async {
                Json(json!({
                    "timezone": "Europe/Paris",
                    "current": {
                        "time": "2024-05-01T12:00",
                        "temperature_2m": 15.0,
                        "weather_code": 0,
                        "wind_speed_10m": 5.0,
                        "wind_direction_10m": 90.0,
                        "relative_humidity_2m": 40.0
                    },
                    "daily": {
                        "time": ["2024-05-01"],
                        "temperature_2m_max": [18.0],
                        "temperature_2m_min": [9.0],
                        "weather_code": [0],
                        "precipitation_probability_max": [0],
                        "wind_speed_10m_max": [12.0]
                    }
                }))
            }),
        );
        let client = ForecastClient::new(&config(&serve(app).await)).unwrap();

        let forecast = client.get_forecast(49.0, 2.5).await.unwrap();
        assert_eq!(forecast.timezone, "Europe/Paris");
        assert_eq!(forecast.current.icon, "☀️");
        assert_eq!(forecast.daily.len(), 1);
    }

    #[tokio::test]
    async fn test_provider_error_status_is_reported() {
        let app = Router::new().route(
            "/v1/forecast",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let client = ForecastClient::new(&config(&serve(app).await)).unwrap();

        let err = client.get_forecast(0.0, 0.0).await.unwrap_err();
        assert_eq!(err.upstream_status_code(), Some(503));
    }

    #[tokio::test]
    async fn test_malformed_document_is_upstream_error() {
        let app = Router::new().route(
            "/v1/forecast",
            get(|| async { Json(json!({ "timezone": "UTC" })) }),
        );
        let client = ForecastClient::new(&config(&serve(app).await)).unwrap();

        let err = client.get_forecast(0.0, 0.0).await.unwrap_err();
        assert!(matches!(err, AtlasError::Upstream { status: None, .. }));
    }
}
