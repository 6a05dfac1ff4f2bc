use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    config::WeatherSettings,
    model::{Place, Snapshot, WeatherReading},
    provider::{LookupError, truncate_body},
};

use super::WeatherProvider;

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Open-Meteo geocoding + current weather. No API key required.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    geocoding_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(
        geocoding_url: impl Into<String>,
        forecast_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for Open-Meteo")?;

        Ok(Self { geocoding_url: geocoding_url.into(), forecast_url: forecast_url.into(), http })
    }

    pub fn from_settings(settings: &WeatherSettings) -> Result<Self> {
        Self::new(&settings.geocoding_url, &settings.forecast_url, settings.timeout())
    }

    async fn geocode(&self, city: &str) -> Result<Place> {
        let res = self
            .http
            .get(&self.geocoding_url)
            .query(&[("name", city), ("count", "1"), ("language", "en"), ("format", "json")])
            .send()
            .await
            .context("Failed to search city")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read geocoding response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Failed to search city: geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: GeoResponse =
            serde_json::from_str(&body).context("Failed to parse geocoding JSON")?;

        let hit = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| LookupError::CityNotFound(city.to_string()))?;

        debug!(city, name = %hit.name, latitude = hit.latitude, longitude = hit.longitude, "geocoded city");

        Ok(Place {
            name: Some(hit.name),
            country: hit.country,
            latitude: Some(hit.latitude),
            longitude: Some(hit.longitude),
        })
    }

    async fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<WeatherReading> {
        let lat = latitude.to_string();
        let lon = longitude.to_string();

        let res = self
            .http
            .get(&self.forecast_url)
            .query(&[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("current_weather", "true"),
            ])
            .send()
            .await
            .context("Failed to fetch weather")?;

        let status = res.status();
        let body = res.text().await.context("Failed to read forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Failed to fetch weather: forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: ForecastResponse =
            serde_json::from_str(&body).context("Failed to parse forecast JSON")?;

        Ok(parsed.current_weather.unwrap_or_default())
    }
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: String,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current_weather: Option<WeatherReading>,
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn snapshot(&self, city: &str) -> Result<Snapshot> {
        let city = city.trim();
        if city.is_empty() {
            return Err(LookupError::EmptyCity.into());
        }

        let place = self.geocode(city).await?;
        let (Some(lat), Some(lon)) = (place.latitude, place.longitude) else {
            return Err(anyhow!("Geocoding result for '{city}' has no coordinates"));
        };
        let weather = self.fetch_current(lat, lon).await?;

        Ok(Snapshot { place, weather })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenMeteoProvider {
        OpenMeteoProvider::new(
            format!("{}/v1/search", server.uri()),
            format!("{}/v1/forecast", server.uri()),
            Duration::from_secs(5),
        )
        .expect("client")
    }

    async fn mount_paris_geocoding(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Paris"))
            .and(query_param("count", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    { "name": "Paris", "country": "France", "latitude": 48.85, "longitude": 2.35 }
                ]
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn snapshot_geocodes_then_fetches_current_weather() {
        let server = MockServer::start().await;
        mount_paris_geocoding(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "48.85"))
            .and(query_param("longitude", "2.35"))
            .and(query_param("current_weather", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "current_weather": {
                    "temperature": 3.2, "windspeed": 10.1, "weathercode": 61, "time": "2024-07-15T14:00"
                }
            })))
            .mount(&server)
            .await;

        let snapshot = provider(&server).snapshot("  Paris ").await.unwrap();

        assert_eq!(snapshot.place.display_name(), "Paris, France");
        assert_eq!(snapshot.weather.temperature, Some(3.2));
        assert_eq!(snapshot.weather.condition_code, Some(61));
        assert_eq!(snapshot.weather.observed_at.as_deref(), Some("2024-07-15T14:00"));
    }

    #[tokio::test]
    async fn unknown_city_is_a_lookup_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "generationtime_ms": 0.5 })))
            .mount(&server)
            .await;

        let err = provider(&server).snapshot("Atlantis").await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<LookupError>(),
            Some(&LookupError::CityNotFound("Atlantis".into()))
        );
    }

    #[tokio::test]
    async fn empty_city_is_rejected_without_a_request() {
        let server = MockServer::start().await;

        let err = provider(&server).snapshot("   ").await.unwrap_err();
        assert_eq!(err.downcast_ref::<LookupError>(), Some(&LookupError::EmptyCity));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn geocoding_failure_reports_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("geocoder overloaded"))
            .mount(&server)
            .await;

        let err = provider(&server).snapshot("Paris").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Failed to search city"));
        assert!(msg.contains("500"));
        assert!(msg.contains("geocoder overloaded"));
        assert!(err.downcast_ref::<LookupError>().is_none());
    }

    #[tokio::test]
    async fn forecast_failure_reports_status() {
        let server = MockServer::start().await;
        mount_paris_geocoding(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = provider(&server).snapshot("Paris").await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Failed to fetch weather"));
        assert!(msg.contains("503"));
        assert!(msg.contains("upstream down"));
    }

    #[tokio::test]
    async fn missing_current_weather_degrades_to_empty_reading() {
        let server = MockServer::start().await;
        mount_paris_geocoding(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "latitude": 48.85 })))
            .mount(&server)
            .await;

        let snapshot = provider(&server).snapshot("Paris").await.unwrap();
        assert_eq!(snapshot.weather, WeatherReading::default());
    }
}
