use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::Endpoints,
    error::FetchError,
    http::BoundedClient,
    model::{AirQuality, Coordinate, CurrentConditions, Forecast, UvIndex, unix_to_utc},
};

use super::WeatherSource;

const UNITS: &str = "metric";
const ONECALL_EXCLUDE: &str = "minutely,hourly,daily,alerts";

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    endpoints: Endpoints,
    http: BoundedClient,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, endpoints: Endpoints, budget: Duration) -> Self {
        Self {
            api_key,
            endpoints,
            http: BoundedClient::new(budget),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let raw = self.http.get(url, params).await?;

        let status = raw.status.as_u16();
        tracing::debug!(url, status, "provider response");

        raw.decode()
    }

    async fn fetch_current(&self, query: &str) -> Result<CurrentConditions, FetchError> {
        let place = place_query(query)?;
        let url = format!("{}/weather", self.endpoints.data_url);
        let params = [
            ("q", place),
            ("units", UNITS),
            ("appid", self.api_key.as_str()),
        ];

        self.get_json(&url, &params).await
    }

    async fn fetch_forecast_series(&self, query: &str) -> Result<Forecast, FetchError> {
        let place = place_query(query)?;
        let url = format!("{}/forecast", self.endpoints.data_url);
        let params = [
            ("q", place),
            ("units", UNITS),
            ("appid", self.api_key.as_str()),
        ];

        self.get_json(&url, &params).await
    }

    /// Turn a place name into coordinates using the first geocoding match.
    pub(crate) async fn resolve_location(&self, query: &str) -> Result<Coordinate, FetchError> {
        let place = place_query(query)?;
        let url = format!("{}/direct", self.endpoints.geo_url);
        let params = [
            ("q", place),
            ("limit", "1"),
            ("appid", self.api_key.as_str()),
        ];

        let matches: Vec<OwGeoMatch> = self.get_json(&url, &params).await?;
        let first = matches.first().ok_or_else(|| FetchError::NotFound {
            query: query.to_string(),
        })?;

        Ok(Coordinate {
            lat: first.lat,
            lon: first.lon,
        })
    }

    async fn fetch_air(&self, query: &str) -> Result<AirQuality, FetchError> {
        let coord = self.resolve_location(query).await?;
        let (lat, lon) = (coord.lat.to_string(), coord.lon.to_string());
        let url = format!("{}/air_pollution", self.endpoints.data_url);
        let params = [
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("appid", self.api_key.as_str()),
        ];

        let parsed: OwAirResponse = self.get_json(&url, &params).await?;
        let sample = parsed.list.into_iter().next().ok_or_else(|| {
            FetchError::Parse("air pollution response contained no data".to_string())
        })?;

        let c = sample.components;
        Ok(AirQuality {
            aqi: sample.main.aqi,
            pm25: c.pm2_5,
            pm10: c.pm10,
            no2: c.no2,
            o3: c.o3,
            so2: c.so2,
            co: c.co,
            nh3: c.nh3,
            city: query.to_string(),
        })
    }

    /// Strict UV lookup: every failure is returned to the caller.
    ///
    /// [`WeatherSource::fetch_uv_index`] wraps this and substitutes the
    /// fallback reading instead.
    pub async fn try_fetch_uv_index(&self, query: &str) -> Result<UvIndex, FetchError> {
        let coord = self.resolve_location(query).await?;
        let (lat, lon) = (coord.lat.to_string(), coord.lon.to_string());
        let url = format!("{}/onecall", self.endpoints.onecall_url);
        let params = [
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("exclude", ONECALL_EXCLUDE),
            ("appid", self.api_key.as_str()),
        ];

        let parsed: OwOneCallResponse = self.get_json(&url, &params).await?;

        Ok(UvIndex {
            value: parsed.current.uvi,
            date: unix_to_utc(parsed.current.dt),
            city: query.to_string(),
        })
    }
}

fn place_query(query: &str) -> Result<&str, FetchError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(FetchError::InvalidQuery)
    } else {
        Ok(trimmed)
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoMatch {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwAirMain {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct OwAirComponents {
    pm2_5: f64,
    pm10: f64,
    no2: f64,
    o3: f64,
    so2: Option<f64>,
    co: Option<f64>,
    nh3: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwAirSample {
    main: OwAirMain,
    components: OwAirComponents,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    list: Vec<OwAirSample>,
}

#[derive(Debug, Deserialize)]
struct OwOneCallCurrent {
    dt: i64,
    uvi: f64,
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    current: OwOneCallCurrent,
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn fetch_current_conditions(&self, query: &str) -> Result<CurrentConditions, FetchError> {
        self.fetch_current(query).await
    }

    async fn fetch_forecast(&self, query: &str) -> Result<Forecast, FetchError> {
        self.fetch_forecast_series(query).await
    }

    async fn fetch_air_quality(&self, query: &str) -> Result<AirQuality, FetchError> {
        self.fetch_air(query).await
    }

    async fn fetch_uv_index(&self, query: &str) -> UvIndex {
        match self.try_fetch_uv_index(query).await {
            Ok(uv) => uv,
            Err(err) => {
                tracing::warn!(query, error = %err, "UV index lookup failed, using fallback");
                UvIndex::fallback(query)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenWeatherClient {
        OpenWeatherClient::new(
            "TEST_KEY".to_string(),
            Endpoints::with_base(&server.uri()),
            Duration::from_millis(300),
        )
    }

    #[tokio::test]
    async fn resolve_location_takes_first_match() {
        let mock_server = MockServer::start().await;
        let body = serde_json::json!([
            { "name": "Jerusalem", "lat": 31.78, "lon": 35.22, "country": "IL" }
        ]);

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Jerusalem"))
            .and(query_param("limit", "1"))
            .and(query_param("appid", "TEST_KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let coord = client.resolve_location("Jerusalem").await.unwrap();

        assert_eq!((coord.lat, coord.lon), (31.78, 35.22));
    }

    #[tokio::test]
    async fn resolve_location_empty_result_is_not_found() {
        let mock_server = MockServer::start().await;
        let body = serde_json::json!([]);

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.resolve_location("Atlantis").await.unwrap_err();

        assert!(matches!(err, FetchError::NotFound { query } if query == "Atlantis"));
    }

    #[tokio::test]
    async fn resolve_location_non_success_is_provider_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.resolve_location("Jerusalem").await.unwrap_err();

        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn resolve_location_times_out() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.resolve_location("Jerusalem").await.unwrap_err();

        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn blank_query_never_reaches_the_network() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.resolve_location("   ").await.unwrap_err();

        assert_eq!(err, FetchError::InvalidQuery);
    }

    #[test]
    fn place_query_trims() {
        assert_eq!(place_query("  Eilat "), Ok("Eilat"));
        assert_eq!(place_query(""), Err(FetchError::InvalidQuery));
    }
}
