//! Open-Meteo forecast and air-quality client.

use crate::types::{AirQualityResponse, ForecastResponse, WeatherError};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

const HOURLY_FIELDS: &str = "temperature_2m,weathercode,uv_index,relativehumidity_2m,visibility";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,sunrise,sunset";

/// Base URLs for the three services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub geocoding: String,
    pub forecast: String,
    pub air_quality: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: GEOCODING_URL.to_string(),
            forecast: FORECAST_URL.to_string(),
            air_quality: AIR_QUALITY_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// All three services behind a single base URL (mock servers).
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            geocoding: format!("{}/v1/search", base),
            forecast: format!("{}/v1/forecast", base),
            air_quality: format!("{}/v1/air-quality", base),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    pub(crate) client: Arc<Client>,
    pub(crate) endpoints: Endpoints,
}

impl WeatherProvider {
    pub fn new(endpoints: Endpoints, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            endpoints,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Current conditions plus hourly and daily series, in the location's own time zone.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<ForecastResponse, WeatherError> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current_weather", "true".to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
        ];
        self.get_json(&self.endpoints.forecast, &query).await
    }

    #[instrument(skip(self), level = "info")]
    pub async fn air_quality(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AirQualityResponse, WeatherError> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", "us_aqi".to_string()),
        ];
        self.get_json(&self.endpoints.air_quality, &query).await
    }

    /// GET `url` with `query` and decode the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} returned status {}", url, status);
            return Err(WeatherError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))
    }
}
