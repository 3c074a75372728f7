use serde::{Deserialize, Serialize};

/// A geocoding hit from the Open-Meteo search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub admin1: Option<String>,
}

impl City {
    /// Dashboard heading, e.g. "Jakarta, ID".
    pub fn display_label(&self) -> String {
        match self.country_code.as_deref() {
            Some(code) if !code.is_empty() => format!("{}, {}", self.name, code),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub results: Option<Vec<City>>,
}

/// `current_weather` block of the forecast response.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeatherBlock {
    pub time: String,
    pub temperature: f64,
    pub windspeed: f64,
    pub winddirection: f64,
    pub weathercode: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HourlyBlock {
    pub time: Vec<String>,
    pub temperature_2m: Vec<Option<f64>>,
    pub weathercode: Vec<Option<i32>>,
    pub uv_index: Vec<Option<f64>>,
    pub relativehumidity_2m: Vec<Option<f64>>,
    pub visibility: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyBlock {
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub sunrise: Vec<String>,
    pub sunset: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub timezone: Option<String>,
    pub current_weather: CurrentWeatherBlock,
    pub hourly: HourlyBlock,
    pub daily: DailyBlock,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirCurrent {
    #[serde(default)]
    pub us_aqi: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AirQualityResponse {
    pub current: AirCurrent,
}

/// Weather client errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Missing field: {0}")]
    MissingField(String),
    #[error("Location not found: {0}")]
    LocationNotFound(String),
}

impl WeatherError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::LocationNotFound(_))
    }
}
