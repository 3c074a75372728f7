//! Dashboard view model: maps forecast and air-quality payloads onto the
//! values the template displays.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::classify::{
    aqi_status, deg_to_compass, round_half_up, uv_status, weather_desc, Status, WeatherDesc,
};
use crate::clock::{format_long_date, timezone_label, weekday_name, ClockZone};
use crate::provider::WeatherProvider;
use crate::types::{AirQualityResponse, ForecastResponse, HourlyBlock, WeatherError};

const LOCAL_TIME_FMT: &str = "%Y-%m-%dT%H:%M";

/// One cell of the hourly strip.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyEntry {
    pub time: String,
    pub temperature: Option<i64>,
    pub icon: &'static str,
    pub is_now: bool,
}

/// Everything the dashboard template shows for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub location: String,
    /// IANA zone reported by the forecast, if any
    pub timezone: Option<String>,
    pub timezone_label: Option<String>,
    pub date: String,
    pub weekday: &'static str,
    pub temperature: i64,
    pub high: i64,
    pub low: i64,
    pub condition: WeatherDesc,
    pub wind_speed: f64,
    pub wind_compass: &'static str,
    /// Arrow rotation in degrees
    pub wind_direction: f64,
    pub uv_index: String,
    pub uv_status: Status,
    pub sunrise: String,
    pub sunset: String,
    pub aqi: f64,
    pub aqi_status: Status,
    pub humidity: String,
    pub visibility: String,
    pub hourly: Vec<HourlyEntry>,
}

impl DashboardView {
    /// Build the view from raw payloads.
    ///
    /// `fallback_zone` is used for the date when the forecast carries no
    /// parsable time zone.
    pub fn build(
        forecast: &ForecastResponse,
        air: &AirQualityResponse,
        location: &str,
        now: DateTime<Utc>,
        fallback_zone: ClockZone,
        hourly_hours: usize,
    ) -> Result<Self, WeatherError> {
        let current = &forecast.current_weather;
        let daily = &forecast.daily;
        let hourly = &forecast.hourly;

        let zone = forecast
            .timezone
            .as_deref()
            .map(ClockZone::parse)
            .unwrap_or(fallback_zone);
        let today = zone.date_at(now);

        let hour_idx = current_hour_index(&hourly.time, &current.time);

        let uv_now = value_at(&hourly.uv_index, hour_idx, "hourly.uv_index")?;
        let humidity = value_at(&hourly.relativehumidity_2m, hour_idx, "hourly.relativehumidity_2m")?;
        let visibility = value_at(&hourly.visibility, hour_idx, "hourly.visibility")?;

        let high = value_at(&daily.temperature_2m_max, 0, "daily.temperature_2m_max")?;
        let low = value_at(&daily.temperature_2m_min, 0, "daily.temperature_2m_min")?;
        let sunrise = daily
            .sunrise
            .first()
            .ok_or_else(|| WeatherError::missing("daily.sunrise[0]"))?;
        let sunset = daily
            .sunset
            .first()
            .ok_or_else(|| WeatherError::missing("daily.sunset[0]"))?;

        let aqi = air
            .current
            .us_aqi
            .ok_or_else(|| WeatherError::missing("current.us_aqi"))?;

        Ok(Self {
            location: location.to_string(),
            timezone: forecast.timezone.clone(),
            timezone_label: forecast.timezone.as_deref().map(timezone_label),
            date: format_long_date(today),
            weekday: weekday_name(today),
            temperature: round_half_up(current.temperature),
            high: round_half_up(high),
            low: round_half_up(low),
            condition: weather_desc(current.weathercode),
            wind_speed: current.windspeed,
            wind_compass: deg_to_compass(current.winddirection),
            wind_direction: current.winddirection,
            uv_index: format!("{:.1}", uv_now),
            uv_status: uv_status(uv_now),
            sunrise: clock_time(sunrise)?,
            sunset: clock_time(sunset)?,
            aqi,
            aqi_status: aqi_status(aqi),
            humidity: format!("{}%", humidity),
            visibility: format!("{:.1} km", visibility / 1000.0),
            hourly: hourly_strip(hourly, hour_idx, hourly_hours),
        })
    }
}

/// Index of the hourly slot holding `current_time`, or 0 if none does.
///
/// Exact matches win; otherwise a reading taken mid-hour (e.g. "T09:15")
/// matches its top-of-hour slot.
pub fn current_hour_index(times: &[String], current_time: &str) -> usize {
    if let Some(idx) = times.iter().position(|t| t == current_time) {
        return idx;
    }

    match NaiveDateTime::parse_from_str(current_time, LOCAL_TIME_FMT) {
        Ok(parsed) => {
            let slot = parsed.format("%Y-%m-%dT%H:00").to_string();
            times.iter().position(|t| *t == slot).unwrap_or(0)
        }
        Err(_) => 0,
    }
}

fn value_at<T: Copy>(series: &[Option<T>], idx: usize, field: &str) -> Result<T, WeatherError> {
    series
        .get(idx)
        .copied()
        .flatten()
        .ok_or_else(|| WeatherError::missing(format!("{}[{}]", field, idx)))
}

/// `HH:MM` part of an Open-Meteo local timestamp.
fn clock_time(stamp: &str) -> Result<String, WeatherError> {
    NaiveDateTime::parse_from_str(stamp, LOCAL_TIME_FMT)
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|e| WeatherError::Parse(format!("{}: {}", stamp, e)))
}

fn hourly_strip(hourly: &HourlyBlock, start: usize, hours: usize) -> Vec<HourlyEntry> {
    hourly
        .time
        .iter()
        .enumerate()
        .skip(start)
        .take(hours)
        .map(|(i, stamp)| {
            let time = clock_time(stamp).unwrap_or_else(|_| stamp.clone());
            let code = hourly.weathercode.get(i).copied().flatten().unwrap_or(-1);
            HourlyEntry {
                time,
                temperature: hourly
                    .temperature_2m
                    .get(i)
                    .copied()
                    .flatten()
                    .map(round_half_up),
                icon: weather_desc(code).icon,
                is_now: i == start,
            }
        })
        .collect()
}

/// Fetch weather and air quality concurrently and build the view.
/// Either request failing aborts the whole load.
pub async fn load_all(
    provider: &WeatherProvider,
    latitude: f64,
    longitude: f64,
    location: &str,
    fallback_zone: ClockZone,
    hourly_hours: usize,
) -> Result<DashboardView, WeatherError> {
    let (forecast, air) = tokio::try_join!(
        provider.forecast(latitude, longitude),
        provider.air_quality(latitude, longitude)
    )?;

    DashboardView::build(
        &forecast,
        &air,
        location,
        Utc::now(),
        fallback_zone,
        hourly_hours,
    )
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::{json, Value};

    /// 30 hourly slots starting at midnight, local time.
    pub fn forecast_json() -> Value {
        let times: Vec<String> = (0..30)
            .map(|h| {
                let day = 14 + h / 24;
                format!("2026-10-{:02}T{:02}:00", day, h % 24)
            })
            .collect();
        let temps: Vec<f64> = (0..30).map(|h| 24.0 + h as f64 * 0.5).collect();
        let codes: Vec<i32> = (0..30).map(|h| if h == 9 { 95 } else { 2 }).collect();
        let uv: Vec<f64> = (0..30).map(|h| if h == 9 { 6.0 } else { 0.0 }).collect();
        let humidity: Vec<i32> = (0..30).map(|_| 78).collect();
        let visibility: Vec<f64> = (0..30).map(|_| 24140.0).collect();

        json!({
            "latitude": -6.2,
            "longitude": 106.8,
            "timezone": "Asia/Jakarta",
            "current_weather": {
                "time": "2026-10-14T09:00",
                "temperature": 30.5,
                "windspeed": 12.3,
                "winddirection": 45.0,
                "weathercode": 95
            },
            "hourly": {
                "time": times,
                "temperature_2m": temps,
                "weathercode": codes,
                "uv_index": uv,
                "relativehumidity_2m": humidity,
                "visibility": visibility
            },
            "daily": {
                "time": ["2026-10-14"],
                "temperature_2m_max": [33.4],
                "temperature_2m_min": [24.6],
                "sunrise": ["2026-10-14T05:32"],
                "sunset": ["2026-10-14T17:51"]
            }
        })
    }

    pub fn air_json(aqi: f64) -> Value {
        json!({ "current": { "time": "2026-10-14T09:00", "us_aqi": aqi } })
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{air_json, forecast_json};
    use super::*;
    use chrono::TimeZone;

    fn build(forecast: serde_json::Value, air: serde_json::Value) -> Result<DashboardView, WeatherError> {
        let forecast: ForecastResponse = serde_json::from_value(forecast).unwrap();
        let air: AirQualityResponse = serde_json::from_value(air).unwrap();
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 2, 0, 0).unwrap();
        DashboardView::build(&forecast, &air, "Jakarta, ID", now, ClockZone::Local, 24)
    }

    #[test]
    fn test_build_maps_current_conditions() {
        let view = build(forecast_json(), air_json(75.0)).unwrap();

        assert_eq!(view.location, "Jakarta, ID");
        assert_eq!(view.temperature, 31);
        assert_eq!(view.high, 33);
        assert_eq!(view.low, 25);
        assert_eq!(view.condition.label, "Badai Petir");
        assert_eq!(view.wind_compass, "TL");
        assert_eq!(view.uv_index, "6.0");
        assert_eq!(view.uv_status.label, "High");
        assert_eq!(view.aqi_status.label, "Sedang");
        assert_eq!(view.humidity, "78%");
        assert_eq!(view.visibility, "24.1 km");
        assert_eq!(view.sunrise, "05:32");
        assert_eq!(view.sunset, "17:51");
        assert_eq!(view.timezone_label.as_deref(), Some("JAKARTA"));
        assert_eq!(view.date, "14 Oktober 2026");
        assert_eq!(view.weekday, "Rabu");
    }

    #[test]
    fn test_hourly_strip_starts_at_current_hour() {
        let view = build(forecast_json(), air_json(10.0)).unwrap();

        // 30 slots, starting at index 9, leaves 21
        assert_eq!(view.hourly.len(), 21);
        assert_eq!(view.hourly[0].time, "09:00");
        assert!(view.hourly[0].is_now);
        assert_eq!(view.hourly[0].icon, "zap");
        assert!(view.hourly.iter().skip(1).all(|h| !h.is_now));
        assert_eq!(view.hourly[1].icon, "cloud");
    }

    #[test]
    fn test_hourly_strip_is_capped() {
        let forecast: ForecastResponse = serde_json::from_value(forecast_json()).unwrap();
        let air: AirQualityResponse = serde_json::from_value(air_json(10.0)).unwrap();
        let view =
            DashboardView::build(&forecast, &air, "x", Utc::now(), ClockZone::Local, 4).unwrap();
        assert_eq!(view.hourly.len(), 4);
    }

    #[test]
    fn test_current_hour_index() {
        let times: Vec<String> = ["2026-10-14T08:00", "2026-10-14T09:00"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(current_hour_index(&times, "2026-10-14T09:00"), 1);
        assert_eq!(current_hour_index(&times, "2026-10-14T09:45"), 1);
        assert_eq!(current_hour_index(&times, "2026-10-15T01:00"), 0);
        assert_eq!(current_hour_index(&times, "garbage"), 0);
    }

    #[test]
    fn test_missing_aqi_fails_build() {
        let err = build(forecast_json(), serde_json::json!({ "current": {} })).unwrap_err();
        assert!(matches!(err, WeatherError::MissingField(ref f) if f == "current.us_aqi"));
    }

    #[test]
    fn test_null_uv_fails_build() {
        let mut forecast = forecast_json();
        forecast["hourly"]["uv_index"][9] = serde_json::Value::Null;
        let err = build(forecast, air_json(10.0)).unwrap_err();
        assert!(err.to_string().contains("uv_index[9]"));
    }
}
