use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Open-Meteo endpoints
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// Autocomplete behaviour
    #[serde(default)]
    pub search: SearchConfig,

    /// Dashboard loading and display
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// Orb animation parameters
    #[serde(default)]
    pub orb: OrbConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
    pub air_quality_url: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            geocoding_url: "https://geocoding-api.open-meteo.com/v1/search".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            air_quality_url: "https://air-quality-api.open-meteo.com/v1/air-quality".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Quiet period before a suggestion query is sent
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Queries shorter than this (after trimming) never hit the network
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Number of suggestions requested from the geocoder
    #[serde(default = "default_suggestion_count")]
    pub suggestion_count: u8,

    /// Language passed to the geocoder
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_len() -> usize {
    3
}

fn default_suggestion_count() -> u8 {
    5
}

fn default_language() -> String {
    "id".to_string()
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_len: default_min_query_len(),
            suggestion_count: default_suggestion_count(),
            language: default_language(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// City loaded on startup
    pub default_city: String,

    /// Clock zone used until a forecast reports its own
    pub default_timezone: String,

    /// Length of the hourly strip
    pub hourly_hours: usize,

    /// Client-level HTTP timeout
    pub request_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_city: "Jakarta".to_string(),
            default_timezone: "Asia/Jakarta".to_string(),
            hourly_hours: 24,
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbConfig {
    /// Hue rotation in degrees
    pub hue: f32,
    pub hover_intensity: f32,
    /// Fraction of the remaining distance covered per frame
    pub smoothing: f32,
    /// Radians per second
    pub rotation_speed: f32,
    /// Fraction of the half-diagonal at which hover reaches zero
    pub hover_falloff: f32,
    pub fps: u32,
    /// Use a wall-clock time constant instead of per-frame smoothing
    pub time_normalized: bool,
}

impl Default for OrbConfig {
    fn default() -> Self {
        Self {
            hue: 0.0,
            hover_intensity: 0.4,
            smoothing: 0.05,
            rotation_speed: 0.1,
            hover_falloff: 0.8,
            fps: 60,
            time_normalized: false,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults; nothing is written back.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; validation errors fail the load.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = Self::load(path)?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.endpoints.geocoding_url,
            "endpoints.geocoding_url",
            &mut result,
        );
        self.validate_url(
            &self.endpoints.forecast_url,
            "endpoints.forecast_url",
            &mut result,
        );
        self.validate_url(
            &self.endpoints.air_quality_url,
            "endpoints.air_quality_url",
            &mut result,
        );

        if self.search.min_query_len == 0 {
            result.add_warning(
                "search.min_query_len",
                "Every keystroke will trigger a search",
            );
        }
        if self.search.suggestion_count == 0 {
            result.add_error("search.suggestion_count", "Must request at least one suggestion");
        }
        if self.search.debounce_ms > 5000 {
            result.add_warning("search.debounce_ms", "Debounce is longer than 5 seconds");
        }

        if self.dashboard.default_city.trim().is_empty() {
            result.add_error("dashboard.default_city", "Default city cannot be empty");
        }
        if self.dashboard.hourly_hours == 0 {
            result.add_warning("dashboard.hourly_hours", "Hourly strip disabled (0 hours)");
        }
        if self.dashboard.request_timeout_secs == 0 {
            result.add_error(
                "dashboard.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if !(0.0..=1.0).contains(&self.orb.smoothing) || self.orb.smoothing == 0.0 {
            result.add_error("orb.smoothing", "Smoothing must be in (0, 1]");
        }
        if self.orb.hover_falloff <= 0.0 {
            result.add_error("orb.hover_falloff", "Falloff must be greater than 0");
        }
        if self.orb.rotation_speed < 0.0 {
            result.add_error("orb.rotation_speed", "Rotation speed cannot be negative");
        }
        if self.orb.fps == 0 {
            result.add_error("orb.fps", "Frame rate must be greater than 0");
        } else if self.orb.fps > 240 {
            result.add_warning("orb.fps", "Frame rate is unusually high (>240)");
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("orbweather");

        Ok(config_dir.join("config.toml"))
    }
}
