//! Centralized error types for orbweather.
//!
//! Crate-level errors (weather client, orb driver) are mapped into `AppError`
//! at the binary edge. Use `user_message()` for anything shown on screen; the
//! `Display` output keeps the full context for logs.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Renderer error: {0}")]
    Render(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a short message suitable for the dashboard banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Render(_) => "The animation could not be drawn.",
            AppError::Io(_) => "Reading or writing the terminal failed.",
            AppError::Other(_) => "Something went wrong.",
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection to weather service failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("HTTP {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Unreadable response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Could not reach the weather service. Check the connection."
            }
            NetworkError::Timeout => "The weather service took too long to answer.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather service is having trouble right now."
            }
            NetworkError::ServerError { .. } => "The weather service rejected the request.",
            NetworkError::InvalidResponse(_) => {
                "The weather service sent a response that could not be read."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No configuration at {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not parse configuration: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "No configuration file; built-in defaults are in use.",
            ConfigError::Invalid(_) => "The configuration has invalid values.",
            ConfigError::ParseError(_) => "The configuration file is not valid TOML.",
        }
    }
}

/// Weather dashboard errors as seen by the user.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Weather API error: {0}")]
    ApiError(String),

    #[error("Unexpected weather payload: {0}")]
    InvalidPayload(String),

    #[error("Service unavailable")]
    ServiceUnavailable,
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::LocationNotFound(_) => "Kota tidak ditemukan.",
            WeatherError::ApiError(_) => "Weather service error. Please try again.",
            WeatherError::InvalidPayload(_) => {
                "Weather data came back in an unexpected shape. Please try again."
            }
            WeatherError::ServiceUnavailable => {
                "Weather service unavailable. Please try again later."
            }
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn to_network_error(&self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn to_network_error(&self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
