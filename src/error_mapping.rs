//! Crate errors to `AppError`.

use orbweather_core::error::{AppError, NetworkError, ReqwestErrorExt, WeatherError};
use orbweather_orb::SinkError;

/// Conversion into the application-wide error type.
pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}

impl IntoAppError for &orbweather_weather::WeatherError {
    fn into_app_error(self) -> AppError {
        use orbweather_weather::WeatherError as Client;

        match self {
            Client::Network(e) => AppError::Network(e.to_network_error()),
            Client::Status { status, url } => AppError::Network(NetworkError::ServerError {
                status: *status,
                message: url.clone(),
            }),
            Client::Parse(msg) => AppError::Weather(WeatherError::InvalidPayload(msg.clone())),
            Client::MissingField(field) => {
                AppError::Weather(WeatherError::InvalidPayload(format!("missing field {}", field)))
            }
            Client::LocationNotFound(query) => {
                AppError::Weather(WeatherError::LocationNotFound(query.clone()))
            }
        }
    }
}

impl IntoAppError for orbweather_weather::WeatherError {
    fn into_app_error(self) -> AppError {
        (&self).into_app_error()
    }
}

impl IntoAppError for SinkError {
    fn into_app_error(self) -> AppError {
        match self {
            SinkError::Io(e) => AppError::Io(e),
            other => AppError::Render(other.to_string()),
        }
    }
}
