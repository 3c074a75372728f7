//! Weather dashboard for orbweather
//!
//! Open-Meteo geocoding, forecast and air-quality client, plus the view
//! model, debounced autocomplete and state store that drive the dashboard.

pub mod classify;
pub mod clock;
pub mod dashboard;
pub mod geocode;
pub mod loader;
pub mod provider;
pub mod render;
pub mod search;
pub mod store;
pub mod types;

pub use classify::{aqi_status, uv_status, weather_desc, Status, Tone, WeatherDesc};
pub use clock::ClockZone;
pub use dashboard::{load_all, DashboardView, HourlyEntry};
pub use loader::{DashboardLoader, LoaderSettings};
pub use provider::{Endpoints, WeatherProvider};
pub use search::{
    Autocomplete, AutocompleteSettings, CitySearch, GeocoderSearch, Suggestion, SuggestionState,
};
pub use store::{Action, DashboardState, DashboardStore, LoadOutcome};
pub use types::*;
