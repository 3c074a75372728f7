//! Forward geocoding: city name to coordinates via the Open-Meteo search API.

use crate::provider::WeatherProvider;
use crate::types::{City, GeocodingResponse, WeatherError};
use tracing::instrument;

impl WeatherProvider {
    /// Search cities by name. An absent `results` field means no match and
    /// yields an empty list.
    #[instrument(skip(self), level = "info")]
    pub async fn search_cities(
        &self,
        name: &str,
        count: u8,
        language: &str,
    ) -> Result<Vec<City>, WeatherError> {
        let query = [
            ("name", name.to_string()),
            ("count", count.to_string()),
            ("language", language.to_string()),
            ("format", "json".to_string()),
        ];
        let body: GeocodingResponse = self.get_json(&self.endpoints.geocoding, &query).await?;
        let cities = body.results.unwrap_or_default();
        tracing::debug!("Geocoder returned {} result(s) for {:?}", cities.len(), name);
        Ok(cities)
    }

    /// Resolve a submitted query to its best match.
    pub async fn find_city(&self, name: &str, language: &str) -> Result<City, WeatherError> {
        self.search_cities(name, 1, language)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::LocationNotFound(name.to_string()))
    }
}
