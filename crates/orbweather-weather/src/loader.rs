//! Dashboard loads, tagged with a generation so the store can discard
//! responses that were overtaken by a newer request.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::clock::ClockZone;
use crate::dashboard::load_all;
use crate::provider::WeatherProvider;
use crate::store::{Action, LoadOutcome};
use crate::types::City;

#[derive(Debug, Clone)]
pub struct LoaderSettings {
    pub language: String,
    pub hourly_hours: usize,
    pub fallback_zone: ClockZone,
}

pub struct DashboardLoader {
    provider: Arc<WeatherProvider>,
    settings: LoaderSettings,
    tx: UnboundedSender<Action>,
    generation: u64,
}

impl DashboardLoader {
    pub fn new(
        provider: Arc<WeatherProvider>,
        settings: LoaderSettings,
        tx: UnboundedSender<Action>,
    ) -> Self {
        Self {
            provider,
            settings,
            tx,
            generation: 0,
        }
    }

    fn next_generation(&mut self, from_search: bool) -> u64 {
        self.generation += 1;
        let _ = self.tx.send(Action::LoadStarted {
            generation: self.generation,
            from_search,
        });
        self.generation
    }

    /// Load the dashboard for a picked suggestion.
    pub fn load_city(&mut self, city: &City) -> u64 {
        self.load(city.latitude, city.longitude, city.display_label())
    }

    /// Load weather and air quality for a coordinate pair.
    pub fn load(&mut self, latitude: f64, longitude: f64, label: String) -> u64 {
        let generation = self.next_generation(false);
        let provider = self.provider.clone();
        let tx = self.tx.clone();
        let settings = self.settings.clone();

        tokio::spawn(async move {
            let outcome = fetch_view(&provider, &settings, latitude, longitude, &label).await;
            let _ = tx.send(Action::LoadFinished {
                generation,
                outcome,
            });
        });

        generation
    }

    /// Resolve a submitted query to one city, then load it.
    ///
    /// A failed lookup shows the error banner; a failed weather load after a
    /// successful lookup only clears the loading state.
    pub fn search(&mut self, query: &str) -> u64 {
        let generation = self.next_generation(true);
        let provider = self.provider.clone();
        let tx = self.tx.clone();
        let settings = self.settings.clone();
        let query = query.trim().to_string();

        tokio::spawn(async move {
            let outcome = match provider.find_city(&query, &settings.language).await {
                Ok(city) => {
                    tracing::info!("Resolved {:?} to {}", query, city.display_label());
                    fetch_view(
                        &provider,
                        &settings,
                        city.latitude,
                        city.longitude,
                        &city.display_label(),
                    )
                    .await
                }
                Err(e) => {
                    tracing::warn!("City lookup for {:?} failed: {}", query, e);
                    LoadOutcome::SearchFailed(Arc::new(e))
                }
            };
            let _ = tx.send(Action::LoadFinished {
                generation,
                outcome,
            });
        });

        generation
    }
}

async fn fetch_view(
    provider: &WeatherProvider,
    settings: &LoaderSettings,
    latitude: f64,
    longitude: f64,
    label: &str,
) -> LoadOutcome {
    match load_all(
        provider,
        latitude,
        longitude,
        label,
        settings.fallback_zone,
        settings.hourly_hours,
    )
    .await
    {
        Ok(view) => LoadOutcome::Loaded(Box::new(view)),
        Err(e) => {
            tracing::error!("Dashboard load for {} failed: {}", label, e);
            LoadOutcome::Failed(Arc::new(e))
        }
    }
}
