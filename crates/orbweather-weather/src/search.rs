//! Debounced city autocomplete.
//!
//! Every keystroke re-arms a single timer. Only the query that survives the
//! quiet period reaches the geocoder, and re-arming cancels whatever the
//! previous search was doing (waiting or in flight).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::classify::flag_emoji;
use crate::provider::WeatherProvider;
use crate::store::Action;
use crate::types::{City, WeatherError};

/// Anything that can turn a query into candidate cities.
pub trait CitySearch: Send + Sync + 'static {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<City>, WeatherError>> + Send;
}

/// Geocoder-backed suggestions.
#[derive(Debug, Clone)]
pub struct GeocoderSearch {
    provider: Arc<WeatherProvider>,
    count: u8,
    language: String,
}

impl GeocoderSearch {
    pub fn new(provider: Arc<WeatherProvider>, count: u8, language: impl Into<String>) -> Self {
        Self {
            provider,
            count,
            language: language.into(),
        }
    }
}

impl CitySearch for GeocoderSearch {
    fn search(&self, query: &str) -> impl Future<Output = Result<Vec<City>, WeatherError>> + Send {
        async move {
            self.provider
                .search_cities(query, self.count, &self.language)
                .await
        }
    }
}

/// One row of the suggestion list.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub city: City,
    pub flag: String,
    /// "Indonesia, Jawa Barat"
    pub subtitle: String,
}

impl From<City> for Suggestion {
    fn from(city: City) -> Self {
        let flag = flag_emoji(city.country_code.as_deref());
        let country = city.country.clone().unwrap_or_default();
        let subtitle = match city.admin1.as_deref() {
            Some(admin) if !admin.is_empty() => format!("{}, {}", country, admin),
            _ => country,
        };
        Self {
            city,
            flag,
            subtitle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SuggestionState {
    #[default]
    Hidden,
    Loading,
    Results(Vec<Suggestion>),
    NotFound,
}

/// Debounce settings.
#[derive(Debug, Clone, Copy)]
pub struct AutocompleteSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
    pub max_results: usize,
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_len: 3,
            max_results: 5,
        }
    }
}

pub struct Autocomplete<S: CitySearch> {
    source: Arc<S>,
    settings: AutocompleteSettings,
    tx: UnboundedSender<Action>,
    generation: u64,
    pending: Option<CancellationToken>,
}

impl<S: CitySearch> Autocomplete<S> {
    pub fn new(source: Arc<S>, settings: AutocompleteSettings, tx: UnboundedSender<Action>) -> Self {
        Self {
            source,
            settings,
            tx,
            generation: 0,
            pending: None,
        }
    }

    /// Handle a change of the search box text. Must be called from within a
    /// tokio runtime.
    ///
    /// Returns the generation assigned to this input.
    pub fn input(&mut self, text: &str) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;

        let query = text.trim().to_string();
        if query.chars().count() < self.settings.min_query_len {
            self.emit(generation, SuggestionState::Hidden);
            return generation;
        }

        self.emit(generation, SuggestionState::Loading);

        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let source = self.source.clone();
        let tx = self.tx.clone();
        let settings = self.settings;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(settings.debounce) => {}
            }

            let result = tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Search for {:?} superseded while in flight", query);
                    return;
                }
                result = source.search(&query) => result,
            };

            let state = match result {
                Ok(cities) if !cities.is_empty() => SuggestionState::Results(
                    cities
                        .into_iter()
                        .take(settings.max_results)
                        .map(Suggestion::from)
                        .collect(),
                ),
                Ok(_) => SuggestionState::NotFound,
                Err(e) => {
                    tracing::error!("Suggestion search failed: {}", e);
                    SuggestionState::NotFound
                }
            };

            let _ = tx.send(Action::SuggestionsUpdated { generation, state });
        });

        generation
    }

    /// Drop any pending search without touching the displayed state.
    pub fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    fn emit(&self, generation: u64, state: SuggestionState) {
        let _ = self.tx.send(Action::SuggestionsUpdated { generation, state });
    }
}

impl<S: CitySearch> Drop for Autocomplete<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}
