//! Single owner of dashboard state. Everything that changes what is on screen
//! arrives as an [`Action`]; rendering reads [`DashboardState`] only.

use std::sync::Arc;

use crate::clock::ClockZone;
use crate::dashboard::DashboardView;
use crate::search::{Suggestion, SuggestionState};
use crate::types::WeatherError;

#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded(Box<DashboardView>),
    /// The submitted query did not resolve to a city
    SearchFailed(Arc<WeatherError>),
    /// Weather or air-quality fetch failed
    Failed(Arc<WeatherError>),
}

impl LoadOutcome {
    pub fn error(&self) -> Option<&WeatherError> {
        match self {
            Self::Loaded(_) => None,
            Self::SearchFailed(e) | Self::Failed(e) => Some(e),
        }
    }
}

// Client errors are not comparable; two failures are equal when they report the same thing.
impl PartialEq for LoadOutcome {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Loaded(a), Self::Loaded(b)) => a == b,
            (Self::SearchFailed(a), Self::SearchFailed(b)) | (Self::Failed(a), Self::Failed(b)) => {
                Arc::ptr_eq(a, b) || a.to_string() == b.to_string()
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    InputChanged(String),
    SuggestionsUpdated {
        generation: u64,
        state: SuggestionState,
    },
    /// Click outside the search box
    DismissSuggestions,
    SuggestionChosen(Suggestion),
    LoadStarted {
        generation: u64,
        from_search: bool,
    },
    LoadFinished {
        generation: u64,
        outcome: LoadOutcome,
    },
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub input: String,
    pub loading: bool,
    pub error_visible: bool,
    pub suggestions: SuggestionState,
    pub view: Option<DashboardView>,
    pub clock_zone: ClockZone,
    suggestion_generation: u64,
    load_generation: u64,
}

impl DashboardState {
    pub fn new(clock_zone: ClockZone) -> Self {
        Self {
            input: String::new(),
            loading: false,
            error_visible: false,
            suggestions: SuggestionState::Hidden,
            view: None,
            clock_zone,
            suggestion_generation: 0,
            load_generation: 0,
        }
    }

    pub fn load_generation(&self) -> u64 {
        self.load_generation
    }
}

#[derive(Debug, Clone)]
pub struct DashboardStore {
    state: DashboardState,
}

impl DashboardStore {
    pub fn new(clock_zone: ClockZone) -> Self {
        Self {
            state: DashboardState::new(clock_zone),
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Apply an action. Returns false when it was stale and ignored.
    pub fn apply(&mut self, action: Action) -> bool {
        let state = &mut self.state;
        match action {
            Action::InputChanged(text) => {
                state.input = text;
            }
            Action::SuggestionsUpdated { generation, state: next } => {
                if generation < state.suggestion_generation {
                    tracing::debug!(generation, "Dropping stale suggestions");
                    return false;
                }
                state.suggestion_generation = generation;
                state.suggestions = next;
            }
            Action::DismissSuggestions => {
                state.suggestions = SuggestionState::Hidden;
            }
            Action::SuggestionChosen(suggestion) => {
                state.input = suggestion.city.name.clone();
                state.suggestions = SuggestionState::Hidden;
            }
            Action::LoadStarted {
                generation,
                from_search,
            } => {
                if generation <= state.load_generation {
                    return false;
                }
                state.load_generation = generation;
                state.loading = true;
                if from_search {
                    state.error_visible = false;
                    state.suggestions = SuggestionState::Hidden;
                }
            }
            Action::LoadFinished {
                generation,
                outcome,
            } => {
                if generation != state.load_generation {
                    tracing::debug!(
                        generation,
                        latest = state.load_generation,
                        "Dropping superseded dashboard load"
                    );
                    return false;
                }
                state.loading = false;
                match outcome {
                    LoadOutcome::Loaded(view) => {
                        if let Some(tz) = view.timezone.as_deref() {
                            state.clock_zone = ClockZone::parse(tz);
                        }
                        state.view = Some(*view);
                    }
                    LoadOutcome::SearchFailed(_) => {
                        state.error_visible = true;
                    }
                    LoadOutcome::Failed(_) => {}
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::fixtures::{air_json, forecast_json};
    use crate::types::{AirQualityResponse, City, ForecastResponse};
    use chrono::Utc;

    fn view(label: &str) -> DashboardView {
        let forecast: ForecastResponse = serde_json::from_value(forecast_json()).unwrap();
        let air: AirQualityResponse = serde_json::from_value(air_json(42.0)).unwrap();
        DashboardView::build(&forecast, &air, label, Utc::now(), ClockZone::Local, 24).unwrap()
    }

    #[test]
    fn test_superseded_load_is_discarded() {
        let mut store = DashboardStore::new(ClockZone::Local);
        store.apply(Action::LoadStarted { generation: 1, from_search: false });
        store.apply(Action::LoadStarted { generation: 2, from_search: false });

        let applied = store.apply(Action::LoadFinished {
            generation: 1,
            outcome: LoadOutcome::Loaded(Box::new(view("Old"))),
        });
        assert!(!applied);
        assert!(store.state().view.is_none());
        assert!(store.state().loading);

        store.apply(Action::LoadFinished {
            generation: 2,
            outcome: LoadOutcome::Loaded(Box::new(view("New"))),
        });
        assert_eq!(store.state().view.as_ref().map(|v| v.location.as_str()), Some("New"));
        assert!(!store.state().loading);
        assert_eq!(
            store.state().clock_zone,
            ClockZone::Named(chrono_tz::Asia::Jakarta)
        );
    }

    #[test]
    fn test_search_failure_shows_banner() {
        let mut store = DashboardStore::new(ClockZone::Local);
        store.apply(Action::LoadStarted { generation: 1, from_search: true });
        store.apply(Action::LoadFinished {
            generation: 1,
            outcome: LoadOutcome::SearchFailed(Arc::new(WeatherError::LocationNotFound(
                "nope".into(),
            ))),
        });
        assert!(store.state().error_visible);
        assert!(!store.state().loading);

        // next submit hides it again
        store.apply(Action::LoadStarted { generation: 2, from_search: true });
        assert!(!store.state().error_visible);
    }

    #[test]
    fn test_load_failure_keeps_previous_view() {
        let mut store = DashboardStore::new(ClockZone::Local);
        store.apply(Action::LoadStarted { generation: 1, from_search: false });
        store.apply(Action::LoadFinished {
            generation: 1,
            outcome: LoadOutcome::Loaded(Box::new(view("Jakarta, ID"))),
        });
        store.apply(Action::LoadStarted { generation: 2, from_search: false });
        store.apply(Action::LoadFinished {
            generation: 2,
            outcome: LoadOutcome::Failed(Arc::new(WeatherError::Parse("timeout".into()))),
        });

        assert!(!store.state().loading);
        assert!(!store.state().error_visible);
        assert!(store.state().view.is_some());
    }

    #[test]
    fn test_stale_suggestions_dropped() {
        let mut store = DashboardStore::new(ClockZone::Local);
        store.apply(Action::SuggestionsUpdated {
            generation: 3,
            state: SuggestionState::Loading,
        });
        let applied = store.apply(Action::SuggestionsUpdated {
            generation: 2,
            state: SuggestionState::NotFound,
        });
        assert!(!applied);
        assert_eq!(store.state().suggestions, SuggestionState::Loading);
    }

    #[test]
    fn test_choosing_suggestion_fills_input() {
        let mut store = DashboardStore::new(ClockZone::Local);
        let city = City {
            name: "Surabaya".into(),
            latitude: -7.25,
            longitude: 112.75,
            country: Some("Indonesia".into()),
            country_code: Some("ID".into()),
            admin1: None,
        };
        store.apply(Action::SuggestionsUpdated {
            generation: 1,
            state: SuggestionState::Results(vec![city.clone().into()]),
        });
        store.apply(Action::SuggestionChosen(city.into()));
        assert_eq!(store.state().input, "Surabaya");
        assert_eq!(store.state().suggestions, SuggestionState::Hidden);
    }

    #[test]
    fn test_dismiss_hides_suggestions_and_keeps_input() {
        let mut store = DashboardStore::new(ClockZone::Local);
        store.apply(Action::InputChanged("Sura".into()));
        store.apply(Action::SuggestionsUpdated {
            generation: 1,
            state: SuggestionState::NotFound,
        });

        assert!(store.apply(Action::DismissSuggestions));
        assert_eq!(store.state().suggestions, SuggestionState::Hidden);
        assert_eq!(store.state().input, "Sura");

        // a later result for the same generation shows up again
        store.apply(Action::SuggestionsUpdated {
            generation: 1,
            state: SuggestionState::Loading,
        });
        assert_eq!(store.state().suggestions, SuggestionState::Loading);
    }

    #[test]
    fn test_failure_outcome_keeps_client_error() {
        let outcome =
            LoadOutcome::SearchFailed(Arc::new(WeatherError::LocationNotFound("Atlantis".into())));
        assert!(outcome.error().is_some_and(WeatherError::is_not_found));

        let same =
            LoadOutcome::SearchFailed(Arc::new(WeatherError::LocationNotFound("Atlantis".into())));
        let other = LoadOutcome::Failed(Arc::new(WeatherError::LocationNotFound("Atlantis".into())));
        assert_eq!(outcome, same);
        assert_ne!(outcome, other);
    }
}
