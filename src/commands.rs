use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use orbweather_core::error::{AppError, WeatherError};
use orbweather_core::{Config, OrbConfig, SearchConfig};
use orbweather_orb::{AsciiSink, FrameDriver, OrbEvent, OrbSettings, Surface};
use orbweather_weather::render::{render, render_suggestions};
use orbweather_weather::{
    Action, Autocomplete, AutocompleteSettings, ClockZone, DashboardLoader, DashboardState,
    DashboardStore, Endpoints, GeocoderSearch, LoadOutcome, LoaderSettings, SuggestionState,
    WeatherProvider,
};

use crate::cli::OrbArgs;
use crate::error_mapping::IntoAppError;

pub fn build_provider(config: &Config) -> Result<Arc<WeatherProvider>, AppError> {
    let endpoints = Endpoints {
        geocoding: config.endpoints.geocoding_url.clone(),
        forecast: config.endpoints.forecast_url.clone(),
        air_quality: config.endpoints.air_quality_url.clone(),
    };
    let timeout = Duration::from_secs(config.dashboard.request_timeout_secs);
    let provider = WeatherProvider::new(endpoints, timeout).map_err(IntoAppError::into_app_error)?;
    Ok(Arc::new(provider))
}

pub fn autocomplete_settings(search: &SearchConfig) -> AutocompleteSettings {
    AutocompleteSettings {
        debounce: Duration::from_millis(search.debounce_ms),
        min_query_len: search.min_query_len,
        max_results: search.suggestion_count as usize,
    }
}

pub fn orb_settings(orb: &OrbConfig) -> OrbSettings {
    OrbSettings {
        hue: orb.hue,
        hover_intensity: orb.hover_intensity,
        smoothing: orb.smoothing,
        rotation_speed: orb.rotation_speed,
        hover_falloff: orb.hover_falloff,
        fps: orb.fps,
        time_normalized: orb.time_normalized,
    }
}

fn loader_settings(config: &Config) -> LoaderSettings {
    LoaderSettings {
        language: config.search.language.clone(),
        hourly_hours: config.dashboard.hourly_hours,
        fallback_zone: ClockZone::parse(&config.dashboard.default_timezone),
    }
}

/// Cancelled on the first Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });
    cancel
}

/// Apply actions to `store` until the load tagged `generation` finishes.
async fn await_load(
    rx: &mut mpsc::UnboundedReceiver<Action>,
    store: &mut DashboardStore,
    generation: u64,
) -> Option<LoadOutcome> {
    while let Some(action) = rx.recv().await {
        let outcome = match &action {
            Action::LoadFinished {
                generation: finished,
                outcome,
            } if *finished == generation => Some(outcome.clone()),
            _ => None,
        };
        store.apply(action);
        if outcome.is_some() {
            return outcome;
        }
    }
    None
}

/// `Ok` for a loaded dashboard, the mapped client error otherwise.
fn load_result(outcome: Option<&LoadOutcome>) -> Result<(), AppError> {
    match outcome.map(LoadOutcome::error) {
        Some(None) => Ok(()),
        Some(Some(e)) => Err(e.into_app_error()),
        None => Err(AppError::Weather(WeatherError::ServiceUnavailable)),
    }
}

fn print_dashboard(store: &DashboardStore) {
    let state = store.state();
    let clock = state.clock_zone.format_time(Utc::now());
    print!("{}", render(state, &clock));
}

/// Resolve `city`, load its dashboard and print it. With `watch`, keep
/// redrawing every second until Ctrl-C.
pub async fn show(config: &Config, city: Option<String>, watch: bool) -> Result<(), AppError> {
    let provider = build_provider(config)?;
    let settings = loader_settings(config);
    let city = city.unwrap_or_else(|| config.dashboard.default_city.clone());

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut store = DashboardStore::new(settings.fallback_zone);
    let mut loader = DashboardLoader::new(provider, settings, tx);

    store.apply(Action::InputChanged(city.clone()));
    let generation = loader.search(&city);
    let outcome = await_load(&mut rx, &mut store, generation).await;

    if watch && store.state().view.is_some() {
        let mut stdout = std::io::stdout();
        let redraws = watch_dashboard(store.state(), &mut stdout, cancel_on_ctrl_c()).await?;
        tracing::info!(redraws, "Dashboard watch stopped");
    } else {
        print_dashboard(&store);
    }

    load_result(outcome.as_ref())
}

/// Redraw the dashboard once a second so the city clock ticks, until
/// `cancel` fires. Returns the number of redraws.
pub async fn watch_dashboard<W: Write>(
    state: &DashboardState,
    out: &mut W,
    cancel: CancellationToken,
) -> Result<u64, AppError> {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut redraws = 0u64;
    loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => break,

            _ = ticker.tick() => {
                let clock = state.clock_zone.format_time(Utc::now());
                out.write_all(b"\x1b[H\x1b[2J")?;
                out.write_all(render(state, &clock).as_bytes())?;
                out.flush()?;
                redraws += 1;
            }
        }
    }
    Ok(redraws)
}

/// Feed `query` through the debounced autocomplete and print what it settles
/// on. With `pick`, choose that suggestion and load its dashboard.
pub async fn search(config: &Config, query: &str, pick: Option<u32>) -> Result<(), AppError> {
    let provider = build_provider(config)?;
    let source = Arc::new(GeocoderSearch::new(
        provider.clone(),
        config.search.suggestion_count,
        config.search.language.clone(),
    ));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut autocomplete =
        Autocomplete::new(source, autocomplete_settings(&config.search), tx.clone());
    let settings = loader_settings(config);
    let mut store = DashboardStore::new(settings.fallback_zone);

    store.apply(Action::InputChanged(query.to_string()));
    let generation = autocomplete.input(query);

    while let Some(action) = rx.recv().await {
        let settled = matches!(
            &action,
            Action::SuggestionsUpdated { generation: g, state }
                if *g == generation && *state != SuggestionState::Loading
        );
        store.apply(action);
        if settled {
            break;
        }
    }

    let suggestions = &store.state().suggestions;
    if *suggestions == SuggestionState::Hidden {
        tracing::info!(
            min = config.search.min_query_len,
            "Query too short for suggestions"
        );
    }
    print!("{}", render_suggestions(suggestions));

    let Some(pick) = pick else {
        return Ok(());
    };

    let chosen = match suggestions {
        SuggestionState::Results(items) => pick
            .checked_sub(1)
            .and_then(|i| items.get(i as usize))
            .cloned(),
        _ => None,
    };
    let Some(chosen) = chosen else {
        return Err(AppError::Weather(WeatherError::LocationNotFound(format!(
            "{} (suggestion {})",
            query, pick
        ))));
    };

    tracing::info!("Loading suggestion {}: {}", pick, chosen.city.display_label());
    let mut loader = DashboardLoader::new(provider, settings, tx);
    let city = chosen.city.clone();
    store.apply(Action::SuggestionChosen(chosen));
    let generation = loader.load_city(&city);
    let outcome = await_load(&mut rx, &mut store, generation).await;

    println!();
    print_dashboard(&store);
    load_result(outcome.as_ref())
}

/// Run the frame driver with an ASCII preview until Ctrl-C or `--frames`.
pub async fn orb(config: &Config, args: OrbArgs) -> Result<(), AppError> {
    let settings = orb_settings(&config.orb);

    // virtual viewport in "pixels": one per column, two per row
    let width = args.width as f32;
    let height = args.height as f32 * 2.0;
    let surface = Surface::new(width, height, 1.0);

    let mut stdout = std::io::stdout();
    stdout.write_all(b"\x1b[2J")?;

    let sink = AsciiSink::new(args.width, args.height, stdout).every(args.every);
    let (mut driver, events) = FrameDriver::new(settings, surface, sink);
    if let Some(frames) = args.frames {
        driver = driver.with_frame_limit(frames);
    }

    if args.hover {
        events
            .send(OrbEvent::PointerMoved {
                x: width / 2.0,
                y: height / 2.0,
            })
            .await
            .map_err(|e| AppError::Render(e.to_string()))?;
    }

    let (report, _sink) = driver.run(cancel_on_ctrl_c()).await;
    tracing::info!(
        frames = report.frames,
        draws = report.draws,
        rotation = report.final_uniforms.rotation,
        "Orb preview finished"
    );

    if report.surface_lost {
        return Err(orbweather_orb::SinkError::SurfaceLost.into_app_error());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orb_settings_follow_config() {
        let config = OrbConfig {
            hue: 120.0,
            time_normalized: true,
            ..OrbConfig::default()
        };
        let settings = orb_settings(&config);
        assert_eq!(settings.hue, 120.0);
        assert!(settings.time_normalized);
        assert_eq!(settings.fps, 60);
    }

    #[test]
    fn test_autocomplete_settings_follow_config() {
        let settings = autocomplete_settings(&SearchConfig::default());
        assert_eq!(settings.debounce, Duration::from_millis(300));
        assert_eq!(settings.min_query_len, 3);
        assert_eq!(settings.max_results, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_redraws_once_a_second() {
        let state = DashboardState::new(ClockZone::Local);
        let mut out = Vec::new();
        let cancel = CancellationToken::new();
        let stop = cancel.clone();

        let (redraws, ()) = tokio::join!(watch_dashboard(&state, &mut out, cancel), async move {
            tokio::time::sleep(Duration::from_millis(3500)).await;
            stop.cancel();
        });

        // ticks at 0s, 1s, 2s and 3s
        assert_eq!(redraws.unwrap(), 4);
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("\x1b[H").count(), 4);
        assert_eq!(text.matches("JAKARTA").count(), 4);
    }

    #[test]
    fn test_load_result_maps_client_errors() {
        use orbweather_core::error::NetworkError;
        use orbweather_weather::WeatherError as ClientError;

        let not_found = load_result(Some(&LoadOutcome::SearchFailed(Arc::new(
            ClientError::LocationNotFound("Atlantis".into()),
        ))));
        assert!(matches!(
            not_found,
            Err(AppError::Weather(WeatherError::LocationNotFound(ref q))) if q == "Atlantis"
        ));

        let failed = load_result(Some(&LoadOutcome::Failed(Arc::new(ClientError::Status {
            status: 502,
            url: "http://localhost/v1/air-quality".into(),
        }))));
        assert!(matches!(
            failed,
            Err(AppError::Network(NetworkError::ServerError { status: 502, .. }))
        ));

        let payload = load_result(Some(&LoadOutcome::Failed(Arc::new(ClientError::Parse(
            "expected value".into(),
        )))));
        assert!(matches!(
            payload,
            Err(AppError::Weather(WeatherError::InvalidPayload(_)))
        ));

        assert!(matches!(
            load_result(None),
            Err(AppError::Weather(WeatherError::ServiceUnavailable))
        ));
    }

    #[test]
    fn test_provider_uses_configured_endpoints() {
        let mut config = Config::default();
        config.endpoints.forecast_url = "http://localhost:9/v1/forecast".into();
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.endpoints().forecast, "http://localhost:9/v1/forecast");
    }
}
