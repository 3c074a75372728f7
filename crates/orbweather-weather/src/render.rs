//! Fixed text template for the dashboard.

use std::fmt::Write;

use crate::classify::Status;
use crate::dashboard::DashboardView;
use crate::search::SuggestionState;
use crate::store::DashboardState;

const BAR_CELLS: usize = 10;
const DEFAULT_ZONE_LABEL: &str = "JAKARTA";

pub const SEARCHING_TEXT: &str = "Mencari kota...";
pub const NOT_FOUND_TEXT: &str = "Kota tidak ditemukan.";

/// Render the full dashboard. `clock` is the pre-formatted city time.
pub fn render(state: &DashboardState, clock: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Cari kota: {}", state.input);
    if state.loading {
        out.push_str("  (memuat...)\n");
    }
    if state.error_visible {
        let _ = writeln!(out, "  ! {}", NOT_FOUND_TEXT);
    }
    out.push_str(&render_suggestions(&state.suggestions));
    out.push('\n');

    match &state.view {
        Some(view) => out.push_str(&render_view(view, clock)),
        None => {
            let _ = writeln!(out, "{}  {}", DEFAULT_ZONE_LABEL, clock);
        }
    }
    out
}

pub fn render_suggestions(state: &SuggestionState) -> String {
    match state {
        SuggestionState::Hidden => String::new(),
        SuggestionState::Loading => format!("  {}\n", SEARCHING_TEXT),
        SuggestionState::NotFound => format!("  {}\n", NOT_FOUND_TEXT),
        SuggestionState::Results(items) => {
            let mut out = String::new();
            for (i, item) in items.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  {}. {} {}  {}",
                    i + 1,
                    item.city.name,
                    item.flag,
                    item.subtitle
                );
            }
            out
        }
    }
}

fn render_view(view: &DashboardView, clock: &str) -> String {
    let mut out = String::new();
    let zone = view.timezone_label.as_deref().unwrap_or(DEFAULT_ZONE_LABEL);

    let _ = writeln!(out, "{}  {}", zone, clock);
    let _ = writeln!(out, "{}", view.location);
    let _ = writeln!(out, "{}, {}", view.weekday, view.date);
    let _ = writeln!(
        out,
        "{}°  {} [{}]   H {}°  L {}°",
        view.temperature, view.condition.label, view.condition.icon, view.high, view.low
    );
    let _ = writeln!(
        out,
        "Angin     {} km/h {} ({}°)",
        view.wind_speed, view.wind_compass, view.wind_direction
    );
    let _ = writeln!(
        out,
        "UV        {} {} {}",
        view.uv_index,
        bar(&view.uv_status),
        view.uv_status.label
    );
    let _ = writeln!(
        out,
        "AQI       {} {} {}",
        view.aqi,
        bar(&view.aqi_status),
        view.aqi_status.label
    );
    let _ = writeln!(out, "Matahari  {} / {}", view.sunrise, view.sunset);
    let _ = writeln!(out, "Lembap    {}   Jarak pandang {}", view.humidity, view.visibility);

    if !view.hourly.is_empty() {
        out.push('\n');
        for entry in &view.hourly {
            let temp = entry
                .temperature
                .map_or_else(|| "--".to_string(), |t| t.to_string());
            let marker = if entry.is_now { '>' } else { ' ' };
            let _ = writeln!(out, "{}{}  {:>3}°  {}", marker, entry.time, temp, entry.icon);
        }
    }
    out
}

/// `[####------]` for a fill percentage.
pub fn bar(status: &Status) -> String {
    let filled = (status.fill_percent as usize * BAR_CELLS).div_ceil(100).min(BAR_CELLS);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_CELLS - filled))
}
