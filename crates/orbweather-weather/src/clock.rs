//! Wall clock for the selected city.

use chrono::{DateTime, Datelike, Local, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

/// Zone the clock renders in. Unknown IANA names fall back to local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockZone {
    Named(Tz),
    Local,
}

impl ClockZone {
    pub fn parse(name: &str) -> Self {
        match name.parse::<Tz>() {
            Ok(tz) => Self::Named(tz),
            Err(_) => {
                tracing::debug!("Unknown time zone {:?}, using local time", name);
                Self::Local
            }
        }
    }

    /// Calendar date at `now` in this zone.
    pub fn date_at(self, now: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Named(tz) => now.with_timezone(&tz).date_naive(),
            Self::Local => now.with_timezone(&Local).date_naive(),
        }
    }

    /// `HH.MM.SS`, 24-hour, as the id-ID locale prints it.
    pub fn format_time(self, now: DateTime<Utc>) -> String {
        const FMT: &str = "%H.%M.%S";
        match self {
            Self::Named(tz) => now.with_timezone(&tz).format(FMT).to_string(),
            Self::Local => now.with_timezone(&Local).format(FMT).to_string(),
        }
    }
}

/// Header label for an IANA zone: "Asia/Jakarta" -> "JAKARTA".
pub fn timezone_label(name: &str) -> String {
    let city = name.split('/').nth(1).unwrap_or(name);
    city.to_uppercase().replace('_', " ")
}

const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// "14 Oktober 2026"
pub fn format_long_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}
