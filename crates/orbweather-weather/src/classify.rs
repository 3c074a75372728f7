//! Fixed lookup tables that turn raw readings into labels, icons and bar fills.

/// Label and Lucide icon name for a WMO weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherDesc {
    pub label: &'static str,
    pub icon: &'static str,
}

const UNKNOWN: WeatherDesc = WeatherDesc {
    label: "Unknown",
    icon: "help-circle",
};

/// Map a WMO code to its description. Codes outside the table fall back to
/// "Unknown" / "help-circle".
pub fn weather_desc(code: i32) -> WeatherDesc {
    let (label, icon) = match code {
        0 => ("Cerah", "sun"),
        1 => ("Cerah Berawan", "cloud-sun"),
        2 => ("Berawan", "cloud"),
        3 => ("Mendung", "cloudy"),
        45 => ("Kabut", "align-justify"),
        51 | 53 => ("Gerimis", "cloud-drizzle"),
        61 => ("Hujan Ringan", "cloud-rain"),
        63 => ("Hujan", "cloud-rain"),
        65 => ("Hujan Lebat", "cloud-lightning"),
        80 => ("Hujan Lokal", "cloud-rain"),
        95 => ("Badai Petir", "zap"),
        _ => return UNKNOWN,
    };
    WeatherDesc { label, icon }
}

/// Progress-bar colour, named after the Tailwind class it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Yellow,
    Orange,
    Red,
    Purple,
}

impl Tone {
    pub fn css_class(self) -> &'static str {
        match self {
            Tone::Green => "bg-green-500",
            Tone::Yellow => "bg-yellow-500",
            Tone::Orange => "bg-orange-500",
            Tone::Red => "bg-red-500",
            Tone::Purple => "bg-purple-500",
        }
    }
}

/// A status label with a bar fill in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub label: &'static str,
    pub tone: Tone,
    pub fill_percent: u8,
}

impl Status {
    const fn new(label: &'static str, tone: Tone, fill_percent: u8) -> Self {
        Self {
            label,
            tone,
            fill_percent,
        }
    }
}

/// US AQI bands.
pub fn aqi_status(aqi: f64) -> Status {
    if aqi <= 50.0 {
        Status::new("Baik", Tone::Green, 20)
    } else if aqi <= 100.0 {
        Status::new("Sedang", Tone::Yellow, 40)
    } else if aqi <= 150.0 {
        Status::new("Tidak Sehat (Sensitif)", Tone::Orange, 60)
    } else if aqi <= 200.0 {
        Status::new("Tidak Sehat", Tone::Red, 80)
    } else {
        Status::new("Berbahaya", Tone::Purple, 100)
    }
}

pub fn uv_status(uv: f64) -> Status {
    if uv <= 2.0 {
        Status::new("Low", Tone::Green, 20)
    } else if uv <= 5.0 {
        Status::new("Mod", Tone::Yellow, 50)
    } else if uv <= 7.0 {
        Status::new("High", Tone::Orange, 75)
    } else {
        Status::new("Extreme", Tone::Red, 100)
    }
}

const COMPASS: [&str; 16] = [
    "U", "TL", "TL", "T", "T", "Teng", "Teng", "S", "S", "BD", "BD", "B", "B", "BL", "BL", "U",
];

/// Indonesian compass abbreviation for a bearing in degrees.
pub fn deg_to_compass(degrees: f64) -> &'static str {
    let sector = (degrees / 22.5 + 0.5).floor() as i64;
    COMPASS[sector.rem_euclid(16) as usize]
}

/// Regional-indicator flag for a two-letter country code ("ID" -> 🇮🇩).
pub fn flag_emoji(country_code: Option<&str>) -> String {
    let Some(code) = country_code else {
        return String::new();
    };
    code.chars()
        .filter(char::is_ascii_alphabetic)
        .filter_map(|c| char::from_u32(0x1F1E6 + (c.to_ascii_uppercase() as u32 - 'A' as u32)))
        .collect()
}

/// Round half up, the way `Math.round` does (-2.5 -> -2).
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
