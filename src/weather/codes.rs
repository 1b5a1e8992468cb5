//! WMO weather interpretation codes

pub const ICON_SUN: &str = "☀️";
pub const ICON_PARTLY_CLOUDY: &str = "⛅";
pub const ICON_FOG: &str = "🌫️";
pub const ICON_RAIN: &str = "🌧️";
pub const ICON_SNOW: &str = "🌨️";
pub const ICON_STORM: &str = "⛈️";
pub const ICON_PARTLY_SUNNY: &str = "🌤️";

/// Convert a WMO weather code to a human-readable description
#[must_use]
pub fn weather_code_to_description(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Pick a display symbol by code band. Codes 87..=94 are not assigned by
/// WMO and get the generic symbol.
#[must_use]
pub fn weather_code_to_icon(code: u16) -> &'static str {
    match code {
        0 => ICON_SUN,
        1..=3 => ICON_PARTLY_CLOUDY,
        4..=48 => ICON_FOG,
        49..=67 => ICON_RAIN,
        68..=77 => ICON_SNOW,
        78..=82 => ICON_RAIN,
        83..=86 => ICON_SNOW,
        95.. => ICON_STORM,
        _ => ICON_PARTLY_SUNNY,
    }
}
