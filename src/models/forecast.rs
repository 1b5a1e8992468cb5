//! Weather forecast model served to clients

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Minute-resolution local time, as the provider writes it
pub const PROVIDER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// (De)serialize a `NaiveDateTime` as `%Y-%m-%dT%H:%M`
mod provider_time {
    use super::*;

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(PROVIDER_TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&value, PROVIDER_TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Short-range forecast for one position, as served to clients.
/// Units are whatever the provider reports (Celsius, km/h, %).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    /// IANA timezone the provider resolved for the position
    pub timezone: String,
    pub current: CurrentConditions,
    /// One entry per forecast day, in date order
    pub daily: Vec<DailyForecast>,
}

/// Conditions at the time of the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    /// Local observation time
    #[serde(with = "provider_time")]
    pub time: NaiveDateTime,
    /// Temperature in Celsius
    pub temperature: f64,
    /// WMO weather interpretation code
    pub weather_code: u16,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: f64,
    /// 16-point compass name of `wind_direction`
    pub wind_cardinal: String,
    /// Relative humidity in percent
    pub humidity: f64,
    pub description: String,
    pub icon: String,
}

/// Aggregates for one forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub weather_code: u16,
    /// Maximum precipitation probability in percent, when the provider has one
    pub precipitation_probability: Option<f64>,
    pub wind_speed_max: f64,
    pub description: String,
    pub icon: String,
}

impl CurrentConditions {
    /// Convert wind direction from degrees to a 16-point cardinal direction
    #[must_use]
    pub fn wind_direction_to_cardinal(degrees: f64) -> &'static str {
        if !degrees.is_finite() {
            return "Unknown";
        }
        match degrees.rem_euclid(360.0).round() as u16 {
            0..=11 | 349..=360 => "N",
            12..=33 => "NNE",
            34..=56 => "NE",
            57..=78 => "ENE",
            79..=101 => "E",
            102..=123 => "ESE",
            124..=146 => "SE",
            147..=168 => "SSE",
            169..=191 => "S",
            192..=213 => "SSW",
            214..=236 => "SW",
            237..=258 => "WSW",
            259..=281 => "W",
            282..=303 => "WNW",
            304..=326 => "NW",
            327..=348 => "NNW",
            _ => "Unknown",
        }
    }
}
