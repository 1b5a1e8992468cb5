//! `OpenMeteo` API response structures and conversion into [`Forecast`]

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::codes::{weather_code_to_description, weather_code_to_icon};
use crate::error::AtlasError;
use crate::models::forecast::PROVIDER_TIME_FORMAT;
use crate::models::{CurrentConditions, DailyForecast, Forecast};
use crate::Result;

/// Forecast horizon requested from the provider
pub const FORECAST_DAYS: u8 = 7;

/// Variables requested for the current block
pub const CURRENT_VARIABLES: &str =
    "temperature_2m,weather_code,wind_speed_10m,wind_direction_10m,relative_humidity_2m";

/// Variables requested for the daily block
pub const DAILY_VARIABLES: &str = "temperature_2m_max,temperature_2m_min,weather_code,precipitation_probability_max,wind_speed_10m_max";

/// Forecast response from `OpenMeteo`. Every field is required.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub timezone: String,
    pub current: CurrentData,
    pub daily: DailyData,
}

#[derive(Debug, Deserialize)]
pub struct CurrentData {
    pub time: String,
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
    pub weather_code: u16,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: f64,
    #[serde(rename = "wind_direction_10m")]
    pub wind_direction: f64,
    #[serde(rename = "relative_humidity_2m")]
    pub humidity: f64,
}

/// Daily arrays, aligned by index
#[derive(Debug, Deserialize)]
pub struct DailyData {
    pub time: Vec<String>,
    #[serde(rename = "temperature_2m_max")]
    pub temperature_max: Vec<f64>,
    #[serde(rename = "temperature_2m_min")]
    pub temperature_min: Vec<f64>,
    pub weather_code: Vec<u16>,
    /// Null for days beyond the provider's probability horizon
    #[serde(rename = "precipitation_probability_max")]
    pub precipitation_probability: Vec<Option<f64>>,
    #[serde(rename = "wind_speed_10m_max")]
    pub wind_speed_max: Vec<f64>,
}

fn parse_time(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, PROVIDER_TIME_FORMAT)
        .map_err(|e| AtlasError::upstream(format!("Invalid current time '{value}': {e}")))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AtlasError::upstream(format!("Invalid daily date '{value}': {e}")))
}

impl DailyData {
    fn check_aligned(&self) -> Result<usize> {
        let days = self.time.len();
        let lengths = [
            ("temperature_2m_max", self.temperature_max.len()),
            ("temperature_2m_min", self.temperature_min.len()),
            ("weather_code", self.weather_code.len()),
            ("precipitation_probability_max", self.precipitation_probability.len()),
            ("wind_speed_10m_max", self.wind_speed_max.len()),
        ];
        for (field, len) in lengths {
            if len != days {
                return Err(AtlasError::upstream(format!(
                    "Daily field {field} has {len} entries, expected {days}"
                )));
            }
        }
        Ok(days)
    }
}

impl Forecast {
    /// Create forecast from `OpenMeteo` API response. Values are passed
    /// through in the provider's units.
    pub fn from_open_meteo(response: ForecastResponse) -> Result<Self> {
        let ForecastResponse {
            timezone,
            current,
            daily,
        } = response;

        let days = daily.check_aligned()?;

        let current = CurrentConditions {
            time: parse_time(&current.time)?,
            temperature: current.temperature,
            weather_code: current.weather_code,
            wind_speed: current.wind_speed,
            wind_direction: current.wind_direction,
            humidity: current.humidity,
            wind_cardinal: CurrentConditions::wind_direction_to_cardinal(current.wind_direction)
                .to_string(),
            description: weather_code_to_description(current.weather_code).to_string(),
            icon: weather_code_to_icon(current.weather_code).to_string(),
        };

        let mut entries = Vec::with_capacity(days);
        for i in 0..days {
            let code = daily.weather_code[i];
            entries.push(DailyForecast {
                date: parse_date(&daily.time[i])?,
                temperature_max: daily.temperature_max[i],
                temperature_min: daily.temperature_min[i],
                weather_code: code,
                precipitation_probability: daily.precipitation_probability[i],
                wind_speed_max: daily.wind_speed_max[i],
                description: weather_code_to_description(code).to_string(),
                icon: weather_code_to_icon(code).to_string(),
            });
        }

        Ok(Self {
            timezone,
            current,
            daily: entries,
        })
    }
}
