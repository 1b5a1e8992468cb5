//! Data models for the airport atlas
//!
//! This module contains the core domain models organized by concern:
//! - Airport: Reference records (airports, countries, regions) and derived views
//! - Forecast: Normalised weather forecast returned to clients

pub mod airport;
pub mod forecast;

// Re-export all public types for convenient access
pub use airport::{Airport, AirportDetails, AirportType, Country, MapView, Region};
pub use forecast::{CurrentConditions, DailyForecast, Forecast};
