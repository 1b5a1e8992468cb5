//! Airport Atlas - browsable directory of international airports
//!
//! Loads the OurAirports reference tables, groups medium and large airports
//! by continent and country, and serves them over a JSON API together with
//! live forecasts from `OpenMeteo`.

pub mod airports;
pub mod api;
pub mod atlas;
pub mod config;
pub mod error;
pub mod models;
pub mod photos;
pub mod reference;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use airports::AirportIndex;
pub use atlas::Atlas;
pub use config::AtlasConfig;
pub use error::AtlasError;
pub use models::{Airport, AirportDetails, Country, Forecast, MapView, Region};
pub use reference::ReferenceData;
pub use weather::ForecastClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AtlasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
