//! Query layer shared by the HTTP handlers

use std::sync::OnceLock;

use tracing::{debug, instrument};

use crate::airports::AirportIndex;
use crate::config::{AtlasConfig, SearchConfig};
use crate::error::AtlasError;
use crate::models::{Airport, AirportDetails, Forecast, MapView, Region};
use crate::reference::{ReferenceData, memoized};
use crate::weather::ForecastClient;
use crate::Result;

/// Reference data, its index and the forecast gateway behind one handle
#[derive(Debug)]
pub struct Atlas {
    reference: ReferenceData,
    index: OnceLock<AirportIndex>,
    forecasts: ForecastClient,
    search: SearchConfig,
}

impl Atlas {
    pub fn new(config: &AtlasConfig) -> Result<Self> {
        Ok(Self::with_parts(
            ReferenceData::new(&config.data.directory),
            ForecastClient::new(&config.weather)?,
            config.search.clone(),
        ))
    }

    #[must_use]
    pub fn with_parts(
        reference: ReferenceData,
        forecasts: ForecastClient,
        search: SearchConfig,
    ) -> Self {
        Self {
            reference,
            index: OnceLock::new(),
            forecasts,
            search,
        }
    }

    #[must_use]
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// The airport index, built from the reference data on first use
    pub fn index(&self) -> Result<&AirportIndex> {
        memoized(&self.index, || {
            let airports = self.reference.airports()?.clone();
            let countries = self.reference.countries()?;
            Ok(AirportIndex::build(airports, countries))
        })
    }

    pub fn continents(&self) -> Result<Vec<String>> {
        Ok(self
            .index()?
            .continents()
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    pub fn countries(&self, continent: &str) -> Result<Vec<String>> {
        Ok(self
            .index()?
            .countries(continent)
            .into_iter()
            .map(str::to_string)
            .collect())
    }

    pub fn airports(&self, continent: &str, country: &str) -> Result<Vec<Airport>> {
        Ok(self
            .index()?
            .airports(continent, country)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Airport by id or ident, with its landmark photo
    pub fn airport_details(&self, key: &str) -> Result<Option<AirportDetails>> {
        Ok(self
            .index()?
            .find(key)
            .cloned()
            .map(AirportDetails::new))
    }

    /// Free-text search. Queries shorter than the configured minimum and
    /// limits above the configured maximum are rejected.
    #[instrument(skip(self))]
    pub fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<Airport>> {
        if query.chars().count() < self.search.min_query_length {
            return Err(AtlasError::validation(format!(
                "search query must be at least {} characters",
                self.search.min_query_length
            )));
        }

        let limit = limit.unwrap_or(self.search.default_limit);
        if limit > self.search.max_limit {
            return Err(AtlasError::validation(format!(
                "limit must not exceed {}",
                self.search.max_limit
            )));
        }

        let results: Vec<Airport> = self
            .index()?
            .search(query, limit)
            .into_iter()
            .cloned()
            .collect();
        debug!("Search matched {} airports", results.len());
        Ok(results)
    }

    /// Forecast for a position given in decimal degrees
    pub async fn forecast(&self, latitude: f64, longitude: f64) -> Result<Forecast> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(AtlasError::validation(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(AtlasError::validation(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }
        self.forecasts.get_forecast(latitude, longitude).await
    }

    pub fn regions(&self, country: &str) -> Result<Vec<Region>> {
        Ok(self
            .reference
            .regions_for(country)?
            .into_iter()
            .cloned()
            .collect())
    }

    /// Map centre for the current selection. An unknown airport key falls
    /// back to the country listing.
    pub fn map_view(
        &self,
        continent: Option<&str>,
        country: Option<&str>,
        airport: Option<&str>,
    ) -> Result<MapView> {
        let index = self.index()?;
        let selected = airport.and_then(|key| index.find(key));
        let listed = match (continent, country) {
            (Some(continent), Some(country)) => index.airports(continent, country),
            _ => Vec::new(),
        };
        Ok(MapView::for_selection(selected, listed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherConfig;
    use crate::models::Country;
    use crate::models::airport::test_support::airport;

    fn atlas() -> Atlas {
        let mut haneda = airport("5849", "Tokyo Haneda International Airport", "AS", "JP");
        haneda.ident = "RJTT".to_string();
        haneda.municipality = Some("Tokyo".to_string());
        haneda.latitude = 35.55;
        haneda.longitude = 139.78;

        let mut narita = airport("5850", "Narita International Airport", "AS", "JP");
        narita.latitude = 35.76;
        narita.longitude = 140.39;

        let reference = ReferenceData::from_records(
            vec![haneda, narita],
            vec![Country {
                id: "1".to_string(),
                code: "JP".to_string(),
                name: "Japan".to_string(),
                continent: "AS".to_string(),
            }],
            vec![Region {
                id: "2".to_string(),
                code: "JP-13".to_string(),
                local_code: Some("13".to_string()),
                name: "Tokyo".to_string(),
                continent: "AS".to_string(),
                iso_country: "JP".to_string(),
            }],
        );
        let forecasts = ForecastClient::new(&WeatherConfig::default()).unwrap();
        Atlas::with_parts(reference, forecasts, SearchConfig::default())
    }

    #[test]
    fn test_browse() {
        let atlas = atlas();
        assert_eq!(atlas.continents().unwrap(), vec!["AS"]);
        assert_eq!(atlas.countries("AS").unwrap(), vec!["Japan"]);
        assert_eq!(atlas.airports("AS", "Japan").unwrap().len(), 2);
        assert_eq!(atlas.regions("JP").unwrap().len(), 1);
    }

    #[test]
    fn test_airport_details() {
        let atlas = atlas();
        let details = atlas.airport_details("RJTT").unwrap().unwrap();
        assert_eq!(details.airport.id, "5849");
        assert_eq!(details.city_photo, "/tokyo-tower.jpg");
        assert!(atlas.airport_details("nope").unwrap().is_none());
    }

    #[test]
    fn test_search_validation() {
        let atlas = atlas();
        assert!(matches!(
            atlas.search("h", None),
            Err(AtlasError::Validation { .. })
        ));
        assert!(matches!(
            atlas.search("haneda", Some(10_000)),
            Err(AtlasError::Validation { .. })
        ));
        assert_eq!(atlas.search("haneda", None).unwrap().len(), 1);
        // surrounding whitespace is part of the query
        assert_eq!(atlas.search("tokyo", None).unwrap().len(), 1);
        assert!(atlas.search(" tokyo", None).unwrap().is_empty());
        assert!(atlas.search("narita", Some(0)).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forecast_rejects_out_of_range_coordinates() {
        let atlas = atlas();
        assert!(matches!(
            atlas.forecast(91.0, 0.0).await,
            Err(AtlasError::Validation { .. })
        ));
        assert!(matches!(
            atlas.forecast(0.0, -180.5).await,
            Err(AtlasError::Validation { .. })
        ));
        assert!(matches!(
            atlas.forecast(f64::NAN, 0.0).await,
            Err(AtlasError::Validation { .. })
        ));
    }

    #[test]
    fn test_map_view() {
        let atlas = atlas();
        let view = atlas.map_view(None, None, Some("RJTT")).unwrap();
        assert_eq!(view.center, [35.55, 139.78]);
        assert_eq!(view.zoom, MapView::AIRPORT_ZOOM);

        let view = atlas.map_view(Some("AS"), Some("Japan"), None).unwrap();
        assert_eq!(view.zoom, MapView::COUNTRY_ZOOM);

        assert_eq!(atlas.map_view(None, None, None).unwrap(), MapView::world());
    }
}
