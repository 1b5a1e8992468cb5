//! Airport reference records and the views built on them

use serde::{Deserialize, Serialize};

/// Airport size class. Only the classes served by the atlas are modelled;
/// every other OurAirports type is dropped at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirportType {
    LargeAirport,
    MediumAirport,
}

impl AirportType {
    /// Parse the dataset's `type` column; `None` for classes the atlas does not keep
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "large_airport" => Some(Self::LargeAirport),
            "medium_airport" => Some(Self::MediumAirport),
            _ => None,
        }
    }
}

/// A medium or large airport with known coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    /// Stable dataset identifier
    pub id: String,
    /// Short identification code (usually the ICAO code)
    pub ident: String,
    #[serde(rename = "type")]
    pub airport_type: AirportType,
    pub name: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    pub elevation_ft: Option<i32>,
    /// Continent code (AF, AN, AS, EU, NA, OC, SA)
    pub continent: String,
    /// ISO 3166-1 alpha-2 country code
    pub iso_country: String,
    pub iso_region: String,
    pub municipality: Option<String>,
    /// "yes"/"no" flag as found in the dataset
    pub scheduled_service: String,
    pub iata_code: Option<String>,
    pub icao_code: Option<String>,
}

impl Airport {
    /// Whether `key` names this airport by dataset id or ident
    #[must_use]
    pub fn matches_id(&self, key: &str) -> bool {
        self.id == key || self.ident == key
    }

    /// Case-insensitive free-text match used by search: substring of the
    /// name or municipality, or an exact IATA/ICAO code.
    /// `lowered_query` must already be lowercase.
    #[must_use]
    pub fn matches_query(&self, lowered_query: &str) -> bool {
        let contains = |value: &str| value.to_lowercase().contains(lowered_query);
        let code_equals = |code: &Option<String>| {
            code.as_deref()
                .is_some_and(|c| c.to_lowercase() == lowered_query)
        };

        contains(&self.name)
            || self.municipality.as_deref().is_some_and(contains)
            || code_equals(&self.iata_code)
            || code_equals(&self.icao_code)
    }
}

/// Country reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: String,
    /// ISO 3166-1 alpha-2 code
    pub code: String,
    pub name: String,
    pub continent: String,
}

/// Administrative region reference record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: String,
    /// ISO 3166-2 code, e.g. "JP-13"
    pub code: String,
    pub local_code: Option<String>,
    pub name: String,
    pub continent: String,
    pub iso_country: String,
}

/// Single-airport view enriched with a landmark photo
#[derive(Debug, Clone, Serialize)]
pub struct AirportDetails {
    #[serde(flatten)]
    pub airport: Airport,
    #[serde(rename = "cityPhoto")]
    pub city_photo: String,
}

impl AirportDetails {
    #[must_use]
    pub fn new(airport: Airport) -> Self {
        let city_photo =
            crate::photos::resolve_photo(airport.municipality.as_deref(), &airport.id);
        Self {
            airport,
            city_photo,
        }
    }
}

/// Where the map should be centred for the current selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: [f64; 2],
    pub zoom: u8,
}

impl MapView {
    pub const AIRPORT_ZOOM: u8 = 10;
    pub const COUNTRY_ZOOM: u8 = 5;
    pub const WORLD_ZOOM: u8 = 2;

    #[must_use]
    pub fn world() -> Self {
        Self {
            center: [20.0, 0.0],
            zoom: Self::WORLD_ZOOM,
        }
    }

    /// Focus on the selected airport, else on the mean position of the listed
    /// airports, else on the whole world.
    #[must_use]
    pub fn for_selection<'a, I>(selected: Option<&Airport>, listed: I) -> Self
    where
        I: IntoIterator<Item = &'a Airport>,
    {
        if let Some(airport) = selected {
            return Self {
                center: [airport.latitude, airport.longitude],
                zoom: Self::AIRPORT_ZOOM,
            };
        }

        let (count, lat_sum, lon_sum) = listed
            .into_iter()
            .fold((0usize, 0.0, 0.0), |(n, lat, lon), a| {
                (n + 1, lat + a.latitude, lon + a.longitude)
            });

        if count == 0 {
            return Self::world();
        }

        Self {
            center: [lat_sum / count as f64, lon_sum / count as f64],
            zoom: Self::COUNTRY_ZOOM,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Build an airport with sensible defaults for tests
    pub fn airport(id: &str, name: &str, continent: &str, country: &str) -> Airport {
        Airport {
            id: id.to_string(),
            ident: format!("ID{id}"),
            airport_type: AirportType::LargeAirport,
            name: name.to_string(),
            latitude: 10.0,
            longitude: 20.0,
            elevation_ft: Some(100),
            continent: continent.to_string(),
            iso_country: country.to_string(),
            iso_region: format!("{country}-01"),
            municipality: None,
            scheduled_service: "yes".to_string(),
            iata_code: None,
            icao_code: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::airport;
    use super::*;

    #[test]
    fn test_airport_type_parse() {
        assert_eq!(
            AirportType::parse("large_airport"),
            Some(AirportType::LargeAirport)
        );
        assert_eq!(
            AirportType::parse("medium_airport"),
            Some(AirportType::MediumAirport)
        );
        assert_eq!(AirportType::parse("small_airport"), None);
        assert_eq!(AirportType::parse("heliport"), None);
    }

    #[test]
    fn test_matches_query() {
        let mut haneda = airport("1", "Tokyo Haneda International Airport", "AS", "JP");
        haneda.municipality = Some("Ota, Tokyo".to_string());
        haneda.iata_code = Some("HND".to_string());
        haneda.icao_code = Some("RJTT".to_string());

        assert!(haneda.matches_query("haneda"));
        assert!(haneda.matches_query("ota"));
        assert!(haneda.matches_query("hnd"));
        assert!(haneda.matches_query("rjtt"));
        // codes must match exactly, not as substrings
        assert!(!haneda.matches_query("rjt"));
        assert!(!haneda.matches_query("narita"));
    }

    #[test]
    fn test_serialization_shape() {
        let details = AirportDetails {
            airport: airport("42", "Test Field", "EU", "FR"),
            city_photo: "/paris-eiffel.jpg".to_string(),
        };
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["type"], "large_airport");
        assert_eq!(value["cityPhoto"], "/paris-eiffel.jpg");
        assert_eq!(value["id"], "42");
        assert!(value["municipality"].is_null());
    }

    #[test]
    fn test_map_view() {
        let mut a = airport("1", "A", "EU", "FR");
        a.latitude = 40.0;
        a.longitude = 0.0;
        let mut b = airport("2", "B", "EU", "FR");
        b.latitude = 50.0;
        b.longitude = 10.0;

        let view = MapView::for_selection(None, [&a, &b]);
        assert_eq!(view.center, [45.0, 5.0]);
        assert_eq!(view.zoom, MapView::COUNTRY_ZOOM);

        let view = MapView::for_selection(Some(&b), [&a, &b]);
        assert_eq!(view.center, [50.0, 10.0]);
        assert_eq!(view.zoom, MapView::AIRPORT_ZOOM);

        assert_eq!(
            MapView::for_selection(None, std::iter::empty()),
            MapView::world()
        );
    }
}
