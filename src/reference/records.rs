//! Raw CSV row shapes and their conversion into typed records

use serde::Deserialize;
use tracing::trace;

use super::fields::{non_empty, parse_f64, parse_i32};
use super::{Dataset, DatasetRecord};
use crate::models::{Airport, AirportType, Country, Region};

/// One row of airports.csv (OurAirports layout). Unknown columns are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawAirport {
    pub id: Option<String>,
    pub ident: Option<String>,
    #[serde(rename = "type")]
    pub airport_type: Option<String>,
    pub name: Option<String>,
    pub latitude_deg: Option<String>,
    pub longitude_deg: Option<String>,
    pub elevation_ft: Option<String>,
    pub continent: Option<String>,
    pub iso_country: Option<String>,
    pub iso_region: Option<String>,
    pub municipality: Option<String>,
    pub scheduled_service: Option<String>,
    pub gps_code: Option<String>,
    pub icao_code: Option<String>,
    pub iata_code: Option<String>,
}

/// One row of countries.csv
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCountry {
    pub id: Option<String>,
    pub code: Option<String>,
    pub name: Option<String>,
    pub continent: Option<String>,
}

/// One row of regions.csv
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRegion {
    pub id: Option<String>,
    pub code: Option<String>,
    pub local_code: Option<String>,
    pub name: Option<String>,
    pub continent: Option<String>,
    pub iso_country: Option<String>,
}

impl DatasetRecord for Airport {
    type Raw = RawAirport;
    const DATASET: Dataset = Dataset::Airports;

    /// Keep medium/large airports with a position and a continent
    fn from_raw(raw: RawAirport) -> Option<Self> {
        let airport_type = non_empty(raw.airport_type)
            .as_deref()
            .and_then(AirportType::parse)?;

        let latitude = parse_f64(raw.latitude_deg.as_deref());
        let longitude = parse_f64(raw.longitude_deg.as_deref());
        let continent = non_empty(raw.continent);
        let (Some(latitude), Some(longitude), Some(continent)) = (latitude, longitude, continent)
        else {
            trace!(id = ?raw.id, "Skipping airport without position or continent");
            return None;
        };

        let id = non_empty(raw.id)?;

        Some(Airport {
            ident: non_empty(raw.ident).unwrap_or_else(|| id.clone()),
            id,
            airport_type,
            name: non_empty(raw.name).unwrap_or_default(),
            latitude,
            longitude,
            elevation_ft: parse_i32(raw.elevation_ft.as_deref()),
            continent,
            iso_country: non_empty(raw.iso_country).unwrap_or_default(),
            iso_region: non_empty(raw.iso_region).unwrap_or_default(),
            municipality: non_empty(raw.municipality),
            scheduled_service: non_empty(raw.scheduled_service).unwrap_or_default(),
            iata_code: non_empty(raw.iata_code),
            // GPS code wins over the explicit ICAO column
            icao_code: non_empty(raw.gps_code).or_else(|| non_empty(raw.icao_code)),
        })
    }
}

impl DatasetRecord for Country {
    type Raw = RawCountry;
    const DATASET: Dataset = Dataset::Countries;

    fn from_raw(raw: RawCountry) -> Option<Self> {
        let code = non_empty(raw.code)?;
        Some(Country {
            id: non_empty(raw.id).unwrap_or_default(),
            name: non_empty(raw.name).unwrap_or_else(|| code.clone()),
            code,
            continent: non_empty(raw.continent).unwrap_or_default(),
        })
    }
}

impl DatasetRecord for Region {
    type Raw = RawRegion;
    const DATASET: Dataset = Dataset::Regions;

    fn from_raw(raw: RawRegion) -> Option<Self> {
        let code = non_empty(raw.code)?;
        Some(Region {
            id: non_empty(raw.id).unwrap_or_default(),
            local_code: non_empty(raw.local_code),
            name: non_empty(raw.name).unwrap_or_else(|| code.clone()),
            code,
            continent: non_empty(raw.continent).unwrap_or_default(),
            iso_country: non_empty(raw.iso_country).unwrap_or_default(),
        })
    }
}
