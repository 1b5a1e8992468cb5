//! Reference data loader
//!
//! Reads the airports, countries and regions CSV files from the data
//! directory. Each dataset is parsed at most once per process and then
//! shared read-only.

pub mod fields;
pub mod records;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::error::AtlasError;
use crate::models::{Airport, Country, Region};
use crate::Result;

/// The three reference tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Airports,
    Countries,
    Regions,
}

impl Dataset {
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Airports => "airports.csv",
            Self::Countries => "countries.csv",
            Self::Regions => "regions.csv",
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Airports => "airports",
            Self::Countries => "countries",
            Self::Regions => "regions",
        }
    }
}

/// A typed record produced from one CSV row
pub trait DatasetRecord: Sized {
    /// Row shape as it appears in the file
    type Raw: DeserializeOwned;

    const DATASET: Dataset;

    /// Convert a raw row; `None` drops the row
    fn from_raw(raw: Self::Raw) -> Option<Self>;
}

/// Load one dataset file from `data_dir`
pub fn load_dataset<T: DatasetRecord>(data_dir: &Path) -> Result<Vec<T>> {
    let path = data_dir.join(T::DATASET.file_name());
    info!("Loading {} from: {:?}", T::DATASET.name(), path);

    if !path.exists() {
        return Err(AtlasError::dataset_not_found(path));
    }

    let file = File::open(&path)?;
    parse_dataset(file)
}

/// Parse CSV content with a header row. Blank rows are skipped, malformed
/// rows are logged and skipped.
pub fn parse_dataset<T: DatasetRecord, R: Read>(source: R) -> Result<Vec<T>> {
    let dataset = T::DATASET.name();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| AtlasError::dataset(dataset, format!("Failed to read header row: {e}")))?
        .clone();

    let mut records = Vec::new();
    let mut dropped = 0usize;
    let mut parse_errors = 0usize;

    for (row, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("Failed to read {} row {}: {}", dataset, row + 1, e);
                parse_errors += 1;
                continue;
            }
        };

        if record.iter().all(str::is_empty) {
            continue;
        }

        match record.deserialize::<T::Raw>(Some(&headers)) {
            Ok(raw) => match T::from_raw(raw) {
                Some(value) => records.push(value),
                None => dropped += 1,
            },
            Err(e) => {
                warn!("Failed to parse {} row {}: {}", dataset, row + 1, e);
                parse_errors += 1;
            }
        }
    }

    info!(
        "Loaded {} {} ({} filtered, {} parse errors)",
        records.len(),
        dataset,
        dropped,
        parse_errors
    );

    if records.is_empty() && parse_errors > 0 {
        return Err(AtlasError::dataset(
            dataset,
            "No valid rows could be parsed",
        ));
    }

    Ok(records)
}

/// Process-wide reference tables, each loaded on first use
#[derive(Debug)]
pub struct ReferenceData {
    data_dir: PathBuf,
    airports: OnceLock<Arc<[Airport]>>,
    countries: OnceLock<Vec<Country>>,
    regions: OnceLock<Vec<Region>>,
}

impl ReferenceData {
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            airports: OnceLock::new(),
            countries: OnceLock::new(),
            regions: OnceLock::new(),
        }
    }

    /// Reference data that is already in memory; nothing is read from disk
    #[must_use]
    pub fn from_records(airports: Vec<Airport>, countries: Vec<Country>, regions: Vec<Region>) -> Self {
        Self {
            data_dir: PathBuf::new(),
            airports: OnceLock::from(Arc::from(airports)),
            countries: OnceLock::from(countries),
            regions: OnceLock::from(regions),
        }
    }

    /// All medium and large airports with coordinates, in file order
    pub fn airports(&self) -> Result<&Arc<[Airport]>> {
        memoized(&self.airports, || {
            load_dataset::<Airport>(&self.data_dir).map(Arc::from)
        })
    }

    pub fn countries(&self) -> Result<&[Country]> {
        memoized(&self.countries, || load_dataset(&self.data_dir)).map(Vec::as_slice)
    }

    pub fn regions(&self) -> Result<&[Region]> {
        memoized(&self.regions, || load_dataset(&self.data_dir)).map(Vec::as_slice)
    }

    /// Regions whose country code equals `country` exactly
    pub fn regions_for(&self, country: &str) -> Result<Vec<&Region>> {
        let regions = self.regions()?;
        let matching: Vec<&Region> = regions
            .iter()
            .filter(|region| region.iso_country == country)
            .collect();
        debug!("Found {} regions for country {}", matching.len(), country);
        Ok(matching)
    }
}

/// Return the cached value, loading it on first use. A failed load leaves
/// the cell empty so a later call retries. Concurrent first calls may each
/// load, but all of them observe whichever value was stored first.
pub(crate) fn memoized<T>(cell: &OnceLock<T>, load: impl FnOnce() -> Result<T>) -> Result<&T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let loaded = load()?;
    Ok(cell.get_or_init(|| loaded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const AIRPORTS_CSV: &str = "\
id,ident,type,name,latitude_deg,longitude_deg,elevation_ft,continent,iso_country,iso_region,municipality,scheduled_service,gps_code,icao_code,iata_code
5849,RJTT,large_airport,Tokyo Haneda International Airport,35.552299,139.779999,35,AS,JP,JP-13,Tokyo,yes,RJTT,RJTT,HND
1,00A,heliport,Total RF Heliport,40.07,-74.93,11,NA,US,US-PA,Bensalem,no,00A,,
,,,,,,,,,,,,,,
4185,LFPG,large_airport,\"Charles de Gaulle International Airport\",49.012798,2.55,392.6,EU,FR,FR-IDF,\"Paris (Roissy-en-France, Val-d'Oise)\",yes,LFPG,,CDG
9999,XXXX,medium_airport,Nowhere Field,,,,EU,FR,FR-IDF,,no,,,
";

    const COUNTRIES_CSV: &str = "\
id,code,name,continent,wikipedia_link,keywords
302652,JP,Japan,AS,https://en.wikipedia.org/wiki/Japan,
302672,FR,France,EU,https://en.wikipedia.org/wiki/France,
";

    const REGIONS_CSV: &str = "\
id,code,local_code,name,continent,iso_country,wikipedia_link,keywords
303204,JP-13,13,Tokyo,AS,JP,,
303205,JP-27,27,Osaka,AS,JP,,
303206,FR-IDF,IDF,Île-de-France,EU,FR,,
";

    fn data_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("airports.csv"), AIRPORTS_CSV).unwrap();
        fs::write(dir.path().join("countries.csv"), COUNTRIES_CSV).unwrap();
        fs::write(dir.path().join("regions.csv"), REGIONS_CSV).unwrap();
        dir
    }

    #[test]
    fn test_load_airports_filters_and_skips_blank_rows() {
        let dir = data_dir();
        let reference = ReferenceData::new(dir.path());
        let airports = reference.airports().unwrap();

        assert_eq!(airports.len(), 2);
        assert_eq!(airports[0].ident, "RJTT");
        assert_eq!(airports[1].ident, "LFPG");
        assert_eq!(airports[1].elevation_ft, Some(392));
        assert_eq!(
            airports[1].municipality.as_deref(),
            Some("Paris (Roissy-en-France, Val-d'Oise)")
        );
    }

    #[test]
    fn test_airports_are_memoized() {
        let dir = data_dir();
        let reference = ReferenceData::new(dir.path());
        let first = Arc::clone(reference.airports().unwrap());

        // Later calls must not touch the file again
        fs::remove_file(dir.path().join("airports.csv")).unwrap();
        let second = reference.airports().unwrap();
        assert!(Arc::ptr_eq(&first, second));
    }

    #[test]
    fn test_missing_dataset_is_reported_and_retried() {
        let dir = TempDir::new().unwrap();
        let reference = ReferenceData::new(dir.path());

        let err = reference.countries().unwrap_err();
        assert!(matches!(err, AtlasError::DatasetNotFound { .. }));

        fs::write(dir.path().join("countries.csv"), COUNTRIES_CSV).unwrap();
        assert_eq!(reference.countries().unwrap().len(), 2);
    }

    #[test]
    fn test_regions_for_country() {
        let dir = data_dir();
        let reference = ReferenceData::new(dir.path());

        let japan: Vec<&str> = reference
            .regions_for("JP")
            .unwrap()
            .iter()
            .map(|r| r.code.as_str())
            .collect();
        assert_eq!(japan, vec!["JP-13", "JP-27"]);

        assert!(reference.regions_for("jp").unwrap().is_empty());
        assert!(reference.regions_for("ZZ").unwrap().is_empty());
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let countries: Vec<Country> =
            parse_dataset("id,code,name,continent\n".as_bytes()).unwrap();
        assert!(countries.is_empty());
    }

    #[test]
    fn test_from_records_never_reads_disk() {
        let reference = ReferenceData::from_records(Vec::new(), Vec::new(), Vec::new());
        assert!(reference.airports().unwrap().is_empty());
        assert!(reference.regions_for("JP").unwrap().is_empty());
    }
}
