//! Airport index: continent/country grouping and free-text search

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::info;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::models::{Airport, Country};

/// Read-only views over the loaded airports. Groups hold positions into the
/// shared airport slice, so records are never duplicated.
#[derive(Debug, Clone)]
pub struct AirportIndex {
    airports: Arc<[Airport]>,
    /// continent -> country name -> airport positions sorted by name
    groups: BTreeMap<String, BTreeMap<String, Vec<usize>>>,
}

impl AirportIndex {
    /// Group airports by continent and country display name. A country code
    /// missing from `countries` is used as its own display name.
    #[must_use]
    pub fn build(airports: Arc<[Airport]>, countries: &[Country]) -> Self {
        let names: HashMap<&str, &str> = countries
            .iter()
            .map(|c| (c.code.as_str(), c.name.as_str()))
            .collect();

        let mut groups: BTreeMap<String, BTreeMap<String, Vec<usize>>> = BTreeMap::new();
        for (position, airport) in airports.iter().enumerate() {
            let country = names
                .get(airport.iso_country.as_str())
                .copied()
                .unwrap_or(airport.iso_country.as_str());
            groups
                .entry(airport.continent.clone())
                .or_default()
                .entry(country.to_string())
                .or_default()
                .push(position);
        }

        let keys: Vec<String> = airports.iter().map(|a| collation_key(&a.name)).collect();
        for countries in groups.values_mut() {
            for positions in countries.values_mut() {
                positions.sort_by(|&a, &b| {
                    keys[a]
                        .cmp(&keys[b])
                        .then_with(|| airports[a].name.cmp(&airports[b].name))
                });
            }
        }

        let index = Self { airports, groups };
        info!(
            "Indexed {} airports across {} continents and {} countries",
            index.len(),
            index.groups.len(),
            index.country_count()
        );
        index
    }

    /// Continent codes that have at least one airport, ascending
    #[must_use]
    pub fn continents(&self) -> Vec<&str> {
        self.groups.keys().map(String::as_str).collect()
    }

    /// Country names on a continent, ascending; empty for an unknown continent
    #[must_use]
    pub fn countries(&self, continent: &str) -> Vec<&str> {
        self.groups
            .get(continent)
            .map(|countries| countries.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Airports of one country on one continent, sorted by name
    #[must_use]
    pub fn airports(&self, continent: &str, country: &str) -> Vec<&Airport> {
        self.groups
            .get(continent)
            .and_then(|countries| countries.get(country))
            .map(|positions| positions.iter().map(|&i| &self.airports[i]).collect())
            .unwrap_or_default()
    }

    /// Airport whose id or ident equals `key`
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Airport> {
        self.airports.iter().find(|airport| airport.matches_id(key))
    }

    /// First `limit` airports, in load order, whose name or municipality
    /// contains `query` or whose IATA/ICAO code equals it (case-insensitive).
    /// The query is matched as given, surrounding whitespace included. An
    /// empty query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Airport> {
        let query = query.to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.airports
            .iter()
            .filter(|airport| airport.matches_query(&query))
            .take(limit)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.airports.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.airports.is_empty()
    }

    /// Distinct (continent, country) groups
    #[must_use]
    pub fn country_count(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }
}

/// Case- and accent-insensitive sort key: canonical decomposition with the
/// combining marks dropped, then lowercased.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
