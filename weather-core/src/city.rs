//! Lookup over the provider's `city.list.json` directory.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

use crate::{error::WeatherError, model::Coordinate};

#[derive(Debug, Error)]
pub enum CityLookupError {
    #[error("no city named '{0}' in the directory")]
    NotFound(String),

    #[error("city id {0} is not among the candidates")]
    UnknownId(u64),

    #[error("failed to read city list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse city list: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CityCoord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    pub coord: CityCoord,
}

impl City {
    pub fn coordinate(&self) -> Result<Coordinate, WeatherError> {
        Coordinate::new(self.coord.lat, self.coord.lon)
    }

    /// One-line label used when the user has to choose between candidates.
    pub fn label(&self) -> String {
        let mut label = format!("#{} {}", self.id, self.name);
        if !self.state.is_empty() {
            label.push_str(&format!(", {}", self.state));
        }
        if !self.country.is_empty() {
            label.push_str(&format!(" ({})", self.country));
        }
        label.push_str(&format!(" [{:.4}, {:.4}]", self.coord.lat, self.coord.lon));
        label
    }
}

#[derive(Debug, Clone, Default)]
pub struct CityDirectory {
    cities: Vec<City>,
}

impl CityDirectory {
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    pub fn load(path: &Path) -> Result<Self, CityLookupError> {
        let contents = fs::read_to_string(path).map_err(|source| CityLookupError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let dir = Self::from_json(&contents)?;
        tracing::debug!(path = %path.display(), cities = dir.len(), "loaded city list");
        Ok(dir)
    }

    pub fn from_json(json: &str) -> Result<Self, CityLookupError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// All cities whose name equals the title-cased input.
    pub fn find_by_name(&self, input: &str) -> Result<Vec<City>, CityLookupError> {
        let wanted = title_case(input.trim());
        let matches: Vec<City> = self
            .cities
            .iter()
            .filter(|c| c.name == wanted)
            .cloned()
            .collect();

        if matches.is_empty() {
            return Err(CityLookupError::NotFound(wanted));
        }
        Ok(matches)
    }
}

pub fn select_by_id(candidates: &[City], id: u64) -> Result<&City, CityLookupError> {
    candidates
        .iter()
        .find(|c| c.id == id)
        .ok_or(CityLookupError::UnknownId(id))
}

/// Upper-case the first letter of every alphabetic run and lower-case the rest.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;

    for ch in input.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}
