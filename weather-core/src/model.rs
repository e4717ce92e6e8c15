use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// A validated point on the globe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = WeatherError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside [-90, 90] / [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(WeatherError::InvalidCoordinate(format!(
                "latitude {latitude} is outside [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinate(format!(
                "longitude {longitude} is outside [-180, 180]"
            )));
        }

        Ok(Self { latitude, longitude })
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Normalized current-weather observation, as served by `GET /weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub temperature: f64,
    pub max_temperature: f64,
    pub min_temperature: f64,
}

impl WeatherRecord {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}
