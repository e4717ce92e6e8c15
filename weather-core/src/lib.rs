//! Core library for the weather map tools.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather normalizer: provider abstraction and the OpenWeather client
//! - Temperature to marker-color classification
//! - City directory lookup
//!
//! It is used by `weather-server` and `weather-cli`.

pub mod city;
pub mod config;
pub mod error;
pub mod marker;
pub mod model;
pub mod provider;

pub use city::{City, CityDirectory, CityLookupError};
pub use config::{ClientConfig, Config, ProviderConfig, ServerConfig};
pub use error::WeatherError;
pub use marker::{ColorBucket, classify_temperature};
pub use model::{Coordinate, WeatherRecord};
pub use provider::{OpenWeatherProvider, WeatherProvider};
