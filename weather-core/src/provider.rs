use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Coordinate, WeatherError, WeatherRecord, config::ProviderConfig};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of current weather for a coordinate, normalized into a [`WeatherRecord`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, coordinate: Coordinate) -> Result<WeatherRecord, WeatherError>;
}

/// Construct the provider from config, failing early when no API key is set.
pub fn provider_from_config(config: &ProviderConfig) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    let provider = OpenWeatherProvider::new(&config.base_url, api_key, config.timeout())?;
    Ok(Box::new(provider))
}
