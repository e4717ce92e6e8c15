//! HTTP proxy exposing the weather normalizer as `GET /weather?lat=..&lon=..`.

pub mod error;
pub mod routes;

use std::sync::Arc;

use weather_core::WeatherProvider;

pub use routes::router;

/// Shared, read-only state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}
