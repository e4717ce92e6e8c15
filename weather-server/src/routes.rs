use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use serde::Deserialize;
use tracing::instrument;
use weather_core::{Coordinate, WeatherRecord};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct WeatherQuery {
    pub lat: f64,
    pub lon: f64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather", get(get_weather))
        .with_state(state)
}

/// GET /weather?lat=<f64>&lon=<f64>
#[instrument(skip(state))]
pub async fn get_weather(
    State(state): State<AppState>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<WeatherRecord>, ApiError> {
    let Query(query) = query?;
    let coordinate = Coordinate::new(query.lat, query.lon)?;
    let record = state.provider.get_weather(coordinate).await?;

    tracing::info!(name = %record.name, temperature = record.temperature, "served weather");
    Ok(Json(record))
}
