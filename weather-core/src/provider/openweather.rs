use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{Coordinate, WeatherError, WeatherRecord};

use super::WeatherProvider;

/// OpenWeatherMap "current weather" endpoint, metric units.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    base_url: String,
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// `timeout` bounds the whole provider call; expiry surfaces as `UpstreamUnavailable`.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            http,
        })
    }

    async fn fetch_current(&self, coordinate: Coordinate) -> Result<OwCurrentResponse, WeatherError> {
        tracing::debug!(%coordinate, "requesting current weather from OpenWeather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("lat", coordinate.latitude.to_string()),
                ("lon", coordinate.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::UpstreamStatus {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| WeatherError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn get_weather(&self, coordinate: Coordinate) -> Result<WeatherRecord, WeatherError> {
        let parsed = self.fetch_current(coordinate).await.inspect_err(|e| {
            tracing::warn!(%coordinate, error = %e, "OpenWeather request failed");
        })?;

        // Coordinates are echoed from the request; the provider's own `coord` is ignored.
        Ok(WeatherRecord {
            name: parsed.name,
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
            humidity: parsed.main.humidity,
            pressure: parsed.main.pressure,
            temperature: parsed.main.temp,
            max_temperature: parsed.main.temp_max,
            min_temperature: parsed.main.temp_min,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: String,
}

/// Prefer the provider's own `message`, else a truncated raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<OwErrorBody>(body) {
        Ok(err) => err.message,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
