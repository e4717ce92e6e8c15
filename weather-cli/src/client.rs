use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::Deserialize;
use weather_core::{ClientConfig, Coordinate, WeatherRecord};

/// Thin client for the proxy's `GET /weather` endpoint.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    base_url: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

impl ProxyClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: config.server_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub async fn weather(&self, coordinate: Coordinate) -> Result<WeatherRecord> {
        let url = format!("{}/weather", self.base_url);
        tracing::debug!(%url, %coordinate, "querying weather proxy");

        let res = self
            .http
            .get(&url)
            .query(&[("lat", coordinate.latitude), ("lon", coordinate.longitude)])
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to reach the weather proxy at {}.\n\
                     Hint: is `weather-server` running?",
                    self.base_url
                )
            })?;

        let status = res.status();
        let body = res.text().await.context("Failed to read weather proxy response")?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.detail)
                .unwrap_or(body);
            return Err(anyhow!("Weather proxy returned {status}: {detail}"));
        }

        serde_json::from_str(&body).context("Failed to parse weather proxy response")
    }
}
