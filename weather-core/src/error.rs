//! Error kinds surfaced by the weather normalizer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    /// The provider could not be reached, or did not answer in time.
    #[error("weather provider unavailable: {message}")]
    UpstreamUnavailable { message: String, timed_out: bool },

    /// The provider answered, but with a non-success status.
    #[error("weather provider returned status {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    /// The provider payload lacks a field the record requires.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

impl WeatherError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::UpstreamUnavailable { timed_out: true, .. })
    }

    /// Whether the failure originates at the provider rather than in the request.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, Self::InvalidCoordinate(_))
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest includes the full URL in its Display output, which carries the API key.
        let err = err.without_url();
        Self::UpstreamUnavailable {
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}
