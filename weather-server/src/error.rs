use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use weather_core::WeatherError;

/// Wire shape of every non-2xx body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Failures a request can end in, each mapped to a status and a `detail` body.
#[derive(Debug)]
pub enum ApiError {
    Weather(WeatherError),
    /// Missing or unparsable query parameters.
    BadQuery(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadQuery(_) | Self::Weather(WeatherError::InvalidCoordinate(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Weather(WeatherError::UpstreamUnavailable { timed_out: true, .. }) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            Self::Weather(
                WeatherError::UpstreamUnavailable { .. }
                | WeatherError::UpstreamStatus { .. }
                | WeatherError::MalformedResponse(_),
            ) => StatusCode::BAD_GATEWAY,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Weather(err) => err.to_string(),
            Self::BadQuery(msg) => msg.clone(),
        }
    }
}

impl From<WeatherError> for ApiError {
    fn from(err: WeatherError) -> Self {
        Self::Weather(err)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadQuery(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::Weather(err) if err.is_upstream() => {
                tracing::warn!(%status, error = %err, "upstream failure");
            }
            _ => {}
        }

        (status, Json(ErrorBody { detail: self.detail() })).into_response()
    }
}
