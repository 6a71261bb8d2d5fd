//! Prediction Client
//!
//! HTTP client for the churn prediction backend. The backend is an opaque
//! service: POST the full customer profile to `/predict`, get back a label
//! and a probability. The base URL is injected at construction — nothing in
//! here reads ambient process state.

use crate::schema::CustomerProfile;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const PREDICT_PATH: &str = "/predict";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30); // Total request timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10); // Connection timeout

/// Classification threshold: strictly above this probability is high-risk
const HIGH_RISK_THRESHOLD: f64 = 50.0;

/// Errors from one prediction round trip. All of them surface to the user
/// as the same generic message; the variants exist for logging.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned status {0}")]
    Status(StatusCode),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Predicted churn direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChurnLabel {
    Churn,
    NotChurn,
}

impl ChurnLabel {
    /// Display text for the result screen
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Churn => "Churn",
            Self::NotChurn => "Not Churn",
        }
    }
}

/// Parsed prediction response. Immutable once received.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub prediction: ChurnLabel,
    /// Churn probability in percent, 0..=100
    pub probability: f64,
}

impl PredictionResult {
    /// High-risk when the churn probability exceeds 50%
    pub fn is_high_risk(&self) -> bool {
        self.probability > HIGH_RISK_THRESHOLD
    }
}

/// Wire shape of the backend response
#[derive(Debug, Deserialize)]
struct PredictResponse {
    prediction: String,
    probability: f64,
}

impl TryFrom<PredictResponse> for PredictionResult {
    type Error = PredictError;

    fn try_from(raw: PredictResponse) -> Result<Self, Self::Error> {
        let prediction = match raw.prediction.as_str() {
            "Yes" => ChurnLabel::Churn,
            "No" => ChurnLabel::NotChurn,
            other => {
                return Err(PredictError::Malformed(format!(
                    "unexpected prediction label: {:?}",
                    other
                )));
            }
        };
        Ok(Self {
            prediction,
            probability: raw.probability,
        })
    }
}

/// Client for the prediction backend
#[derive(Debug, Clone)]
pub struct PredictionClient {
    base_url: String,
    client: Client,
}

impl PredictionClient {
    /// Create a client for the given base URL with the default timeouts
    pub fn new(base_url: impl Into<String>) -> Result<Self, PredictError> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create with a custom HTTP client
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn predict_url(&self) -> String {
        format!("{}{}", self.base_url, PREDICT_PATH)
    }

    /// One prediction round trip. Exactly one request per call; non-2xx and
    /// unparseable bodies are errors.
    pub async fn predict(
        &self,
        profile: &CustomerProfile,
    ) -> Result<PredictionResult, PredictError> {
        let url = self.predict_url();
        tracing::debug!(%url, "sending prediction request");

        let response = self.client.post(&url).json(profile).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::Status(status));
        }

        let raw: PredictResponse = response
            .json()
            .await
            .map_err(|e| PredictError::Malformed(e.to_string()))?;
        let result = PredictionResult::try_from(raw)?;
        tracing::info!(
            prediction = result.prediction.as_str(),
            probability = result.probability,
            "prediction received"
        );
        Ok(result)
    }
}
