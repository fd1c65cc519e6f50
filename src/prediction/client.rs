use async_trait::async_trait;

use crate::auth::types::SessionToken;
use crate::features::vector::FeatureVector;
use crate::prediction::classify::{classify, RawReply};
use crate::prediction::types::PredictionOutcome;

pub const NON_FINITE_MESSAGE: &str = "Click position is outside the representable range";

/// Anything that can turn a feature vector into a classified outcome.
/// Implementations never fail: every failure mode is an `Error` outcome.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, vector: &FeatureVector, token: Option<&SessionToken>) -> PredictionOutcome;
}

/// `POST {base}/predict` with the feature vector as JSON and the token as a bearer header.
pub struct PredictionClient {
    predict_url: String,
    client: reqwest::Client,
}

impl PredictionClient {
    pub fn new(predict_url: String, client: reqwest::Client) -> Self {
        Self { predict_url, client }
    }

    async fn exchange(&self, vector: &FeatureVector, token: Option<&SessionToken>) -> RawReply {
        if !vector.is_finite() {
            return RawReply::LocalFailure {
                message: NON_FINITE_MESSAGE.to_string(),
            };
        }

        let mut builder = self
            .client
            .post(&self.predict_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(vector);
        // An absent token still yields a well-formed request; the service rejects it.
        if let Some(token) = token {
            builder = builder.bearer_auth(token.as_str());
        }

        let request = match builder.build() {
            Ok(request) => request,
            Err(e) => {
                return RawReply::LocalFailure {
                    message: e.to_string(),
                }
            }
        };

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(e) if e.is_builder() => {
                return RawReply::LocalFailure {
                    message: e.to_string(),
                }
            }
            Err(e) => {
                return RawReply::NoResponse {
                    detail: e.to_string(),
                }
            }
        };

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::debug!(error = %e, status = status.as_u16(), "response body could not be read");
                return RawReply::NoResponse {
                    detail: e.to_string(),
                };
            }
        };
        let body = serde_json::from_slice::<serde_json::Value>(&bytes).ok();

        RawReply::Received {
            status: status.as_u16(),
            status_text,
            body,
        }
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn predict(&self, vector: &FeatureVector, token: Option<&SessionToken>) -> PredictionOutcome {
        tracing::debug!(
            url = %self.predict_url,
            x = vector.x_location,
            y = vector.y_location,
            authenticated = token.is_some(),
            "sending prediction request"
        );

        let reply = self.exchange(vector, token).await;
        if let RawReply::NoResponse { detail } = &reply {
            tracing::warn!(detail = %detail, "no response from prediction service");
        }

        let outcome = classify(reply);
        tracing::info!(outcome = ?outcome, "prediction classified");
        outcome
    }
}
