//! HTTP client for the verification authority.

use std::time::Duration;

use reqwest::header::ACCEPT;

use crate::classify::classify;
use crate::config::VerifierConfig;
use crate::error::VerifierError;
use crate::outcome::VerificationOutcome;
use crate::verifier::IdentityVerifier;
use crate::wire::{UserCheckResponse, VerificationRequest};

const API_KEY_HEADER: &str = "X-API-KEY";

/// Sends `POST {endpoint}` with the request as JSON and classifies the answer.
pub struct HttpVerifier {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpVerifier {
    pub fn new(config: &VerifierConfig) -> Result<Self, VerifierError> {
        if config.endpoint.trim().is_empty() {
            return Err(VerifierError::Config("endpoint is empty".into()));
        }
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| VerifierError::Config(e.to_string()))?;
        Ok(Self {
            http_client,
            endpoint: config.endpoint.trim().to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

impl IdentityVerifier for HttpVerifier {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerificationOutcome, VerifierError> {
        if request.is_empty() {
            return Err(VerifierError::EmptyRequest);
        }

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VerifierError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    VerifierError::Unreachable(format!("connection failed: {e}"))
                } else {
                    VerifierError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(VerifierError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| VerifierError::RequestFailed(format!("failed to read body: {e}")))?;

        // `null` and garbage both classify as an empty response.
        let parsed = match serde_json::from_str::<Option<UserCheckResponse>>(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable verification response");
                None
            }
        };

        let outcome = classify(request, parsed.as_ref());
        tracing::debug!(outcome = outcome.code(), "verification authority answered");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_endpoint_is_rejected() {
        let config = VerifierConfig {
            endpoint: "  ".into(),
            ..VerifierConfig::default()
        };
        assert!(matches!(HttpVerifier::new(&config), Err(VerifierError::Config(_))));
    }

    #[tokio::test]
    async fn empty_request_is_not_sent() {
        let config = VerifierConfig {
            endpoint: "http://127.0.0.1:9/check".into(),
            ..VerifierConfig::default()
        };
        let verifier = HttpVerifier::new(&config).unwrap();
        let result = verifier.verify(&VerificationRequest::default()).await;
        assert!(matches!(result, Err(VerifierError::EmptyRequest)));
    }

    #[tokio::test]
    async fn unreachable_authority_is_an_error_not_an_outcome() {
        let config = VerifierConfig {
            // Port 9 (discard) is closed on test machines.
            endpoint: "http://127.0.0.1:9/check".into(),
            timeout_secs: 2,
            connect_timeout_secs: 1,
            ..VerifierConfig::default()
        };
        let verifier = HttpVerifier::new(&config).unwrap();
        let result = verifier
            .verify(&VerificationRequest::new(Some("a@b.io"), None))
            .await;
        assert!(result.is_err());
    }
}
