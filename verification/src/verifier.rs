//! The verifier seam.

use std::future::Future;
use std::sync::Arc;

use crate::config::VerifierConfig;
use crate::debug::DebugVerifier;
use crate::error::VerifierError;
use crate::http::HttpVerifier;
use crate::outcome::VerificationOutcome;
use crate::wire::VerificationRequest;

/// Anything that can answer "are these values known, and do they belong
/// together?".
pub trait IdentityVerifier: Send + Sync {
    fn verify(
        &self,
        request: &VerificationRequest,
    ) -> impl Future<Output = Result<VerificationOutcome, VerifierError>> + Send;
}

impl<V: IdentityVerifier> IdentityVerifier for Arc<V> {
    fn verify(
        &self,
        request: &VerificationRequest,
    ) -> impl Future<Output = Result<VerificationOutcome, VerifierError>> + Send {
        (**self).verify(request)
    }
}

/// The verifier selected by configuration.
pub enum AuthorityVerifier {
    Http(HttpVerifier),
    Debug(DebugVerifier),
}

impl AuthorityVerifier {
    pub fn from_config(config: &VerifierConfig) -> Result<Self, VerifierError> {
        if config.is_debug() {
            tracing::warn!("verification authority set to debug; outcomes are randomized");
            Ok(Self::Debug(DebugVerifier::new()))
        } else {
            Ok(Self::Http(HttpVerifier::new(config)?))
        }
    }
}

impl IdentityVerifier for AuthorityVerifier {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerificationOutcome, VerifierError> {
        match self {
            Self::Http(v) => v.verify(request).await,
            Self::Debug(v) => v.verify(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_endpoint_selects_stub() {
        let verifier = AuthorityVerifier::from_config(&VerifierConfig::default()).unwrap();
        assert!(matches!(verifier, AuthorityVerifier::Debug(_)));
    }

    #[test]
    fn url_endpoint_selects_http_client() {
        let config = VerifierConfig {
            endpoint: "http://127.0.0.1:9/check".into(),
            api_key: "k".into(),
            ..VerifierConfig::default()
        };
        let verifier = AuthorityVerifier::from_config(&config).unwrap();
        assert!(matches!(verifier, AuthorityVerifier::Http(_)));
    }
}
