use thiserror::Error;

/// Failures talking to the authority. None of these is ever an acceptance.
#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("verification authority unreachable: {0}")]
    Unreachable(String),

    #[error("verification request failed: {0}")]
    RequestFailed(String),

    #[error("nothing to verify: neither email nor wallet supplied")]
    EmptyRequest,

    #[error("verifier misconfigured: {0}")]
    Config(String),
}

impl VerifierError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "verifier_unreachable",
            Self::RequestFailed(_) => "verifier_request_failed",
            Self::EmptyRequest => "verifier_empty_request",
            Self::Config(_) => "verifier_config",
        }
    }
}
