//! JSON contract of the verification authority.
//!
//! `POST {endpoint}` with a [`VerificationRequest`] body; the authority answers
//! with a [`UserCheckResponse`]. Every object inside `data` is optional: the
//! authority omits the objects for values that were not submitted.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
}

impl VerificationRequest {
    /// Build a request, dropping blank values.
    pub fn new(email: Option<&str>, wallet_address: Option<&str>) -> Self {
        let keep = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            email: keep(email),
            wallet_address: keep(wallet_address),
        }
    }

    pub fn has_email(&self) -> bool {
        self.email.is_some()
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet_address.is_some()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_email() && !self.has_wallet()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCheckResponse {
    #[serde(default)]
    pub data: Option<UserCheckData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCheckData {
    #[serde(default)]
    pub verified_email: Option<VerifiedEmail>,
    #[serde(default)]
    pub verified_wallet_address: Option<VerifiedWallet>,
    #[serde(default)]
    pub match_status: Option<MatchStatus>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedEmail {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_pass_email: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedWallet {
    #[serde(default)]
    pub wallet_address: String,
    #[serde(default)]
    pub is_pass_wallet_address: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStatus {
    #[serde(default)]
    pub is_email_match_with_wallet_address: bool,
}
