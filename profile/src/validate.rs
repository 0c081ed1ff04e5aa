//! Field format rules.

use std::sync::LazyLock;

use pass_types::ProfileField;
use regex::Regex;

use crate::error::ProfileError;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid"));

static HANDLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{1,15}$").expect("handle regex is valid"));

const WALLET_HEX_LEN: usize = 40;

/// Trim and validate a candidate value, returning the form that is stored.
///
/// Handles lose their leading `@`. Nothing here touches the network.
pub fn normalize(field: ProfileField, raw: &str) -> Result<String, ProfileError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ProfileError::MissingValue(field));
    }
    let invalid = || ProfileError::InvalidFormat {
        field,
        value: value.to_string(),
    };

    match field {
        ProfileField::Email => {
            if !EMAIL_REGEX.is_match(value) {
                return Err(invalid());
            }
            Ok(value.to_string())
        }
        ProfileField::WalletAddress => {
            let digits = value.strip_prefix("0x").ok_or_else(invalid)?;
            if digits.len() != WALLET_HEX_LEN || hex::decode(digits).is_err() {
                return Err(invalid());
            }
            Ok(value.to_string())
        }
        ProfileField::Handle => {
            let handle = value.strip_prefix('@').unwrap_or(value);
            if !HANDLE_REGEX.is_match(handle) {
                return Err(invalid());
            }
            Ok(handle.to_string())
        }
    }
}
