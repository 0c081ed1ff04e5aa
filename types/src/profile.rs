//! Independently mutable profile fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::PassError;

/// A profile field guarded by its own cooldown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProfileField {
    Email,
    WalletAddress,
    /// External-account handle (stored without the leading `@`).
    Handle,
}

impl ProfileField {
    pub const ALL: [ProfileField; 3] = [Self::Email, Self::WalletAddress, Self::Handle];

    /// Name recorded in the profile change-log.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::WalletAddress => "Wallet Address",
            Self::Handle => "Handle",
        }
    }

    /// Ledger message attached to the one-time bonus for first setting this field.
    pub fn bonus_message(&self) -> &'static str {
        match self {
            Self::Email => "Profile Email Set",
            Self::WalletAddress => "Profile Wallet Set",
            Self::Handle => "Profile Handle Set",
        }
    }

    /// Stable single-byte tag used in storage keys.
    pub fn tag(&self) -> u8 {
        match self {
            Self::Email => 0,
            Self::WalletAddress => 1,
            Self::Handle => 2,
        }
    }

    /// Whether the identity verifier cross-checks this field.
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Email | Self::WalletAddress)
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileField {
    type Err = PassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "email" => Ok(Self::Email),
            "wallet" | "walletaddress" => Ok(Self::WalletAddress),
            "handle" => Ok(Self::Handle),
            _ => Err(PassError::UnknownField(s.to_string())),
        }
    }
}
