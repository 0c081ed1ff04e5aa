//! Identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::PassError;

/// Longest accepted identity, in bytes. Identities are embedded in store
/// keys, which must stay well under LMDB's 511-byte key limit.
pub const MAX_IDENTITY_LEN: usize = 128;

/// Stable external account identifier every record is keyed on.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct Identity(String);

impl Identity {
    /// Create an identity from a raw account id.
    pub fn new(raw: impl Into<String>) -> Result<Self, PassError> {
        let s = raw.into();
        if s.trim().is_empty() {
            return Err(PassError::EmptyIdentity);
        }
        if s.len() > MAX_IDENTITY_LEN {
            return Err(PassError::IdentityTooLong {
                len: s.len(),
                max: MAX_IDENTITY_LEN,
            });
        }
        Ok(Self(s))
    }

    /// Return the raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Identity {
    type Error = PassError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl std::str::FromStr for Identity {
    type Err = PassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// An identity together with the display name it was last seen under.
///
/// Display names are informational only; they are refreshed on every write
/// and never used as keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub identity: Identity,
    pub display_name: String,
}

impl Member {
    pub fn new(identity: Identity, display_name: impl Into<String>) -> Self {
        Self {
            identity,
            display_name: display_name.into(),
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_identity_is_rejected() {
        assert_eq!(Identity::new("  "), Err(PassError::EmptyIdentity));
        assert_eq!(Identity::new(""), Err(PassError::EmptyIdentity));
    }

    #[test]
    fn overlong_identity_is_rejected() {
        let at_limit = "7".repeat(MAX_IDENTITY_LEN);
        assert!(Identity::new(at_limit).is_ok());
        assert_eq!(
            Identity::new("7".repeat(MAX_IDENTITY_LEN + 1)),
            Err(PassError::IdentityTooLong {
                len: MAX_IDENTITY_LEN + 1,
                max: MAX_IDENTITY_LEN
            })
        );
    }

    #[test]
    fn deserialization_enforces_the_same_rules() {
        let long = format!("\"{}\"", "x".repeat(MAX_IDENTITY_LEN + 1));
        assert!(serde_json::from_str::<Identity>(&long).is_err());
        assert!(serde_json::from_str::<Identity>("\"\"").is_err());
        let id: Identity = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn identity_parses_from_str() {
        let id: Identity = "123456789".parse().unwrap();
        assert_eq!(id.as_str(), "123456789");
    }
}
