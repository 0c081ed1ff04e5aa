//! Composite key encoding.
//!
//! Identity segments are length-prefixed so that one identity's prefix can
//! never match another identity that merely starts with the same bytes.

use pass_types::{Identity, ProfileField, Timestamp};

/// `Identity` caps its length at `MAX_IDENTITY_LEN`, so the cast is exact.
pub(crate) fn identity_prefix(identity: &Identity) -> Vec<u8> {
    let raw = identity.as_bytes();
    let mut key = Vec::with_capacity(2 + raw.len() + 8);
    key.extend_from_slice(&(raw.len() as u16).to_be_bytes());
    key.extend_from_slice(raw);
    key
}

/// `(identity, ledger_id)` index key.
pub(crate) fn ledger_index_key(identity: &Identity, id: u64) -> Vec<u8> {
    let mut key = identity_prefix(identity);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

pub(crate) fn ledger_id_from_index_key(key: &[u8]) -> Option<u64> {
    let tail = key.len().checked_sub(8)?;
    let bytes: [u8; 8] = key[tail..].try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

/// `(identity, field)` prefix of the profile change-log.
pub(crate) fn change_prefix(identity: &Identity, field: ProfileField) -> Vec<u8> {
    let mut key = identity_prefix(identity);
    key.push(field.tag());
    key
}

/// `(identity, field, changed_at, seq)` change-log key. Big-endian time keeps
/// rows for one field in chronological order.
pub(crate) fn change_key(identity: &Identity, field: ProfileField, at: Timestamp, seq: u64) -> Vec<u8> {
    let mut key = change_prefix(identity, field);
    key.extend_from_slice(&at.as_secs().to_be_bytes());
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    #[test]
    fn prefixes_do_not_collide_across_identities() {
        let short = identity_prefix(&id("12"));
        let long = ledger_index_key(&id("123"), 1);
        assert!(!long.starts_with(&short));
    }

    #[test]
    fn longest_change_key_fits_lmdb() {
        let longest = id(&"9".repeat(pass_types::MAX_IDENTITY_LEN));
        let key = change_key(&longest, ProfileField::WalletAddress, Timestamp::new(u64::MAX), u64::MAX);
        assert!(key.len() <= 511);
        assert_eq!(usize::from(u16::from_be_bytes([key[0], key[1]])), pass_types::MAX_IDENTITY_LEN);
    }

    #[test]
    fn ledger_id_round_trips_through_index_key() {
        let key = ledger_index_key(&id("42"), 9_001);
        assert_eq!(ledger_id_from_index_key(&key), Some(9_001));
    }

    #[test]
    fn change_keys_sort_by_time() {
        let a = change_key(&id("1"), ProfileField::Email, Timestamp::new(5), 9);
        let b = change_key(&id("1"), ProfileField::Email, Timestamp::new(6), 1);
        assert!(a < b);
    }
}
