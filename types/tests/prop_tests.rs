use proptest::prelude::*;

use pass_types::{Identity, PointCategory, Timestamp};

proptest! {
    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }

    /// Timestamp elapsed_since: elapsed_since(now) = now - self (saturating).
    #[test]
    fn timestamp_elapsed_since(base in 0u64..1_000_000, offset in 0u64..1_000_000) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.elapsed_since(now), offset);
    }

    /// remaining() and has_expired() never disagree.
    #[test]
    fn remaining_agrees_with_has_expired(
        base in 0u64..1_000_000,
        duration in 0u64..1_000_000,
        offset in 0u64..2_000_000,
    ) {
        let t = Timestamp::new(base);
        let now = Timestamp::new(base + offset);
        prop_assert_eq!(t.remaining(duration, now).is_none(), t.has_expired(duration, now));
        if let Some(left) = t.remaining(duration, now) {
            prop_assert_eq!(left, base + duration - (base + offset));
        }
    }

    /// Timestamp bincode serialization roundtrip.
    #[test]
    fn timestamp_bincode_roundtrip(secs in 0u64..u64::MAX) {
        let ts = Timestamp::new(secs);
        let encoded = bincode::serialize(&ts).unwrap();
        let decoded: Timestamp = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, ts);
    }

    /// Any non-blank string is a valid identity and keeps its bytes.
    #[test]
    fn identity_preserves_raw(raw in "[0-9]{1,20}") {
        let id = Identity::new(raw.clone()).unwrap();
        prop_assert_eq!(id.as_str(), raw.as_str());
    }

    /// Every category parses back from both its key and its label.
    #[test]
    fn category_parses_from_key_and_label(idx in 0usize..PointCategory::ALL.len()) {
        let category = PointCategory::ALL[idx];
        prop_assert_eq!(category.key().parse::<PointCategory>().unwrap(), category);
        prop_assert_eq!(category.label().parse::<PointCategory>().unwrap(), category);
    }
}
