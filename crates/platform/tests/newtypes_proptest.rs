//! Property-based tests for the domain newtypes.
//! Verifies invariants hold for ALL inputs, not just fixed examples.
#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use platform::{Millis, TagUid, TrackIndex, VolumeLevel};

proptest::proptest! {
    /// VolumeLevel::new never leaves the 0–30 scale.
    #[test]
    fn volume_level_new_stays_in_scale(raw in 0u8..=255u8) {
        assert!(VolumeLevel::new(raw).get() <= 30);
    }

    /// Offsetting is the clamped sum, whatever the step.
    #[test]
    fn volume_offset_is_clamped_sum(start in 0u8..=30u8, delta in -100i32..=100i32) {
        let expected = (i32::from(start) + delta).clamp(0, 30);
        assert_eq!(i32::from(VolumeLevel::new(start).offset(delta).get()), expected);
    }

    /// try_new and new agree inside the scale.
    #[test]
    fn volume_try_new_matches_new(raw in 0u8..=30u8) {
        assert_eq!(VolumeLevel::try_new(raw), Ok(VolumeLevel::new(raw)));
    }

    /// TrackIndex::new accepts exactly 1–2999.
    #[test]
    fn track_index_accepts_exact_range(raw in 0u16..=u16::MAX) {
        assert_eq!(TrackIndex::new(raw).is_ok(), (1..=2999).contains(&raw));
    }

    /// Elapsed time is exact for any start and any gap below the wrap.
    #[test]
    fn millis_since_inverts_plus(start in 0u32..=u32::MAX, gap in 0u32..=u32::MAX) {
        let from = Millis::from_ticks(start);
        assert_eq!(from.plus(gap).since(from), gap);
    }

    /// Any UID of up to seven bytes keeps exactly its bytes.
    #[test]
    fn tag_uid_keeps_its_bytes(bytes in proptest::collection::vec(0u8..=255u8, 0..=7)) {
        let uid = TagUid::from_slice(&bytes).unwrap();
        assert_eq!(uid.as_bytes(), bytes.as_slice());
        assert_eq!(uid.len(), bytes.len());
    }
}
