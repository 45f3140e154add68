//! Bounded wait for a tag during interactive write/read.
//!
//! Each attempt is one `poll_tag` with the per-attempt timeout, so the reader
//! itself provides the pacing. A transceiver error counts as a missed attempt.

use platform::log::{self, Dbg};
use platform::{TagReadResult, TagReader, TagUid};

/// No tag answered within the retry budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("no tag detected after {attempts} attempts")]
pub struct TimeoutError {
    /// Attempts made before giving up.
    pub attempts: u16,
}

/// How long to wait for a tag to be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryPolicy {
    /// Number of poll attempts.
    pub attempts: u16,
    /// Timeout handed to each `poll_tag` call.
    pub per_attempt_timeout_ms: u32,
}

impl RetryPolicy {
    /// 50 attempts of 200 ms each.
    pub const DEFAULT: Self = Self {
        attempts: 50,
        per_attempt_timeout_ms: 200,
    };

    /// Longest time a caller can be stalled by [`wait_for_tag`].
    pub const fn worst_case_ms(&self) -> u32 {
        (self.attempts as u32).saturating_mul(self.per_attempt_timeout_ms)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Poll until a tag answers or the policy is exhausted.
///
/// # Errors
///
/// [`TimeoutError`] when no attempt saw a tag.
pub async fn wait_for_tag<R: TagReader>(
    reader: &mut R,
    policy: RetryPolicy,
) -> Result<TagUid, TimeoutError> {
    for attempt in 0..policy.attempts {
        match reader.poll_tag(policy.per_attempt_timeout_ms).await {
            Ok(TagReadResult::Present(uid)) => return Ok(uid),
            Ok(TagReadResult::NoTag) => {}
            Err(e) => {
                log::debug!("poll attempt {} failed: {}", attempt, Dbg(&e));
            }
        }
    }
    Err(TimeoutError {
        attempts: policy.attempts,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::MockTagReader;

    const UID: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

    #[test]
    fn test_default_worst_case_is_ten_seconds() {
        assert_eq!(RetryPolicy::default().worst_case_ms(), 10_000);
    }

    #[test]
    fn test_worst_case_saturates() {
        let policy = RetryPolicy {
            attempts: u16::MAX,
            per_attempt_timeout_ms: u32::MAX,
        };
        assert_eq!(policy.worst_case_ms(), u32::MAX);
    }

    #[tokio::test]
    async fn test_empty_field_times_out_after_all_attempts() {
        let mut reader = MockTagReader::new();
        let err = wait_for_tag(&mut reader, RetryPolicy::DEFAULT)
            .await
            .unwrap_err();
        assert_eq!(err.attempts, 50);
        assert_eq!(reader.poll_count(), 50);
    }

    #[tokio::test]
    async fn test_tag_found_after_misses() {
        let mut reader = MockTagReader::new();
        reader.add_tag(&UID, [0; 4]).unwrap();
        reader.place(&UID);
        reader.miss_next_polls(10);
        let uid = wait_for_tag(&mut reader, RetryPolicy::DEFAULT).await.unwrap();
        assert_eq!(uid.as_bytes(), &UID);
        assert_eq!(reader.poll_count(), 11);
    }

    #[tokio::test]
    async fn test_io_errors_count_as_attempts() {
        let mut reader = MockTagReader::new();
        reader.add_tag(&UID, [0; 4]).unwrap();
        reader.place(&UID);
        reader.fail_next_polls(3);
        let policy = RetryPolicy {
            attempts: 3,
            per_attempt_timeout_ms: 200,
        };
        assert!(wait_for_tag(&mut reader, policy).await.is_err());
        assert!(wait_for_tag(&mut reader, policy).await.is_ok());
    }
}
