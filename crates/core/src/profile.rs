//! Negotiated profile
//!
//! The collector answers every transmission with a profile number that
//! selects the transmit interval. The value is a single word: the
//! transmission worker is its only writer, the sample loop polls it.

use core::sync::atomic::{AtomicI32, Ordering};

/// Profile in effect at boot
pub const INITIAL_PROFILE: i32 = 1;

/// Interval used for any profile outside 1..=3
pub const DEFAULT_INTERVAL_MS: u64 = 5_000;

/// Transmit interval selected by `profile`
///
/// Total over `i32`: unknown profiles map to [`DEFAULT_INTERVAL_MS`].
pub const fn transmit_interval_ms(profile: i32) -> u64 {
    match profile {
        1 => 1_000,
        2 => 5_000,
        3 => 10_000,
        _ => DEFAULT_INTERVAL_MS,
    }
}

/// Shared profile value, last write wins
#[derive(Debug)]
pub struct ProfileState {
    value: AtomicI32,
}

impl ProfileState {
    /// State holding the boot profile (1)
    pub const fn new() -> Self {
        Self {
            value: AtomicI32::new(INITIAL_PROFILE),
        }
    }

    /// Current profile
    pub fn load(&self) -> i32 {
        self.value.load(Ordering::Acquire)
    }

    /// Publish a profile returned by the collector
    ///
    /// Returns the previous value.
    pub fn publish(&self, profile: i32) -> i32 {
        self.value.swap(profile, Ordering::AcqRel)
    }
}

impl Default for ProfileState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_table() {
        assert_eq!(transmit_interval_ms(1), 1_000);
        assert_eq!(transmit_interval_ms(2), 5_000);
        assert_eq!(transmit_interval_ms(3), 10_000);
    }

    #[test]
    fn test_interval_mapping_is_total() {
        let allowed = [1_000, 5_000, 10_000];
        for profile in [i32::MIN, -3, -1, 0, 4, 17, 1000, i32::MAX] {
            assert_eq!(transmit_interval_ms(profile), DEFAULT_INTERVAL_MS);
        }
        for profile in -100..=100 {
            assert!(allowed.contains(&transmit_interval_ms(profile)));
        }
    }

    #[test]
    fn test_initial_profile() {
        let state = ProfileState::new();
        assert_eq!(state.load(), INITIAL_PROFILE);
    }

    #[test]
    fn test_publish_last_write_wins() {
        let state = ProfileState::new();
        assert_eq!(state.publish(3), 1);
        assert_eq!(state.publish(2), 3);
        assert_eq!(state.load(), 2);
    }
}
