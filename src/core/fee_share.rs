//! Automation fee share controller
//!
//! After every distribution the share moves one step toward the target
//! cadence: down when the pool was distributed sooner than the target
//! interval, up when later, unchanged on an exact hit. The result is clamped
//! to the configured floor and ceiling.

use tracing::debug;

use crate::config::FeeShareConfig;

/// Fixed-step integral controller for the automation fee share
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeShareController {
    min_share: u32,
    max_share: u32,
    target_interval: u64,
}

impl FeeShareController {
    pub fn new(min_share: u32, max_share: u32, target_interval: u64) -> Self {
        Self {
            min_share: min_share.min(max_share),
            max_share,
            target_interval,
        }
    }

    pub fn from_config(config: &FeeShareConfig) -> Self {
        Self::new(config.min, config.max, config.target_interval_secs)
    }

    pub fn target_interval(&self) -> u64 {
        self.target_interval
    }

    pub fn bounds(&self) -> (u32, u32) {
        (self.min_share, self.max_share)
    }

    /// New share given seconds since the previous distribution
    pub fn adjust(&self, elapsed: u64, current_share: u32) -> u32 {
        let stepped = match elapsed.cmp(&self.target_interval) {
            std::cmp::Ordering::Less => current_share.saturating_sub(1),
            std::cmp::Ordering::Greater => current_share.saturating_add(1),
            std::cmp::Ordering::Equal => current_share,
        };
        let adjusted = stepped.clamp(self.min_share, self.max_share);

        debug!(
            elapsed = elapsed,
            target = self.target_interval,
            from = current_share,
            to = adjusted,
            "Fee share adjusted"
        );
        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: u64 = 4 * 3600;

    fn controller() -> FeeShareController {
        FeeShareController::new(1, 10, TARGET)
    }

    #[test]
    fn test_early_distribution_decrements() {
        assert_eq!(controller().adjust(2 * 3600, 5), 4);
    }

    #[test]
    fn test_late_distribution_increments() {
        assert_eq!(controller().adjust(6 * 3600, 5), 6);
    }

    #[test]
    fn test_on_target_is_unchanged() {
        assert_eq!(controller().adjust(TARGET, 5), 5);
    }

    #[test]
    fn test_saturates_at_floor() {
        assert_eq!(controller().adjust(0, 1), 1);
    }

    #[test]
    fn test_saturates_at_ceiling() {
        assert_eq!(controller().adjust(u64::MAX, 10), 10);
    }

    #[test]
    fn test_out_of_range_share_is_clamped() {
        assert_eq!(controller().adjust(TARGET, 50), 10);
        assert_eq!(controller().adjust(TARGET, 0), 1);
    }

    #[test]
    fn test_from_config_uses_bounds() {
        let controller = FeeShareController::from_config(&FeeShareConfig::default());
        assert_eq!(controller.bounds(), (1, 10));
        assert_eq!(controller.target_interval(), 14_400);
    }

    // =========================================================================
    // Property-based tests (proptest)
    // =========================================================================
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn bounded_walk(
                start in 1u32..=10,
                elapsed in proptest::collection::vec(0u64..(3 * TARGET), 1..50),
            ) {
                let controller = controller();
                let mut share = start;
                for step in elapsed {
                    let next = controller.adjust(step, share);
                    prop_assert!((1..=10).contains(&next));
                    prop_assert!(next.abs_diff(share) <= 1);
                    share = next;
                }
            }
        }
    }
}
