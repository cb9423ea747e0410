// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! written to and read from `settings.toml`.
//!
//! # Categories
//!
//! - **Registry**: Capacity of the notification collection
//! - **Notification**: Per-notification defaults
//! - **Timing**: Countdown sampling and exit-transition window

use crate::domain::notifications::{
    exit_transition_bounds, max_notifications_bounds, tick_interval_bounds,
};

// ==========================================================================
// Registry Defaults
// ==========================================================================

/// Default maximum number of Active notifications.
pub const DEFAULT_MAX_NOTIFICATIONS: usize = max_notifications_bounds::DEFAULT;

// ==========================================================================
// Notification Defaults
// ==========================================================================

/// Default auto-dismiss duration in milliseconds (0 = never auto-dismiss).
pub const DEFAULT_DURATION_MS: u64 = 4000;

/// Notifications are dismissible unless configured otherwise.
pub const DEFAULT_DISMISSIBLE: bool = true;

/// The rendering surface pauses countdowns on hover unless configured otherwise.
pub const DEFAULT_PAUSE_ON_HOVER: bool = true;

// ==========================================================================
// Timing Defaults
// ==========================================================================

/// Default countdown sampling interval in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = tick_interval_bounds::DEFAULT_MS;

/// Default exit-transition window in milliseconds.
pub const DEFAULT_EXIT_TRANSITION_MS: u64 = exit_transition_bounds::DEFAULT_MS;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::DEFAULT_DURATION;

    #[test]
    fn duration_default_matches_options_default() {
        assert_eq!(
            u128::from(DEFAULT_DURATION_MS),
            DEFAULT_DURATION.as_millis()
        );
    }

    #[test]
    fn timing_defaults_are_within_bounds() {
        assert!(DEFAULT_TICK_INTERVAL_MS <= tick_interval_bounds::MAX_MS);
        assert_eq!(DEFAULT_EXIT_TRANSITION_MS, 300);
        assert_eq!(DEFAULT_MAX_NOTIFICATIONS, 10);
    }
}
