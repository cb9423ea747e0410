// SPDX-License-Identifier: MPL-2.0
//! Notification registry newtypes.
//!
//! This module provides type-safe wrappers for registry tuning values,
//! ensuring they are always within valid ranges.

use std::time::Duration;

// =============================================================================
// Bounds
// =============================================================================

/// Registry capacity bounds (1 to 1000 Active notifications).
pub mod max_notifications_bounds {
    /// Minimum capacity.
    pub const MIN: usize = 1;
    /// Maximum capacity.
    pub const MAX: usize = 1000;
    /// Default capacity.
    pub const DEFAULT: usize = 10;
}

/// Countdown sampling interval bounds in milliseconds (10 to 100 ms).
///
/// The upper bound keeps progress indicators smooth; the lower bound keeps
/// the per-notification wake rate sane.
pub mod tick_interval_bounds {
    /// Minimum interval in milliseconds.
    pub const MIN_MS: u64 = 10;
    /// Maximum interval in milliseconds.
    pub const MAX_MS: u64 = 100;
    /// Default interval in milliseconds.
    pub const DEFAULT_MS: u64 = 100;
}

/// Exit-transition window bounds in milliseconds (0 to 5000 ms).
pub mod exit_transition_bounds {
    /// Minimum window in milliseconds (instant removal).
    pub const MIN_MS: u64 = 0;
    /// Maximum window in milliseconds.
    pub const MAX_MS: u64 = 5000;
    /// Default window in milliseconds.
    pub const DEFAULT_MS: u64 = 300;
}

// =============================================================================
// MaxNotifications
// =============================================================================

/// Maximum number of Active notifications held by a registry.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (1–1000).
///
/// # Example
///
/// ```
/// use toast_registry::domain::notifications::MaxNotifications;
///
/// assert_eq!(MaxNotifications::new(3).value(), 3);
/// // Zero is clamped up, a registry always holds at least one entry
/// assert_eq!(MaxNotifications::new(0).value(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxNotifications(usize);

impl MaxNotifications {
    /// Creates a new capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(max_notifications_bounds::MIN, max_notifications_bounds::MAX))
    }

    /// Returns the value as usize.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for MaxNotifications {
    fn default() -> Self {
        Self(max_notifications_bounds::DEFAULT)
    }
}

// =============================================================================
// TickInterval
// =============================================================================

/// Sampling interval of a notification countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInterval(u64);

impl TickInterval {
    /// Creates a new interval from milliseconds, clamping to valid range.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.clamp(tick_interval_bounds::MIN_MS, tick_interval_bounds::MAX_MS))
    }

    /// Returns the interval in milliseconds.
    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Returns the interval as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }
}

impl Default for TickInterval {
    fn default() -> Self {
        Self(tick_interval_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// ExitTransition
// =============================================================================

/// Time an entry stays in the Exiting phase before it is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitTransition(u64);

impl ExitTransition {
    /// Creates a new window from milliseconds, clamping to valid range.
    #[must_use]
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.clamp(exit_transition_bounds::MIN_MS, exit_transition_bounds::MAX_MS))
    }

    /// Returns the window in milliseconds.
    #[must_use]
    pub fn as_millis(self) -> u64 {
        self.0
    }

    /// Returns the window as a Duration.
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Returns true if entries are removed without a visible transition.
    #[must_use]
    pub fn is_instant(self) -> bool {
        self.0 == 0
    }
}

impl Default for ExitTransition {
    fn default() -> Self {
        Self(exit_transition_bounds::DEFAULT_MS)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_notifications_clamps() {
        assert_eq!(MaxNotifications::new(0).value(), max_notifications_bounds::MIN);
        assert_eq!(
            MaxNotifications::new(usize::MAX).value(),
            max_notifications_bounds::MAX
        );
    }

    #[test]
    fn max_notifications_default() {
        assert_eq!(
            MaxNotifications::default().value(),
            max_notifications_bounds::DEFAULT
        );
    }

    #[test]
    fn tick_interval_never_exceeds_hundred_ms() {
        assert_eq!(TickInterval::from_millis(250).as_millis(), 100);
        assert_eq!(TickInterval::from_millis(1).as_millis(), 10);
        assert_eq!(TickInterval::from_millis(50).as_duration(), Duration::from_millis(50));
    }

    #[test]
    fn exit_transition_defaults_to_three_hundred_ms() {
        assert_eq!(ExitTransition::default().as_millis(), 300);
        assert!(!ExitTransition::default().is_instant());
        assert!(ExitTransition::from_millis(0).is_instant());
        assert_eq!(ExitTransition::from_millis(60_000).as_millis(), 5000);
    }
}
