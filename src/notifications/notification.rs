// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! This module defines the `Notification` entry and the small enums
//! (`Category`, `Position`, `Phase`) that describe it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Unique identifier for a notification.
///
/// Identifiers are either supplied by the caller or generated by the
/// registry (`toast-1`, `toast-2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    /// Creates an identifier from any string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn generated(counter: u64) -> Self {
        Self(format!("toast-{counter}"))
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for NotificationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Semantic tag of a notification.
///
/// The category has no effect on the registry; it is carried for the
/// rendering surface (icon, accent color).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Operation completed successfully.
    Success,
    /// Error requiring attention.
    Error,
    /// Warning that doesn't block operation.
    Warning,
    /// Informational message.
    #[default]
    Info,
}

/// Screen zone a notification is displayed in.
///
/// Positions partition notifications into display groups only. Capacity
/// eviction is global across all positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    TopLeft,
    TopCenter,
    #[default]
    TopRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Position {
    /// All positions, in display-zone order.
    pub const ALL: [Position; 6] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// Returns true for the three top zones.
    #[must_use]
    pub fn is_top(self) -> bool {
        matches!(
            self,
            Position::TopLeft | Position::TopCenter | Position::TopRight
        )
    }
}

/// Lifecycle phase of an entry that is still in the collection.
///
/// `Removed` is not represented: removed entries leave the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Countdown running or paused.
    Active,
    /// Removal decided, exit-transition window open.
    Exiting,
}

/// Why an entry left the Active phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitReason {
    /// Manual dismissal or programmatic `remove`.
    Dismissed,
    /// Countdown reached zero.
    Expired,
    /// Oldest Active entry pushed out by capacity.
    Evicted,
}

/// A notification held by the registry.
///
/// Consumers only ever see clones of this type inside a
/// [`Snapshot`](super::Snapshot); the registry is the single writer.
#[derive(Debug, Clone)]
pub struct Notification<M = String> {
    pub(crate) id: NotificationId,
    pub(crate) message: M,
    pub(crate) category: Category,
    pub(crate) auto_dismiss: Option<Duration>,
    pub(crate) remaining: Duration,
    pub(crate) paused: bool,
    pub(crate) dismissible: bool,
    pub(crate) pause_on_hover: bool,
    pub(crate) position: Position,
    pub(crate) created_at: Instant,
    pub(crate) sequence: u64,
    pub(crate) phase: Phase,
}

impl<M> Notification<M> {
    /// Returns the notification's unique ID.
    #[must_use]
    pub fn id(&self) -> &NotificationId {
        &self.id
    }

    /// Returns the display payload.
    #[must_use]
    pub fn message(&self) -> &M {
        &self.message
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the configured auto-dismiss duration.
    /// Returns `None` for notifications that never auto-dismiss.
    #[must_use]
    pub fn auto_dismiss(&self) -> Option<Duration> {
        self.auto_dismiss
    }

    /// Returns the time left on the countdown.
    ///
    /// Always zero for notifications without auto-dismiss.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Returns the countdown progress in `0.0..=1.0` (1.0 = full time left).
    ///
    /// Useful for progress bars. Persistent notifications report 1.0.
    #[must_use]
    pub fn progress(&self) -> f32 {
        match self.auto_dismiss {
            Some(total) if !total.is_zero() => {
                (self.remaining.as_secs_f32() / total.as_secs_f32()).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    /// Returns whether the countdown is currently paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns whether the user may dismiss this notification.
    #[must_use]
    pub fn is_dismissible(&self) -> bool {
        self.dismissible
    }

    /// Returns whether the rendering surface should pause on hover.
    #[must_use]
    pub fn pause_on_hover(&self) -> bool {
        self.pause_on_hover
    }

    /// Returns the display zone.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns when this notification was created.
    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Returns the insertion sequence number (monotonic per registry).
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Returns the lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns true while the entry is Active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Returns true while the exit-transition window is open.
    #[must_use]
    pub fn is_exiting(&self) -> bool {
        self.phase == Phase::Exiting
    }

    /// Returns true if a countdown can remove this notification.
    #[must_use]
    pub fn has_countdown(&self) -> bool {
        self.auto_dismiss.is_some()
    }
}
