// SPDX-License-Identifier: MPL-2.0
//! Diagnostic event types for notification lifecycle tracking.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::notifications::{Category, ExitReason, NotificationId, Position};

/// A single diagnostic event with its timestamp.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    /// When the event occurred, on the same tokio clock the registry samples
    pub timestamp: Instant,
    /// The type and data of the event
    pub kind: DiagnosticEventKind,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event with the current timestamp.
    #[must_use]
    pub fn new(kind: DiagnosticEventKind) -> Self {
        Self {
            timestamp: Instant::now(),
            kind,
        }
    }

    /// Creates a new diagnostic event with a specific timestamp.
    #[must_use]
    pub fn with_timestamp(kind: DiagnosticEventKind, timestamp: Instant) -> Self {
        Self { timestamp, kind }
    }
}

/// What happened to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DiagnosticEventKind {
    /// A notification entered the registry.
    Added {
        id: NotificationId,
        category: Category,
        position: Position,
        /// Auto-dismiss duration, `None` for persistent notifications.
        #[serde(skip_serializing_if = "Option::is_none")]
        auto_dismiss_ms: Option<u64>,
    },

    /// A caller id was reused and the Active entry replaced in place.
    Updated { id: NotificationId },

    /// Message payload replaced through `update`, countdown untouched.
    PayloadUpdated { id: NotificationId },

    /// Countdown paused or resumed.
    PauseChanged { id: NotificationId, paused: bool },

    /// Exit-transition window opened.
    Exiting {
        id: NotificationId,
        reason: ExitReason,
    },

    /// Entry left the collection.
    Removed { id: NotificationId },

    /// `clear` dropped every entry at once.
    Cleared { count: usize },

    /// The toaster was shut down.
    Closed,
}

impl DiagnosticEventKind {
    /// Returns the notification this event refers to, if any.
    #[must_use]
    pub fn notification_id(&self) -> Option<&NotificationId> {
        match self {
            DiagnosticEventKind::Added { id, .. }
            | DiagnosticEventKind::Updated { id }
            | DiagnosticEventKind::PayloadUpdated { id }
            | DiagnosticEventKind::PauseChanged { id, .. }
            | DiagnosticEventKind::Exiting { id, .. }
            | DiagnosticEventKind::Removed { id } => Some(id),
            DiagnosticEventKind::Cleared { .. } | DiagnosticEventKind::Closed => None,
        }
    }
}
