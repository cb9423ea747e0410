// SPDX-License-Identifier: MPL-2.0
//! Per-call notification options and the registry defaults they merge onto.

use super::notification::{Category, NotificationId, Position};
use std::time::Duration;

/// Default auto-dismiss duration (4 seconds).
pub const DEFAULT_DURATION: Duration = Duration::from_millis(4000);

/// Registry-wide defaults applied under every [`NotificationOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Defaults {
    /// Category used when the call doesn't set one.
    pub category: Category,
    /// Auto-dismiss duration; `Duration::ZERO` means "never auto-dismiss".
    pub duration: Duration,
    /// Whether the user may dismiss notifications.
    pub dismissible: bool,
    /// Whether the rendering surface pauses the countdown on hover.
    pub pause_on_hover: bool,
    /// Display zone.
    pub position: Position,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            category: Category::Info,
            duration: DEFAULT_DURATION,
            dismissible: true,
            pause_on_hover: true,
            position: Position::TopRight,
        }
    }
}

/// Options for a single `add` call.
///
/// Unset fields fall back to the registry [`Defaults`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use toast_registry::notifications::{Category, NotificationOptions, Position};
///
/// let options = NotificationOptions::new()
///     .category(Category::Warning)
///     .duration(Duration::from_secs(8))
///     .position(Position::BottomCenter);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationOptions {
    pub id: Option<NotificationId>,
    pub category: Option<Category>,
    pub duration: Option<Duration>,
    pub dismissible: Option<bool>,
    pub pause_on_hover: Option<bool>,
    pub position: Option<Position>,
}

impl NotificationOptions {
    /// Creates empty options (everything from the defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a caller-supplied identifier instead of a generated one.
    #[must_use]
    pub fn id(mut self, id: impl Into<NotificationId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Sets the auto-dismiss duration. `Duration::ZERO` disables auto-dismiss.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Disables auto-dismiss.
    #[must_use]
    pub fn persistent(self) -> Self {
        self.duration(Duration::ZERO)
    }

    #[must_use]
    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = Some(dismissible);
        self
    }

    #[must_use]
    pub fn pause_on_hover(mut self, pause_on_hover: bool) -> Self {
        self.pause_on_hover = Some(pause_on_hover);
        self
    }

    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Merges these options over `defaults`.
    ///
    /// An empty caller id is treated as absent.
    pub(crate) fn resolve(self, defaults: &Defaults) -> Resolved {
        let duration = self.duration.unwrap_or(defaults.duration);
        Resolved {
            id: self.id.filter(|id| !id.as_str().is_empty()),
            category: self.category.unwrap_or(defaults.category),
            auto_dismiss: (!duration.is_zero()).then_some(duration),
            dismissible: self.dismissible.unwrap_or(defaults.dismissible),
            pause_on_hover: self.pause_on_hover.unwrap_or(defaults.pause_on_hover),
            position: self.position.unwrap_or(defaults.position),
        }
    }
}

impl From<Category> for NotificationOptions {
    fn from(category: Category) -> Self {
        Self::new().category(category)
    }
}

/// Options after merging with the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolved {
    pub id: Option<NotificationId>,
    pub category: Category,
    pub auto_dismiss: Option<Duration>,
    pub dismissible: bool,
    pub pause_on_hover: bool,
    pub position: Position,
}
