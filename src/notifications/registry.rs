// SPDX-License-Identifier: MPL-2.0
//! Notification lifecycle state machine.
//!
//! The `Registry` owns the ordered collection of notifications and applies
//! every transition (`Active → Exiting → Removed`). It never sleeps and
//! never spawns: callers pass the current instant and receive the list of
//! [`Change`]s they have to act on (arm or cancel timers, notify
//! subscribers). [`Toaster`](super::Toaster) is the asynchronous driver
//! built on top of it.

use super::notification::{ExitReason, Notification, NotificationId, Phase};
use super::options::{Defaults, NotificationOptions, Resolved};
use crate::domain::notifications::{MaxNotifications, TickInterval};
use std::time::Duration;
use tokio::time::Instant;

/// Construction-time configuration of a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Maximum number of Active notifications.
    pub max_notifications: MaxNotifications,
    /// Countdown sampling interval.
    pub tick_interval: TickInterval,
    /// Defaults merged under every call's options.
    pub defaults: Defaults,
}

/// A lifecycle transition produced by a registry operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// A new entry was appended.
    Added(NotificationId),
    /// An Active entry was replaced in place (caller id reused).
    Updated(NotificationId),
    /// An entry entered its exit-transition window.
    Exiting {
        id: NotificationId,
        reason: ExitReason,
    },
    /// An entry left the collection.
    Removed(NotificationId),
}

impl Change {
    /// Returns the identifier the change refers to.
    #[must_use]
    pub fn id(&self) -> &NotificationId {
        match self {
            Change::Added(id) | Change::Updated(id) | Change::Removed(id) => id,
            Change::Exiting { id, .. } => id,
        }
    }
}

/// Outcome of a countdown wake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// Time was charged; wake again after `next_wake`.
    Running { next_wake: Duration },
    /// Paused; nothing was charged.
    Paused,
    /// Remaining time reached zero; the entry is now Exiting.
    Expired,
    /// Unknown id, Exiting entry, or no auto-dismiss. The timer should stop.
    Inactive,
}

#[derive(Debug, Clone)]
struct Entry<M> {
    notification: Notification<M>,
    /// Instant the countdown was last charged up to.
    last_sample: Instant,
}

impl<M> Entry<M> {
    /// Charges the wall-clock time elapsed since the last sample.
    fn settle(&mut self, now: Instant) {
        if self.notification.auto_dismiss.is_some() {
            let elapsed = now.saturating_duration_since(self.last_sample);
            self.notification.remaining = self.notification.remaining.saturating_sub(elapsed);
        }
        self.last_sample = now;
    }
}

/// Ordered, bounded collection of notifications.
#[derive(Debug, Clone)]
pub struct Registry<M = String> {
    entries: Vec<Entry<M>>,
    config: RegistryConfig,
    next_id: u64,
    next_sequence: u64,
}

impl<M> Default for Registry<M> {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl<M> Registry<M> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            entries: Vec::new(),
            config,
            next_id: 0,
            next_sequence: 0,
        }
    }

    /// Returns the construction-time configuration.
    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Appends a notification and enforces capacity.
    ///
    /// Returns the identifier synchronously together with every change the
    /// call caused. When the Active count exceeds the maximum, the oldest
    /// Active entries move to Exiting with [`ExitReason::Evicted`]; `add`
    /// never fails and never queues.
    ///
    /// A caller id that names an Active entry replaces that entry in place
    /// (same slot, countdown restarted). A caller id that names an Exiting
    /// entry removes it at once so the id stays unique.
    pub fn add(
        &mut self,
        message: M,
        options: NotificationOptions,
        now: Instant,
    ) -> (NotificationId, Vec<Change>) {
        let resolved = options.resolve(&self.config.defaults);
        let mut changes = Vec::new();

        let id = match resolved.id.clone() {
            Some(id) => id,
            None => self.generate_id(),
        };

        if let Some(index) = self.index_of(&id) {
            if self.entries[index].notification.is_active() {
                let entry = &mut self.entries[index];
                entry.notification.message = message;
                apply(&mut entry.notification, &resolved);
                entry.last_sample = now;
                changes.push(Change::Updated(id.clone()));
                return (id, changes);
            }
            self.entries.remove(index);
            changes.push(Change::Removed(id.clone()));
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let mut notification = Notification {
            id: id.clone(),
            message,
            category: resolved.category,
            auto_dismiss: None,
            remaining: Duration::ZERO,
            paused: false,
            dismissible: resolved.dismissible,
            pause_on_hover: resolved.pause_on_hover,
            position: resolved.position,
            created_at: now,
            sequence,
            phase: Phase::Active,
        };
        apply(&mut notification, &resolved);
        self.entries.push(Entry {
            notification,
            last_sample: now,
        });
        changes.push(Change::Added(id.clone()));

        changes.extend(self.enforce_capacity());
        (id, changes)
    }

    /// Starts the exit transition of an Active entry.
    ///
    /// No-op for unknown ids and for entries already Exiting, so calling it
    /// twice has the same effect as calling it once.
    pub fn remove(&mut self, id: &NotificationId) -> Option<Change> {
        self.begin_exit(id, ExitReason::Dismissed)
    }

    /// User-initiated dismissal; like [`remove`](Self::remove) but ignored
    /// for entries that are not dismissible.
    pub fn dismiss(&mut self, id: &NotificationId) -> Option<Change> {
        let dismissible = self
            .get(id)
            .is_some_and(|notification| notification.dismissible);
        if dismissible {
            self.remove(id)
        } else {
            None
        }
    }

    /// Starts the exit transition of every Active entry.
    pub fn dismiss_all(&mut self) -> Vec<Change> {
        self.entries
            .iter_mut()
            .filter(|entry| entry.notification.is_active())
            .map(|entry| {
                entry.notification.phase = Phase::Exiting;
                Change::Exiting {
                    id: entry.notification.id.clone(),
                    reason: ExitReason::Dismissed,
                }
            })
            .collect()
    }

    /// Removes every entry immediately, skipping the exit window.
    pub fn clear(&mut self) -> Vec<Change> {
        self.entries
            .drain(..)
            .map(|entry| Change::Removed(entry.notification.id))
            .collect()
    }

    /// Pauses or resumes the countdown of an Active entry.
    ///
    /// Pausing charges the time elapsed since the last sample, so the
    /// remaining time is exact at the moment of the pause. Resuming restarts
    /// the sample clock, so the paused interval is never charged.
    ///
    /// Returns `true` if the state changed. Unknown ids, Exiting entries
    /// and requests for the current state are ignored.
    pub fn pause(&mut self, id: &NotificationId, paused: bool, now: Instant) -> bool {
        let Some(entry) = self.entry_mut(id) else {
            return false;
        };
        if !entry.notification.is_active() || entry.notification.paused == paused {
            return false;
        }
        if paused {
            entry.settle(now);
        } else {
            entry.last_sample = now;
        }
        entry.notification.paused = paused;
        true
    }

    /// Applies [`pause`](Self::pause) to every Active entry.
    ///
    /// Returns the identifiers whose state changed.
    pub fn pause_all(&mut self, paused: bool, now: Instant) -> Vec<NotificationId> {
        let ids: Vec<NotificationId> = self
            .entries
            .iter()
            .filter(|entry| entry.notification.is_active())
            .map(|entry| entry.notification.id.clone())
            .collect();
        ids.into_iter()
            .filter(|id| self.pause(id, paused, now))
            .collect()
    }

    /// Replaces the payload of an Active entry, keeping its countdown.
    pub fn update(&mut self, id: &NotificationId, message: M) -> bool {
        match self.entry_mut(id) {
            Some(entry) if entry.notification.is_active() => {
                entry.notification.message = message;
                true
            }
            _ => false,
        }
    }

    /// Countdown wake for `id`.
    ///
    /// Charges the wall-clock time elapsed since the previous sample. While
    /// paused nothing is charged and the sample clock follows `now`.
    pub fn sample(&mut self, id: &NotificationId, now: Instant) -> Countdown {
        let tick = self.config.tick_interval.as_duration();
        let Some(entry) = self.entry_mut(id) else {
            return Countdown::Inactive;
        };
        if !entry.notification.is_active() || !entry.notification.has_countdown() {
            return Countdown::Inactive;
        }
        if entry.notification.paused {
            entry.last_sample = now;
            return Countdown::Paused;
        }

        entry.settle(now);
        if entry.notification.remaining.is_zero() {
            entry.notification.phase = Phase::Exiting;
            return Countdown::Expired;
        }
        Countdown::Running {
            next_wake: entry.notification.remaining.min(tick),
        }
    }

    /// Delay until the next useful countdown wake of `id`, if it has one.
    #[must_use]
    pub fn next_wake(&self, id: &NotificationId) -> Option<Duration> {
        let notification = self.get(id)?;
        if !notification.is_active() || !notification.has_countdown() {
            return None;
        }
        let tick = self.config.tick_interval.as_duration();
        if notification.paused {
            Some(tick)
        } else {
            Some(notification.remaining.min(tick))
        }
    }

    /// Ends the exit window of `id`, removing it from the collection.
    pub fn finish_exit(&mut self, id: &NotificationId) -> Option<Change> {
        let index = self.index_of(id)?;
        if self.entries[index].notification.is_exiting() {
            self.entries.remove(index);
            Some(Change::Removed(id.clone()))
        } else {
            None
        }
    }

    /// Returns the entry with the given id.
    #[must_use]
    pub fn get(&self, id: &NotificationId) -> Option<&Notification<M>> {
        self.entries
            .iter()
            .map(|entry| &entry.notification)
            .find(|notification| notification.id == *id)
    }

    /// Returns the entries in insertion order (Active and Exiting).
    pub fn iter(&self) -> impl Iterator<Item = &Notification<M>> {
        self.entries.iter().map(|entry| &entry.notification)
    }

    /// Returns the number of entries, including Exiting ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of Active entries.
    #[must_use]
    pub fn active_len(&self) -> usize {
        self.iter().filter(|notification| notification.is_active()).count()
    }

    fn begin_exit(&mut self, id: &NotificationId, reason: ExitReason) -> Option<Change> {
        let entry = self.entry_mut(id)?;
        if !entry.notification.is_active() {
            return None;
        }
        entry.notification.phase = Phase::Exiting;
        Some(Change::Exiting {
            id: id.clone(),
            reason,
        })
    }

    fn enforce_capacity(&mut self) -> Vec<Change> {
        let max = self.config.max_notifications.value();
        let mut changes = Vec::new();
        let mut active = self.active_len();
        while active > max {
            let Some(oldest) = self
                .entries
                .iter_mut()
                .find(|entry| entry.notification.is_active())
            else {
                break;
            };
            oldest.notification.phase = Phase::Exiting;
            changes.push(Change::Exiting {
                id: oldest.notification.id.clone(),
                reason: ExitReason::Evicted,
            });
            active -= 1;
        }
        changes
    }

    fn generate_id(&mut self) -> NotificationId {
        loop {
            self.next_id += 1;
            let candidate = NotificationId::generated(self.next_id);
            if self.index_of(&candidate).is_none() {
                return candidate;
            }
        }
    }

    fn index_of(&self, id: &NotificationId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.notification.id == *id)
    }

    fn entry_mut(&mut self, id: &NotificationId) -> Option<&mut Entry<M>> {
        self.entries
            .iter_mut()
            .find(|entry| entry.notification.id == *id)
    }
}

impl<M: Clone> Registry<M> {
    /// Returns a copy of the collection in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification<M>> {
        self.iter().cloned().collect()
    }
}

/// Copies merged options onto a notification and resets its countdown.
fn apply<M>(notification: &mut Notification<M>, resolved: &Resolved) {
    notification.category = resolved.category;
    notification.auto_dismiss = resolved.auto_dismiss;
    notification.remaining = resolved.auto_dismiss.unwrap_or(Duration::ZERO);
    notification.paused = false;
    notification.dismissible = resolved.dismissible;
    notification.pause_on_hover = resolved.pause_on_hover;
    notification.position = resolved.position;
}
