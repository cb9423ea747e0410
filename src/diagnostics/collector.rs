// SPDX-License-Identifier: MPL-2.0
//! Diagnostics collector for aggregating notification lifecycle events.
//!
//! The toaster logs through a cheap, cloneable [`DiagnosticsHandle`]; the
//! owner of the [`DiagnosticsCollector`] drains the channel into a
//! memory-bounded journal whenever it wants to inspect it.

use std::time::Duration;

use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use tokio::time::Instant;

use super::{BufferCapacity, CircularBuffer, DiagnosticEvent, DiagnosticEventKind};
use crate::notifications::{ExitReason, NotificationId};

/// Default channel capacity for event buffering.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Handle for sending diagnostic events to the collector.
///
/// This handle is cheap to clone and can be shared across threads.
/// Sending never blocks: events are dropped when the channel is full.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    event_tx: Sender<DiagnosticEvent>,
}

impl DiagnosticsHandle {
    /// Logs an event. Non-blocking; drops the event if the channel is full.
    pub fn log(&self, kind: DiagnosticEventKind) {
        let _ = self.event_tx.try_send(DiagnosticEvent::new(kind));
    }

    /// Attempts to send an event, returning an error if it could not be queued.
    ///
    /// # Errors
    ///
    /// Returns `TrySendError::Full` if the internal channel buffer is full,
    /// or `TrySendError::Disconnected` if the collector has been dropped.
    pub fn try_log(&self, kind: DiagnosticEventKind) -> Result<(), TrySendError<DiagnosticEvent>> {
        self.event_tx.try_send(DiagnosticEvent::new(kind))
    }
}

/// Counts of journal events by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JournalSummary {
    pub added: usize,
    /// In-place replacements and payload updates.
    pub updated: usize,
    pub dismissed: usize,
    pub expired: usize,
    pub evicted: usize,
    pub removed: usize,
}

/// Central collector for diagnostic events.
///
/// Old events are evicted when the journal reaches capacity.
pub struct DiagnosticsCollector {
    buffer: CircularBuffer<DiagnosticEvent>,
    event_rx: Receiver<DiagnosticEvent>,
    event_tx: Sender<DiagnosticEvent>,
    /// When collection started (tokio clock, like the event timestamps).
    collection_started_at: Instant,
    /// When collection started (wall clock for reports).
    collection_started_at_utc: DateTime<Utc>,
}

impl DiagnosticsCollector {
    /// Creates a new diagnostics collector with the specified buffer capacity.
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        let (event_tx, event_rx) = bounded(DEFAULT_CHANNEL_CAPACITY);

        Self {
            buffer: CircularBuffer::new(capacity),
            event_rx,
            event_tx,
            collection_started_at: Instant::now(),
            collection_started_at_utc: Utc::now(),
        }
    }

    /// Creates a handle for sending events to this collector.
    #[must_use]
    pub fn handle(&self) -> DiagnosticsHandle {
        DiagnosticsHandle {
            event_tx: self.event_tx.clone(),
        }
    }

    /// Moves all pending events from the channel into the journal.
    ///
    /// Returns the number of events processed.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.buffer.push(event);
            processed += 1;
        }
        processed
    }

    /// Records an event directly, bypassing the channel.
    pub fn record(&mut self, kind: DiagnosticEventKind) {
        self.buffer.push(DiagnosticEvent::new(kind));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns an iterator over all stored events (oldest first).
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.iter()
    }

    /// The `count` newest events, newest first.
    pub fn recent(&self, count: usize) -> impl Iterator<Item = &DiagnosticEvent> {
        self.buffer.recent(count)
    }

    /// Stored events about one notification, oldest first.
    pub fn history<'a>(
        &'a self,
        id: &'a NotificationId,
    ) -> impl Iterator<Item = &'a DiagnosticEvent> + 'a {
        self.buffer
            .iter()
            .filter(move |event| event.kind.notification_id() == Some(id))
    }

    /// Events lost because the journal was full.
    #[must_use]
    pub fn overwritten(&self) -> u64 {
        self.buffer.overwritten()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Returns how long the collector has been running.
    #[must_use]
    pub fn collection_duration(&self) -> Duration {
        self.collection_started_at.elapsed()
    }

    /// Returns the wall-clock time collection started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.collection_started_at_utc
    }

    /// Counts the stored events by kind.
    #[must_use]
    pub fn summary(&self) -> JournalSummary {
        let mut summary = JournalSummary::default();
        for event in self.buffer.iter() {
            match &event.kind {
                DiagnosticEventKind::Added { .. } => summary.added += 1,
                DiagnosticEventKind::Updated { .. }
                | DiagnosticEventKind::PayloadUpdated { .. } => summary.updated += 1,
                DiagnosticEventKind::Exiting { reason, .. } => match reason {
                    ExitReason::Dismissed => summary.dismissed += 1,
                    ExitReason::Expired => summary.expired += 1,
                    ExitReason::Evicted => summary.evicted += 1,
                },
                DiagnosticEventKind::Removed { .. } => summary.removed += 1,
                DiagnosticEventKind::PauseChanged { .. }
                | DiagnosticEventKind::Cleared { .. }
                | DiagnosticEventKind::Closed => {}
            }
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn removed(id: &str) -> DiagnosticEventKind {
        DiagnosticEventKind::Removed {
            id: NotificationId::new(id),
        }
    }

    #[test]
    fn collector_new_creates_empty_buffer() {
        let collector = DiagnosticsCollector::new(BufferCapacity::default());

        assert!(collector.is_empty());
        assert_eq!(collector.len(), 0);
        assert!(collector.started_at() <= Utc::now());
    }

    #[test]
    fn handle_log_sends_to_collector() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        let handle = collector.handle();

        handle.log(removed("a"));

        // Event is in channel, not yet in buffer
        assert!(collector.is_empty());

        assert_eq!(collector.process_pending(), 1);
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn handle_drops_events_when_channel_is_full() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        let handle = collector.handle();

        for _ in 0..DEFAULT_CHANNEL_CAPACITY {
            handle.log(removed("a"));
        }
        assert!(matches!(
            handle.try_log(removed("overflow")),
            Err(TrySendError::Full(_))
        ));

        assert_eq!(collector.process_pending(), DEFAULT_CHANNEL_CAPACITY);
        assert!(handle.try_log(removed("b")).is_ok());
    }

    #[test]
    fn handle_reports_disconnected_collector() {
        let collector = DiagnosticsCollector::new(BufferCapacity::default());
        let handle = collector.handle();
        drop(collector);

        assert!(matches!(
            handle.try_log(DiagnosticEventKind::Closed),
            Err(TrySendError::Disconnected(_))
        ));
        // Plain logging stays silent
        handle.log(DiagnosticEventKind::Closed);
    }

    #[test]
    fn journal_evicts_oldest_events() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::new(16));
        for i in 0..20 {
            collector.record(removed(&format!("n{i}")));
        }
        assert_eq!(collector.len(), 16);
        assert_eq!(collector.overwritten(), 4);
        let first = collector.iter().next().expect("event");
        assert_eq!(first.kind, removed("n4"));
        let newest = collector.recent(1).next().expect("event");
        assert_eq!(newest.kind, removed("n19"));
    }

    #[test]
    fn history_filters_by_notification() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        let id = NotificationId::new("a");
        collector.record(DiagnosticEventKind::PauseChanged {
            id: id.clone(),
            paused: true,
        });
        collector.record(removed("b"));
        collector.record(DiagnosticEventKind::Cleared { count: 2 });
        collector.record(removed("a"));

        let kinds: Vec<&DiagnosticEventKind> =
            collector.history(&id).map(|event| &event.kind).collect();
        assert_eq!(
            kinds,
            [
                &DiagnosticEventKind::PauseChanged {
                    id: id.clone(),
                    paused: true,
                },
                &removed("a"),
            ]
        );
    }

    #[test]
    fn summary_counts_exit_reasons() {
        let mut collector = DiagnosticsCollector::new(BufferCapacity::default());
        let id = NotificationId::new("a");
        for reason in [
            ExitReason::Dismissed,
            ExitReason::Expired,
            ExitReason::Expired,
            ExitReason::Evicted,
        ] {
            collector.record(DiagnosticEventKind::Exiting {
                id: id.clone(),
                reason,
            });
        }
        collector.record(removed("a"));

        let summary = collector.summary();
        assert_eq!(summary.dismissed, 1);
        assert_eq!(summary.expired, 2);
        assert_eq!(summary.evicted, 1);
        assert_eq!(summary.removed, 1);
        assert_eq!(summary.added, 0);
    }
}
