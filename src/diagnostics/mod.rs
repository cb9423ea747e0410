// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for recording notification lifecycle events.
//!
//! The toaster reports every transition (added, exiting, removed, pause
//! changes) to an optional [`DiagnosticsHandle`]. A [`DiagnosticsCollector`]
//! stores them in a memory-bounded [`CircularBuffer`] for inspection.
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: Generic ring buffer with configurable capacity
//! - [`DiagnosticEvent`]: Timestamped lifecycle event
//! - [`DiagnosticsCollector`] / [`DiagnosticsHandle`]: channel-fed journal

mod buffer;
mod collector;
mod events;

pub use buffer::{BufferCapacity, CircularBuffer};
pub use collector::{DiagnosticsCollector, DiagnosticsHandle, JournalSummary};
pub use events::{DiagnosticEvent, DiagnosticEventKind};
