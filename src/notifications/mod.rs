// SPDX-License-Identifier: MPL-2.0
//! Toast notification registry.
//!
//! This module keeps an ordered, bounded collection of transient
//! notifications. Each timed notification counts down on its own timer,
//! can be paused while the pointer hovers it, and lingers briefly in an
//! Exiting phase so the surface can animate it out before it is removed.
//!
//! # Components
//!
//! - [`notification`] - `Notification` entry with category, placement and countdown state
//! - [`options`] - `NotificationOptions` accepted by `add`, and registry-wide `Defaults`
//! - [`registry`] - Pure, clock-injected state machine (`Registry`)
//! - [`subscription`] - `Snapshot` delivery and `Subscription` handles
//! - [`toaster`] - `Toaster`, the async driver that owns timers
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use toast_registry::notifications::{Category, NotificationOptions, Toaster, ToasterConfig};
//!
//! # async fn demo() -> toast_registry::error::Result<()> {
//! let toaster: Toaster = Toaster::new(ToasterConfig::default())?;
//!
//! toaster.success("Image saved".to_string())?;
//! toaster.add(
//!     "Upload failed".to_string(),
//!     NotificationOptions::from(Category::Error).duration(Duration::from_secs(8)),
//! )?;
//!
//! let mut snapshots = toaster.watch()?;
//! while snapshots.changed().await.is_ok() {
//!     let snapshot = snapshots.borrow_and_update().clone();
//!     println!("{} on screen", snapshot.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Lifecycle
//!
//! - Active: visible, countdown running unless paused or persistent
//! - Exiting: exit animation window (300ms by default), ignores pause
//! - Removed: gone from the collection, timers cancelled
//!
//! Adding beyond capacity starts the exit of the oldest Active entry in the
//! same call, so the Active count never exceeds the maximum.

pub mod notification;
pub mod options;
pub mod registry;
pub mod subscription;
pub mod toaster;

pub use notification::{Category, ExitReason, Notification, NotificationId, Phase, Position};
pub use options::{Defaults, NotificationOptions, DEFAULT_DURATION};
pub use registry::{Change, Countdown, Registry, RegistryConfig};
pub use subscription::{Snapshot, Subscription};
pub use toaster::{Toaster, ToasterBuilder, ToasterConfig};
