// SPDX-License-Identifier: MPL-2.0
//! `toast_registry` keeps a bounded, ordered collection of transient toast
//! notifications for a rendering surface.
//!
//! It handles per-notification countdowns with pause-on-hover, an exit
//! transition window before removal, capacity eviction of the oldest entry,
//! and snapshot delivery to subscribers. Settings are loaded from a TOML
//! file in the user's configuration directory.

#![doc(html_root_url = "https://docs.rs/toast_registry/0.1.0")]

pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod notifications;
