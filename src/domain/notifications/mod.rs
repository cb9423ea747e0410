// SPDX-License-Identifier: MPL-2.0
//! Notification registry domain types.
//!
//! This module provides pure domain types for the toast registry:
//! - [`MaxNotifications`]: Capacity of the registry (Active entries)
//! - [`TickInterval`]: Countdown sampling interval
//! - [`ExitTransition`]: Delay between "exit decided" and removal

mod newtypes;

pub use newtypes::{
    exit_transition_bounds, max_notifications_bounds, tick_interval_bounds, ExitTransition,
    MaxNotifications, TickInterval,
};
