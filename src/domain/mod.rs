// SPDX-License-Identifier: MPL-2.0
//! Domain layer - value objects with ZERO external dependencies.
//!
//! This module contains pure domain types that enforce their valid ranges
//! at construction time. It depends only on `std`.
//!
//! # Modules
//!
//! - [`diagnostics`]: Journal sizing ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`notifications`]: Registry tuning values
//!   ([`MaxNotifications`](notifications::MaxNotifications),
//!   [`TickInterval`](notifications::TickInterval),
//!   [`ExitTransition`](notifications::ExitTransition))

pub mod diagnostics;
pub mod notifications;
