// SPDX-License-Identifier: MPL-2.0
//! Diagnostics newtypes.

/// Journal capacity bounds (16 to 10000 events).
pub mod buffer_capacity_bounds {
    /// Minimum journal capacity.
    pub const MIN: usize = 16;
    /// Maximum journal capacity.
    pub const MAX: usize = 10_000;
    /// Default journal capacity.
    pub const DEFAULT: usize = 256;
}

/// Number of lifecycle events retained by the diagnostics journal.
///
/// This newtype enforces validity at the type level, ensuring the value
/// is always within the valid range (16–10000 events).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferCapacity(usize);

impl BufferCapacity {
    /// Creates a new buffer capacity, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(buffer_capacity_bounds::MIN, buffer_capacity_bounds::MAX))
    }

    /// Returns the value as usize.
    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }
}

impl Default for BufferCapacity {
    fn default() -> Self {
        Self(buffer_capacity_bounds::DEFAULT)
    }
}
