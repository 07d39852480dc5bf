//! Transfer progress as an integer percentage.

use std::sync::atomic::{AtomicU8, Ordering};

/// Computes `round(loaded * 100 / total)`, capped at 100.
///
/// Returns `None` when the total is unknown or zero.
#[must_use]
pub fn percentage(loaded: u64, total: Option<u64>) -> Option<u8> {
    let total = u128::from(total.filter(|t| *t > 0)?);
    let loaded = u128::from(loaded);
    let rounded = (loaded * 200 + total) / (total * 2);
    Some(u8::try_from(rounded.min(100)).unwrap_or(100))
}

/// Turns raw byte counts into non-decreasing percentages for one transfer.
///
/// A fresh tracker starts at 0; create a new one per transfer.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    last: AtomicU8,
}

impl ProgressTracker {
    /// Creates a tracker at 0%.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU8::new(0),
        }
    }

    /// Records a progress event.
    ///
    /// Returns the percentage to report, or `None` when the total is unknown.
    /// The value never drops below a previously reported one.
    pub fn observe(&self, loaded: u64, total: Option<u64>) -> Option<u8> {
        let current = percentage(loaded, total)?;
        let previous = self.last.fetch_max(current, Ordering::SeqCst);
        Some(previous.max(current))
    }
}
