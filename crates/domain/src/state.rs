//! Loading state for observed async operations.
//!
//! This is the state machine exposed to UI callers:
//! - `Idle`: nothing has run yet, or the holder was reset
//! - `Loading`: an operation is in flight
//! - `Success`: the last operation returned data
//! - `Error`: the last operation failed

use serde::{Deserialize, Serialize};

/// Phase of an observed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoadingState {
    /// No operation has run yet.
    #[default]
    Idle,
    /// An operation is in progress.
    Loading,
    /// The last operation succeeded.
    Success,
    /// The last operation failed.
    Error,
}

impl LoadingState {
    /// Returns true if the state is Idle.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if an operation is in progress.
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true if the last operation succeeded.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns true if the last operation failed.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_idle() {
        assert!(LoadingState::default().is_idle());
    }

    #[test]
    fn test_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&LoadingState::Loading).unwrap(),
            "\"loading\""
        );
    }
}
