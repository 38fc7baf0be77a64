//! Effect durations as the engine encodes them.
//!
//! Positive values are tick counts; negative values are special markers.

use crate::error::ValidationError;

/// Namespace for duration values. Has no instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duration {}

impl Duration {
    /// A duration of `count` ticks. `count` must be positive.
    pub fn ticks(count: i64) -> Result<i64, ValidationError> {
        if count <= 0 {
            return Err(ValidationError::NonPositiveTicks { count });
        }
        Ok(count)
    }

    pub const fn indefinite() -> i64 {
        -1
    }

    pub const fn instantaneous() -> i64 {
        -2
    }

    /// Same marker as [`Duration::instantaneous`].
    pub const fn permanent() -> i64 {
        -2
    }

    pub const fn start_of_turn() -> i64 {
        -3
    }

    /// Lasts until the end of the `count`-th turn. `count` must be at least 1.
    pub fn end_of_turn(count: i64) -> Result<i64, ValidationError> {
        if count < 1 {
            return Err(ValidationError::EndOfTurnCount { count });
        }
        Ok(-3 - count)
    }
}
