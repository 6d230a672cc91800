//! Engine-level error values.
//!
//! Domain failures travel through a signal's `Err` type parameter; the engine
//! itself only ever manufactures the values below.

use std::time::Duration;

use thiserror::Error;

/// The conventional error type for engine-produced failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
  /// A `timeout` operator fired before the upstream terminated.
  #[error("signal timed out after {0:?}")]
  Timeout(Duration),
}
