//! Timestamp utilities for token expiry checks.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as whole seconds since the Unix epoch.
///
/// A clock set before the epoch degrades to 0; downstream expiry checks treat
/// a zero timestamp as ancient, so the failure mode is rejection, never
/// acceptance.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
