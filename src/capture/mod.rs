//! Canonical multi-view snapshots.

/// Front, back, left and right snapshots.
pub mod views;
