//! Run orchestration and the exit-status contract.

pub mod upgrade;

/// Run finished, or there was nothing to do.
pub const EXIT_SUCCESS: u8 = 0;
/// Configuration/validation failure, or another fatal error.
pub const EXIT_ERROR: u8 = 1;
/// Outdated dependencies were found and fail-on-updates is enabled.
pub const EXIT_UPDATES_FOUND: u8 = 2;
/// An upgrade batch was attempted and at least one application failed.
pub const EXIT_UPGRADE_FAILED: u8 = 3;
