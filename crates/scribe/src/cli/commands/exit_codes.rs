//! Exit code constants for CLI commands.

/// Successful operation.
pub const EXIT_SUCCESS: i32 = 0;

/// A well-formed signature recovered to a different address.
pub const EXIT_VERIFICATION_FAILED: i32 = 1;

/// General error (configuration, I/O, malformed input, etc.).
pub const EXIT_ERROR: i32 = 2;
