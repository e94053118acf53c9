//! Error types for launch and resize operations.

use std::io;
use thiserror::Error;

/// Errors reported synchronously to the caller.
///
/// Failures inside the forked child (a failed `exec`, most notably) have no
/// representation here: they terminate the child with a non-zero status and
/// are observable only through that status, never through this enum.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller-side contract violation, detected before any OS resource is
    /// touched.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The username did not resolve against the system user directory.
    #[error("unknown user: {0}")]
    UserLookup(String),

    /// The PTY master could not be allocated or unlocked.
    #[error("failed to allocate PTY: {0}")]
    PtyAllocation(#[source] nix::Error),

    /// The OS could not create the child process.
    #[error("failed to fork: {0}")]
    Fork(#[source] nix::Error),

    /// A window-size ioctl was rejected (bad descriptor, or not a tty).
    #[error("window size ioctl failed: {0}")]
    Ioctl(#[source] nix::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for PTY session operations
pub type Result<T> = std::result::Result<T, Error>;
