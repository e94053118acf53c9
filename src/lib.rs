//! pty-session - privileged PTY session spawning for Linux
//!
//! This crate is the building block underneath terminal multiplexers,
//! remote-shell gateways, and console-attach features: it launches a child
//! process attached to a freshly allocated pseudo-terminal, running as a
//! specified OS user rather than the caller's identity, and lets the
//! controlling window size of that pty be changed afterwards.
//!
//! Two operations:
//! - [`PtySession::launch`] - allocate a pty, fork, drop privileges
//!   (group-then-user, supplementary groups collapsed in between) and exec
//!   inside the child; return the master descriptor and the child pid.
//! - [`resize`] - apply column/row geometry to an open pty master at any
//!   time; omitting the size resets the terminal to the 80x30 default.
//!
//! # Caveats callers must know about
//!
//! - Using the launcher at all sets the hosting process's `SIGCHLD`
//!   disposition to ignore, once, for the life of the process. Every child
//!   is then auto-reaped by the kernel (no zombies), but exit statuses are
//!   unobtainable through `wait`-style APIs.
//! - After the fork there is no channel from the child back to the caller:
//!   a failed exec shows up only as the child exiting with status 127.
//!   Callers that care must observe child liveness themselves.
//!
//! Line-discipline configuration, I/O forwarding between the master and a
//! peer, and session management are out of scope; the master descriptor is
//! the caller's to use and close.

mod error;
mod identity;
mod launcher;
mod pty;
mod resize;
mod size;

pub use error::{Error, Result};
pub use identity::Identity;
pub use launcher::{PtySession, DEFAULT_TERM};
pub use resize::{resize, window_size};
pub use size::WindowSize;
