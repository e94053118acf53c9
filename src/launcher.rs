//! Privileged session launch: fork a child onto a fresh PTY as another user.
//!
//! The launch sequence is the security-sensitive part of this crate. In the
//! forked child the identity transition is group-then-user, with real and
//! effective ids set at each stage and the supplementary set collapsed in
//! between; that order is an invariant, not a style choice (see
//! [`PtySession::launch`]).

use std::ffi::CString;
use std::os::fd::{AsRawFd, OwnedFd, RawFd};
use std::process;
use std::sync::Once;

use nix::sys::signal::{signal, SigHandler, Signal};
use nix::unistd::{
    chdir, dup2, execvp, fork, setegid, seteuid, setgid, setgroups, setsid, setuid, ForkResult,
    Pid,
};

use crate::error::{Error, Result};
use crate::identity::Identity;
use crate::pty::{self, Master};
use crate::size::WindowSize;

/// Terminal type exported as `TERM` when the caller does not supply one.
pub const DEFAULT_TERM: &str = "vt100";

static SIGCHLD_IGNORED: Once = Once::new();

/// A launched session: the PTY master descriptor and the child's pid.
///
/// The master and the child are always the two ends of a pty pair created in
/// the same launch; the slave side is never exposed, it is only the child's
/// controlling terminal. After launch the caller owns the master outright
/// (closed when the session is dropped, or taken with
/// [`into_master`](Self::into_master)) and nothing here tracks the child
/// past spawn.
#[derive(Debug)]
pub struct PtySession {
    master: OwnedFd,
    child: Pid,
}

impl PtySession {
    /// Launch `command` as `username` on a freshly allocated PTY.
    ///
    /// The command is exec'd with its own name as the sole argv entry, so it
    /// behaves like a login-program launch rather than a shell command line.
    /// `term` becomes the child's `TERM` variable ([`DEFAULT_TERM`] when
    /// absent). `cols`/`rows` must be supplied together and positive; when
    /// both are absent the pty starts at 80x30.
    ///
    /// # Process-wide side effect
    ///
    /// The first launch sets the hosting process's `SIGCHLD` disposition to
    /// ignore, permanently. The kernel then auto-reaps *every* child of the
    /// process, not just sessions spawned here, and `wait`-style status
    /// collection stops working. Callers that need exit statuses must
    /// observe child liveness by other means.
    ///
    /// # Child-side failures
    ///
    /// Once the fork happens there is no channel back to the caller. A
    /// failure in the child's setup exits it with status 1; a failed exec
    /// exits with status 127. Both are observable only as the child dying;
    /// the returned session is indistinguishable from a healthy one at the
    /// moment of return.
    pub fn launch(
        command: &str,
        username: &str,
        term: Option<&str>,
        cols: Option<u16>,
        rows: Option<u16>,
    ) -> Result<Self> {
        if command.is_empty() {
            return Err(Error::InvalidArgument("command must be non-empty".into()));
        }
        if username.is_empty() {
            return Err(Error::InvalidArgument("username must be non-empty".into()));
        }
        let size = WindowSize::from_args(cols, rows)?;
        let program = CString::new(command)
            .map_err(|_| Error::InvalidArgument("command contains a NUL byte".into()))?;

        // Resolve before forking: an unknown user must fail the launch here
        // rather than reach the privilege drop inside the child.
        let identity = Identity::resolve(username)?;
        let term = term.unwrap_or(DEFAULT_TERM).to_string();

        SIGCHLD_IGNORED.call_once(|| unsafe {
            let _ = signal(Signal::SIGCHLD, SigHandler::SigIgn);
        });

        let master = pty::open_master()?;
        // The slave inherits this geometry, so the child sees the requested
        // size from its first instruction.
        pty::set_window_size(master.fd.as_raw_fd(), size)?;

        log::debug!(
            "launching {:?} as {} on {}",
            command,
            identity.name,
            master.slave_path
        );

        match unsafe { fork() }.map_err(Error::Fork)? {
            ForkResult::Parent { child } => {
                log::debug!("spawned pid {} on master fd {}", child, master.fd.as_raw_fd());
                Ok(Self {
                    master: master.fd,
                    child,
                })
            }
            ForkResult::Child => exec_child(master, &identity, &program, &term),
        }
    }

    /// The PTY master descriptor.
    pub fn master_fd(&self) -> RawFd {
        self.master.as_raw_fd()
    }

    /// The child's process id.
    pub fn pid(&self) -> Pid {
        self.child
    }

    /// Take ownership of the master descriptor, consuming the session.
    pub fn into_master(self) -> OwnedFd {
        self.master
    }
}

impl AsRawFd for PtySession {
    fn as_raw_fd(&self) -> RawFd {
        self.master.as_raw_fd()
    }
}

/// Runs in the forked child; never returns. Any failure exits the child,
/// there is no way to report it to the parent.
fn exec_child(master: Master, identity: &Identity, program: &CString, term: &str) -> ! {
    // The child keeps only the slave side.
    drop(master.fd);

    if setsid().is_err() {
        process::exit(1);
    }

    let slave = match pty::open_slave(&master.slave_path) {
        Ok(fd) => fd,
        Err(_) => process::exit(1),
    };
    let slave_raw = slave.as_raw_fd();

    // Make the slave our controlling terminal.
    unsafe {
        if libc::ioctl(slave_raw, libc::TIOCSCTTY as libc::c_ulong, 0) < 0 {
            process::exit(1);
        }
    }

    if dup2(slave_raw, libc::STDIN_FILENO).is_err()
        || dup2(slave_raw, libc::STDOUT_FILENO).is_err()
        || dup2(slave_raw, libc::STDERR_FILENO).is_err()
    {
        process::exit(1);
    }
    if slave_raw > libc::STDERR_FILENO {
        drop(slave);
    }

    // Identity transition. Group ids first (real and effective together, so
    // no inspector ever sees a split group identity), then the supplementary
    // set collapsed to the primary group, then the user ids. Doing the uid
    // first would leave a window with elevated group membership under the
    // target uid.
    if setgid(identity.gid).is_err() || setegid(identity.gid).is_err() {
        process::exit(1);
    }
    if setgroups(&[identity.gid]).is_err() {
        process::exit(1);
    }
    if setuid(identity.uid).is_err() || seteuid(identity.uid).is_err() {
        process::exit(1);
    }

    std::env::set_var("TERM", term);
    let _ = chdir(identity.home.as_path());

    let _ = execvp(program, &[program.as_c_str()]);

    // execvp only returns on failure.
    process::exit(127);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resize::{resize, window_size};
    use nix::unistd::{Uid, User};

    fn current_username() -> String {
        User::from_uid(Uid::effective()).unwrap().unwrap().name
    }

    /// Privileged tests need the full setgid/setgroups/setuid sequence to
    /// succeed, which requires root; skip elsewhere.
    fn is_root() -> bool {
        Uid::effective().is_root()
    }

    #[test]
    fn test_launch_rejects_empty_command() {
        let err = PtySession::launch("", "root", None, None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_launch_rejects_empty_username() {
        let err = PtySession::launch("true", "", None, None, None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_launch_rejects_one_sided_size() {
        let err = PtySession::launch("true", "root", None, Some(3), None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = PtySession::launch("true", "root", None, None, Some(3)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_launch_unknown_user_fails_before_fork() {
        let err =
            PtySession::launch("true", "no-such-user-pty-session", None, None, None).unwrap_err();
        assert!(matches!(err, Error::UserLookup(_)));
    }

    #[test]
    fn test_launch_returns_pty_master_and_pid() {
        if !is_root() {
            return;
        }

        let session = PtySession::launch("true", &current_username(), None, None, None).unwrap();
        assert!(session.master_fd() >= 0);
        assert!(session.pid().as_raw() > 0);

        // Default geometry was applied at creation, and the descriptor is
        // pty-flavored: the resize path works against it.
        assert_eq!(window_size(session.master_fd()).unwrap(), WindowSize::default());
        resize(session.master_fd(), Some(100), Some(40)).unwrap();
        assert_eq!(
            window_size(session.master_fd()).unwrap(),
            WindowSize::new(100, 40)
        );
    }

    #[test]
    fn test_launch_applies_requested_initial_size() {
        if !is_root() {
            return;
        }

        let session =
            PtySession::launch("true", &current_username(), Some("xterm"), Some(132), Some(43))
                .unwrap();
        assert_eq!(
            window_size(session.master_fd()).unwrap(),
            WindowSize::new(132, 43)
        );
    }

    #[test]
    fn test_exec_failure_is_invisible_to_the_caller() {
        if !is_root() {
            return;
        }

        // The program does not exist, so the child dies with status 127, but
        // the parent still receives a normal-looking session. This asymmetry
        // is the documented contract, not a bug.
        let session = PtySession::launch(
            "/nonexistent/pty-session-test-program",
            &current_username(),
            None,
            None,
            None,
        )
        .unwrap();
        assert!(session.pid().as_raw() > 0);
    }
}
