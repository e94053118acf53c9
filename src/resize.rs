//! Window-size control for an already-open PTY master.

use std::os::fd::RawFd;

use crate::error::Result;
use crate::pty;
use crate::size::WindowSize;

/// Apply `cols` x `rows` to the pty behind `fd` as a single atomic update.
///
/// The dimensions must be supplied together; omitting both is a **reset to
/// the 80x30 default**, not a no-op, regardless of the terminal's current
/// geometry. The kernel delivers SIGWINCH to the terminal's foreground
/// process group as a side effect.
///
/// There is no ordering dependency on the launch that produced `fd`; the
/// only requirement is that the descriptor is still open. Fails with
/// [`Error::Ioctl`](crate::Error::Ioctl) if it is closed, invalid, or not a
/// terminal.
pub fn resize(fd: RawFd, cols: Option<u16>, rows: Option<u16>) -> Result<()> {
    let size = WindowSize::from_args(cols, rows)?;
    pty::set_window_size(fd, size)
}

/// Read back the current geometry of the pty behind `fd`.
pub fn window_size(fd: RawFd) -> Result<WindowSize> {
    pty::get_window_size(fd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pty::open_master;
    use std::os::fd::{AsRawFd, IntoRawFd};

    #[test]
    fn test_resize_exact_geometry() {
        let master = open_master().unwrap();
        let fd = master.fd.as_raw_fd();
        resize(fd, Some(132), Some(43)).unwrap();
        assert_eq!(window_size(fd).unwrap(), WindowSize::new(132, 43));
    }

    #[test]
    fn test_resize_without_size_resets_to_default() {
        let master = open_master().unwrap();
        let fd = master.fd.as_raw_fd();

        // Start from a different geometry so the reset is observable.
        resize(fd, Some(132), Some(43)).unwrap();
        resize(fd, None, None).unwrap();
        assert_eq!(window_size(fd).unwrap(), WindowSize::new(80, 30));
    }

    #[test]
    fn test_resize_rejects_one_sided_size() {
        let master = open_master().unwrap();
        let err = resize(master.fd.as_raw_fd(), Some(132), None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_resize_invalid_fd_fails() {
        let err = resize(-1, Some(80), Some(24)).unwrap_err();
        assert!(matches!(err, Error::Ioctl(_)));
    }

    #[test]
    fn test_resize_closed_fd_fails() {
        let master = open_master().unwrap();
        let raw = master.fd.into_raw_fd();
        unsafe { libc::close(raw) };
        let err = resize(raw, Some(80), Some(24)).unwrap_err();
        assert!(matches!(err, Error::Ioctl(_)));
    }
}
