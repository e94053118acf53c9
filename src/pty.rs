//! PTY master allocation and window-size ioctls.
//!
//! Uses the modern POSIX PTY API: posix_openpt() to open the master,
//! grantpt()/unlockpt() to make the slave usable, ptsname() for the slave
//! device path.
//!
//! Reference: https://www.man7.org/linux/man-pages/man3/posix_openpt.3.html

use std::ffi::CString;
use std::io;
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};

use nix::fcntl::OFlag;
use nix::pty::{grantpt, posix_openpt, ptsname, unlockpt};

use crate::error::{Error, Result};
use crate::size::WindowSize;

/// An allocated PTY master and the path of its slave device.
pub(crate) struct Master {
    pub fd: OwnedFd,
    pub slave_path: String,
}

/// Allocate a new PTY master and unlock its slave.
pub(crate) fn open_master() -> Result<Master> {
    let master = posix_openpt(OFlag::O_RDWR | OFlag::O_NOCTTY).map_err(Error::PtyAllocation)?;
    grantpt(&master).map_err(Error::PtyAllocation)?;
    unlockpt(&master).map_err(Error::PtyAllocation)?;
    let slave_path = unsafe { ptsname(&master) }.map_err(Error::PtyAllocation)?;

    // PtyMaster offers no direct conversion to OwnedFd; move the fd out by
    // hand so an early return cannot leak it.
    let raw = master.as_raw_fd();
    std::mem::forget(master);
    let fd = unsafe { OwnedFd::from_raw_fd(raw) };

    Ok(Master { fd, slave_path })
}

/// Open the slave side of a PTY. Runs in the forked child only; the caller
/// exits the child on failure.
pub(crate) fn open_slave(path: &str) -> io::Result<OwnedFd> {
    let path = CString::new(path).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let fd = unsafe { libc::open(path.as_ptr(), libc::O_RDWR | libc::O_NOCTTY) };
    if fd < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(unsafe { OwnedFd::from_raw_fd(fd) })
}

/// Apply `size` to the pty behind `fd` in a single TIOCSWINSZ ioctl.
pub(crate) fn set_window_size(fd: RawFd, size: WindowSize) -> Result<()> {
    let ws = size.to_winsize();
    let result = unsafe { libc::ioctl(fd, libc::TIOCSWINSZ as libc::c_ulong, &ws) };
    if result == -1 {
        Err(Error::Ioctl(nix::Error::last()))
    } else {
        Ok(())
    }
}

/// Read back the current geometry of the pty behind `fd`.
pub(crate) fn get_window_size(fd: RawFd) -> Result<WindowSize> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ as libc::c_ulong, &mut ws) };
    if result == -1 {
        Err(Error::Ioctl(nix::Error::last()))
    } else {
        Ok(WindowSize::from(ws))
    }
}
