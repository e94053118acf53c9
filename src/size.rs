//! Window geometry for a PTY.

use crate::error::{Error, Result};

/// Terminal window size in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSize {
    /// Number of columns
    pub cols: u16,
    /// Number of rows
    pub rows: u16,
}

impl WindowSize {
    /// Create a new window size
    pub fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Build a size from optional column/row arguments.
    ///
    /// Both dimensions absent yields the 80x30 default; both present and
    /// positive yields that size. A one-sided or zero dimension is rejected
    /// with [`Error::InvalidArgument`].
    pub fn from_args(cols: Option<u16>, rows: Option<u16>) -> Result<Self> {
        match (cols, rows) {
            (None, None) => Ok(Self::default()),
            (Some(c), Some(r)) => {
                if c == 0 || r == 0 {
                    return Err(Error::InvalidArgument(format!(
                        "cols and rows must be positive, got {}x{}",
                        c, r
                    )));
                }
                Ok(Self::new(c, r))
            }
            _ => Err(Error::InvalidArgument(
                "cols and rows must be supplied together".into(),
            )),
        }
    }

    /// Convert to the libc winsize structure (pixel fields left zero)
    pub(crate) fn to_winsize(self) -> libc::winsize {
        libc::winsize {
            ws_row: self.rows,
            ws_col: self.cols,
            ws_xpixel: 0,
            ws_ypixel: 0,
        }
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::new(80, 30)
    }
}

impl From<libc::winsize> for WindowSize {
    fn from(ws: libc::winsize) -> Self {
        Self {
            cols: ws.ws_col,
            rows: ws.ws_row,
        }
    }
}
