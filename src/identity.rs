//! Point-in-time lookup against the system user directory.

use std::io;
use std::path::PathBuf;

use nix::unistd::{Gid, Uid, User};

use crate::error::{Error, Result};

/// A resolved account identity.
///
/// Looked up once per launch and discarded after use; nothing caches it, so
/// later changes to the user directory are picked up by later launches.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Account name the lookup was performed with
    pub name: String,
    /// Primary user id
    pub uid: Uid,
    /// Primary group id
    pub gid: Gid,
    /// Home directory
    pub home: PathBuf,
}

impl Identity {
    /// Resolve `username` against the system user directory.
    ///
    /// An unknown user fails here with [`Error::UserLookup`], before any
    /// fork, so an unresolved identity can never reach the privilege-drop
    /// path inside the child.
    pub fn resolve(username: &str) -> Result<Self> {
        let user = User::from_name(username)
            .map_err(|e| Error::Io(io::Error::from(e)))?
            .ok_or_else(|| Error::UserLookup(username.to_string()))?;

        Ok(Self {
            name: user.name,
            uid: user.uid,
            gid: user.gid,
            home: user.dir,
        })
    }
}
