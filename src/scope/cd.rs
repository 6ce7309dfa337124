//! Scoped working-directory changes.
//!
//! [`Cd`] changes the process working directory for the lifetime of the
//! guard and changes back on drop.  The fallible constructors return typed
//! errors; the [`cd`] / [`cd_create`] entry points are the fail-loud surface
//! build scripts are expected to use.

use std::path::{Path, PathBuf};

use crate::error::{CairnError, Result};
use crate::exec::fail;
use crate::fs::mkdir_p;

/// Guard that restores the original working directory on drop.
#[derive(Debug)]
pub struct Cd {
    origin: PathBuf,
    destination: PathBuf,
}

impl Cd {
    /// Change into `dest`, failing when it is not an existing directory.
    pub fn change(dest: impl AsRef<Path>) -> Result<Self> {
        Self::activate(dest.as_ref(), false)
    }

    /// Change into `dest`, creating it (recursively) when missing.
    pub fn create(dest: impl AsRef<Path>) -> Result<Self> {
        Self::activate(dest.as_ref(), true)
    }

    /// The directory this guard changed into.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// The directory this guard will change back to on drop.
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    fn activate(dest: &Path, create: bool) -> Result<Self> {
        let destination = resolve(dest)?;
        if !destination.is_dir() {
            if !create {
                return Err(CairnError::execution(format!(
                    "cd: '{}' is not a directory, but create=False.",
                    destination.display()
                )));
            }
            mkdir_p(&destination)?;
        }

        let origin = std::env::current_dir().map_err(|err| {
            CairnError::execution(format!("cd: unable to determine current directory: {err}"))
        })?;
        std::env::set_current_dir(&destination).map_err(|err| {
            CairnError::execution(format!(
                "cd: unable to enter '{}': {err}",
                destination.display()
            ))
        })?;
        tracing::debug!(from = %origin.display(), to = %destination.display(), "cd: entered");
        Ok(Self {
            origin,
            destination,
        })
    }
}

impl Drop for Cd {
    fn drop(&mut self) {
        tracing::debug!(to = %self.origin.display(), "cd: returning");
        if let Err(err) = std::env::set_current_dir(&self.origin) {
            // The origin is gone (deleted from within the scope?).  There is
            // no sane directory to continue from.
            fail(&format!(
                "cd: unable to return to '{}': {err}",
                self.origin.display()
            ));
        }
    }
}

/// Resolve `dest` to an absolute path without requiring it to exist.
///
/// Supports `~` home-directory shorthand; relative paths are anchored at the
/// current working directory.
fn resolve(dest: &Path) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(&dest.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(|err| {
        CairnError::execution(format!("cd: unable to determine current directory: {err}"))
    })?;
    Ok(cwd.join(path))
}

/// Change into `dest` for the lifetime of the guard; [`fail`] when `dest` is
/// not an existing directory.
pub fn cd(dest: impl AsRef<Path>) -> Cd {
    Cd::change(dest).unwrap_or_else(|err| fail(&err.to_string()))
}

/// Change into `dest`, creating it when missing; [`fail`] on any error.
pub fn cd_create(dest: impl AsRef<Path>) -> Cd {
    Cd::create(dest).unwrap_or_else(|err| fail(&err.to_string()))
}
