use std::{
    io,
    path::{Path, PathBuf},
};

use log::warn;

/// Guard that removes a temporary file on drop unless disarmed.
///
/// Every exit path out of an atomic write that does not end in a successful
/// rename goes through this guard, including early `?` returns and panics.
#[derive(Debug)]
pub(crate) struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Disarm the guard so the file is NOT removed on drop.
    /// Call this after a successful rename.
    pub(crate) fn disarm(&mut self) {
        self.armed = false;
    }

    /// Remove the temp file now and report the outcome.
    ///
    /// A file that is already gone counts as removed.
    pub(crate) fn remove(mut self) -> io::Result<()> {
        self.armed = false;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Remove the temp file, logging instead of returning a failure.
    ///
    /// Used once a primary error has already been decided.
    pub(crate) fn remove_best_effort(self) {
        let path = self.path.clone();
        if let Err(e) = self.remove() {
            warn!("failed to remove temp file {}: {e}", path.display());
        }
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // Best-effort cleanup; we're likely already unwinding from another error.
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "failed to remove abandoned temp file {}: {e}",
                self.path.display()
            ),
        }
    }
}
