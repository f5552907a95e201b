//! The atomic replace primitive.
//!
//! [`replace_file`] is the single operation every commit funnels through. It
//! has one contract and two implementations picked at build time:
//!
//! - Unix and other non-Windows targets: `rename(2)`.
//! - Windows: `MoveFileExW` with `MOVEFILE_REPLACE_EXISTING` and
//!   `MOVEFILE_WRITE_THROUGH`.
//!
//! Both require `src` and `dst` to live on the same filesystem. Moving across
//! filesystems is not atomic and is reported as an error rather than emulated
//! with a copy.

use std::path::Path;

use log::debug;
use snafu::ResultExt;

use crate::error::{AtomicFileResult, ReplaceSnafu};

#[cfg(not(windows))]
mod unix;
#[cfg(not(windows))]
use self::unix as platform;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
use self::windows as platform;

/// Atomically replace the complete contents of `dst` with the complete
/// contents of `src`.
///
/// Concurrent readers of `dst` see either the old or the new content, never a
/// mix and never a missing file. `dst` may or may not exist beforehand. On
/// success `src` no longer exists.
///
/// # Errors
///
/// Returns [`AtomicFileError::Replace`](crate::AtomicFileError::Replace) when
/// a path cannot be encoded for the platform or the rename/move fails (for
/// example across filesystems, on a locked destination, or for lack of
/// permission). Neither file is modified in that case.
pub fn replace_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> AtomicFileResult<()> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    platform::replace(src, dst).context(ReplaceSnafu {
        src: src.display().to_string(),
        dst: dst.display().to_string(),
    })?;

    debug!("replaced {} with {}", dst.display(), src.display());
    Ok(())
}
