//! The atomic writer and the one-shot [`write_file`] helper.
//!
//! An [`AtomicFile`] stages bytes in a uniquely named temp file that sits in
//! the same directory as the destination. Nothing is visible at the
//! destination until [`AtomicFile::commit`] renames the temp file over it via
//! [`replace_file`]. [`AtomicFile::discard`], or simply dropping the writer,
//! deletes the temp file and leaves the destination untouched.

use std::{
    ffi::OsString,
    fmt,
    fs::File,
    io::{self, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};
use snafu::prelude::*;

use crate::{
    error::{
        AtomicFileResult, CloseSnafu, CreateTempSnafu, DiscardSnafu, InvalidPathSnafu, WriteSnafu,
    },
    guard::TempFileGuard,
    options::WriteOptions,
    replace::replace_file,
};

/// A file being written atomically.
///
/// Created with [`AtomicFile::new`] or [`AtomicFile::with_options`], fed with
/// [`write`](AtomicFile::write) or through [`std::io::Write`], and terminated
/// exactly once by [`commit`](AtomicFile::commit) or
/// [`discard`](AtomicFile::discard). Both consume the writer.
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let dir = tempfile::TempDir::new()?;
/// # let path = dir.path().join("config.toml");
/// use atomicfile::AtomicFile;
///
/// let mut file = AtomicFile::new(&path, 0o644)?;
/// file.write_all(b"answer = 42\n")?;
/// file.commit()?;
///
/// assert_eq!(std::fs::read_to_string(&path)?, "answer = 42\n");
/// # Ok(())
/// # }
/// ```
pub struct AtomicFile {
    final_path: PathBuf,
    file: File,
    guard: TempFileGuard,
    sync: bool,
}

impl AtomicFile {
    /// Open a writer for `path`, creating the temp file with permission bits
    /// `mode` (Unix only; subject to the umask).
    ///
    /// # Errors
    ///
    /// - [`InvalidPath`](crate::AtomicFileError::InvalidPath) if `path` has no
    ///   file name.
    /// - [`CreateTemp`](crate::AtomicFileError::CreateTemp) if the parent
    ///   directory is missing or not writable.
    pub fn new(path: impl AsRef<Path>, mode: u32) -> AtomicFileResult<Self> {
        Self::with_options(path, &WriteOptions::new().mode(mode))
    }

    /// Open a writer for `path` using explicit [`WriteOptions`].
    pub fn with_options(path: impl AsRef<Path>, options: &WriteOptions) -> AtomicFileResult<Self> {
        let final_path = path.as_ref().to_path_buf();
        let file_name = final_path.file_name().context(InvalidPathSnafu {
            path: final_path.display().to_string(),
        })?;
        let dir = staging_dir(&final_path);

        let mut prefix = OsString::from(".");
        prefix.push(file_name);
        prefix.push(".");

        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix).suffix(".tmp");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(options.get_mode()));
        }

        let (file, temp_path) = builder
            .tempfile_in(dir)
            .and_then(|named| named.keep().map_err(|e| e.error))
            .context(CreateTempSnafu {
                dir: dir.display().to_string(),
            })?;

        debug!(
            "staging {} in {}",
            final_path.display(),
            temp_path.display()
        );

        Ok(Self {
            final_path,
            file,
            guard: TempFileGuard::new(temp_path),
            sync: options.get_sync(),
        })
    }

    /// The destination this writer commits to.
    pub fn path(&self) -> &Path {
        &self.final_path
    }

    /// The temp file currently holding the staged bytes.
    pub fn temp_path(&self) -> &Path {
        self.guard.path()
    }

    /// Append `buf` to the staged content, returning how many bytes were
    /// written.
    ///
    /// On error the writer stays open. Its content is then unreliable, so
    /// callers should [`discard`](AtomicFile::discard) it.
    pub fn write(&mut self, buf: &[u8]) -> AtomicFileResult<usize> {
        self.file.write(buf).context(WriteSnafu {
            path: self.guard.path().display().to_string(),
        })
    }

    /// Append all of `buf` to the staged content.
    pub fn write_all(&mut self, buf: &[u8]) -> AtomicFileResult<()> {
        self.file.write_all(buf).context(WriteSnafu {
            path: self.guard.path().display().to_string(),
        })
    }

    /// Close the temp file and atomically move it over the destination.
    ///
    /// On success the destination holds exactly the bytes written and the
    /// temp file is gone. On failure the destination is untouched and the
    /// temp file has been removed, unless that removal itself failed, which
    /// is logged rather than returned.
    ///
    /// # Errors
    ///
    /// - [`Close`](crate::AtomicFileError::Close) if flushing or syncing the
    ///   temp file fails.
    /// - [`Replace`](crate::AtomicFileError::Replace), as returned by
    ///   [`replace_file`].
    pub fn commit(self) -> AtomicFileResult<()> {
        let AtomicFile {
            final_path,
            file,
            mut guard,
            sync,
        } = self;

        let closed = close(file, sync).context(CloseSnafu {
            path: guard.path().display().to_string(),
        });
        if closed.is_err() {
            guard.remove_best_effort();
            return closed;
        }

        if let Err(e) = replace_file(guard.path(), &final_path) {
            guard.remove_best_effort();
            return Err(e);
        }

        // The temp file has been renamed; nothing left to clean up.
        guard.disarm();
        debug!("committed {}", final_path.display());
        Ok(())
    }

    /// Abandon the write: close the temp file and delete it.
    ///
    /// The destination is never touched.
    ///
    /// # Errors
    ///
    /// [`Discard`](crate::AtomicFileError::Discard) if the temp file could not
    /// be deleted and has leaked.
    pub fn discard(self) -> AtomicFileResult<()> {
        let AtomicFile {
            final_path,
            file,
            guard,
            ..
        } = self;

        drop(file);

        let path = guard.path().display().to_string();
        guard.remove().context(DiscardSnafu { path })?;

        debug!("discarded staged write to {}", final_path.display());
        Ok(())
    }
}

impl fmt::Debug for AtomicFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicFile")
            .field("final_path", &self.final_path)
            .field("temp_path", &self.guard.path())
            .field("sync", &self.sync)
            .finish()
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

/// Directory the temp file for `path` is created in.
///
/// A bare file name stages in the current directory.
fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn close(mut file: File, sync: bool) -> io::Result<()> {
    file.flush()?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

/// Atomically write `contents` to `path` with default [`WriteOptions`].
///
/// Either `path` ends up holding exactly `contents`, or it is left as it was.
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let dir = tempfile::TempDir::new()?;
/// # let path = dir.path().join("state.json");
/// atomicfile::write_file(&path, br#"{"ok":true}"#)?;
/// # Ok(())
/// # }
/// ```
pub fn write_file(path: impl AsRef<Path>, contents: &[u8]) -> AtomicFileResult<()> {
    write_file_with_options(path, contents, &WriteOptions::default())
}

/// Atomically write `contents` to `path` with explicit [`WriteOptions`].
///
/// A failed write discards the temp file before the error is returned.
pub fn write_file_with_options(
    path: impl AsRef<Path>,
    contents: &[u8],
    options: &WriteOptions,
) -> AtomicFileResult<()> {
    let file = AtomicFile::with_options(path, options)?;
    write_and_commit(file, contents)
}

fn write_and_commit(mut file: AtomicFile, contents: &[u8]) -> AtomicFileResult<()> {
    if let Err(e) = file.write_all(contents) {
        if let Err(discard_err) = file.discard() {
            warn!("{discard_err}");
        }
        return Err(e);
    }

    file.commit()
}
