//! Error types for atomic writes.
//!
//! Every variant names the step that failed and carries the path(s) involved
//! along with the underlying `io::Error`, so callers can both print a useful
//! message and inspect the root cause.

use std::io;

use snafu::{Backtrace, prelude::*};

/// Result alias used throughout this crate.
pub type AtomicFileResult<T> = Result<T, AtomicFileError>;

/// Errors that can occur while staging, committing or discarding an atomic
/// write, or while replacing one file with another.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AtomicFileError {
    /// The destination path does not name a file.
    #[snafu(display("Invalid destination for atomic write: {path}"))]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// The backtrace captured when the error occurred.
        backtrace: Backtrace,
    },

    /// The temp file could not be created next to the destination.
    #[snafu(display("create temp file for atomic write in {dir}: {source}"))]
    CreateTemp {
        /// Directory the temp file was to be created in.
        dir: String,
        /// Underlying I/O error.
        source: io::Error,
        /// The backtrace captured when the error occurred.
        backtrace: Backtrace,
    },

    /// Writing staged bytes to the temp file failed.
    #[snafu(display("write to temp file {path}: {source}"))]
    Write {
        /// Path of the temp file.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
        /// The backtrace captured when the error occurred.
        backtrace: Backtrace,
    },

    /// Flushing or syncing the temp file before the rename failed.
    #[snafu(display("close temp file {path} for atomic write: {source}"))]
    Close {
        /// Path of the temp file.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
        /// The backtrace captured when the error occurred.
        backtrace: Backtrace,
    },

    /// The atomic rename / move of `src` over `dst` failed.
    ///
    /// Neither file has been modified when this is returned.
    #[snafu(display("replace {src} -> {dst}: {source}"))]
    Replace {
        /// Source path (the staged file).
        src: String,
        /// Destination path.
        dst: String,
        /// Underlying I/O error.
        source: io::Error,
        /// The backtrace captured when the error occurred.
        backtrace: Backtrace,
    },

    /// The temp file could not be deleted and has leaked.
    #[snafu(display("remove temp file {path}: {source}"))]
    Discard {
        /// Path of the leaked temp file.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
        /// The backtrace captured when the error occurred.
        backtrace: Backtrace,
    },
}

impl AtomicFileError {
    /// The `io::ErrorKind` of the underlying failure.
    ///
    /// `InvalidPath` reports `InvalidInput`.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AtomicFileError::InvalidPath { .. } => io::ErrorKind::InvalidInput,
            AtomicFileError::CreateTemp { source, .. }
            | AtomicFileError::Write { source, .. }
            | AtomicFileError::Close { source, .. }
            | AtomicFileError::Replace { source, .. }
            | AtomicFileError::Discard { source, .. } => source.kind(),
        }
    }
}

impl From<AtomicFileError> for io::Error {
    fn from(err: AtomicFileError) -> Self {
        io::Error::new(err.kind(), err)
    }
}
