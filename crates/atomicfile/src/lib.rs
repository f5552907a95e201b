//! Atomic file replacement.
//!
//! Readers of a file written through this crate see either the complete old
//! content or the complete new content, never a torn write, and a failure at
//! any point leaves the original file untouched.
//!
//! The crate is built around three pieces:
//!
//! - [`replace_file`]: the platform primitive that atomically moves one file
//!   over another (`rename(2)` on Unix, `MoveFileExW` with write-through on
//!   Windows).
//! - [`AtomicFile`]: a writer that stages bytes in a temp file next to the
//!   destination and either commits them with [`replace_file`] or discards
//!   them. The temp file is deleted on every path that does not end in a
//!   successful commit, including drop.
//! - [`write_file`]: a one-shot helper for callers holding the full content.
//!
//! Source and destination must live on the same filesystem. The crate does
//! not lock against concurrent writers: when several writers commit to the
//! same path the last rename wins.
#![deny(missing_docs)]

pub mod error;
mod guard;
mod options;
pub mod replace;
mod writer;

pub use error::{AtomicFileError, AtomicFileResult};
pub use options::WriteOptions;
pub use replace::replace_file;
pub use writer::{AtomicFile, write_file, write_file_with_options};
