use std::{fs, io, path::Path};

/// A plain `rename(2)`: atomic on a single filesystem, and the destination's
/// inode is swapped for the source's.
pub(super) fn replace(src: &Path, dst: &Path) -> io::Result<()> {
    fs::rename(src, dst)
}
