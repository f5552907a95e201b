use std::{io, os::windows::ffi::OsStrExt, path::Path};

use windows_sys::Win32::Storage::FileSystem::{
    MOVEFILE_REPLACE_EXISTING, MOVEFILE_WRITE_THROUGH, MoveFileExW,
};

/// Encode `path` as a NUL-terminated UTF-16 string for the wide Win32 APIs.
fn to_wide(path: &Path) -> io::Result<Vec<u16>> {
    let mut wide: Vec<u16> = path.as_os_str().encode_wide().collect();
    if wide.contains(&0) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "path contains an interior NUL",
        ));
    }
    wide.push(0);
    Ok(wide)
}

/// `MoveFileExW` with replace-existing and write-through, so the move is
/// flushed to disk before returning.
pub(super) fn replace(src: &Path, dst: &Path) -> io::Result<()> {
    let src = to_wide(src)?;
    let dst = to_wide(dst)?;

    // SAFETY: both buffers are NUL-terminated and live across the call.
    let ok = unsafe {
        MoveFileExW(
            src.as_ptr(),
            dst.as_ptr(),
            MOVEFILE_REPLACE_EXISTING | MOVEFILE_WRITE_THROUGH,
        )
    };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
