//! Tunables for how a staged write is created and committed.

/// Options controlling how an atomic write stages and commits its temp file.
///
/// ```
/// use atomicfile::WriteOptions;
///
/// let opts = WriteOptions::new().mode(0o600).sync(false);
/// assert_eq!(opts.get_mode(), 0o600);
/// assert!(!opts.get_sync());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    mode: u32,
    sync: bool,
}

impl WriteOptions {
    /// Permission bits used by [`write_file`](crate::write_file).
    pub const DEFAULT_MODE: u32 = 0o644;

    /// Defaults: mode `0o644`, fsync before commit.
    pub fn new() -> Self {
        Self {
            mode: Self::DEFAULT_MODE,
            sync: true,
        }
    }

    /// Permission bits for the temp file, and therefore for the committed
    /// file.
    ///
    /// Only honored on Unix, where the process umask still applies. Ignored
    /// elsewhere.
    pub fn mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Whether to `fsync` the temp file before renaming it into place.
    ///
    /// Turning this off keeps the all-or-nothing visibility guarantee but
    /// gives up durability across a power loss.
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Configured permission bits.
    pub fn get_mode(&self) -> u32 {
        self.mode
    }

    /// Whether the temp file is synced before commit.
    pub fn get_sync(&self) -> bool {
        self.sync
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self::new()
    }
}
