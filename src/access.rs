//! Access modes and lock capability descriptors.

/// Requested access to a bitmap's backing buffer.
///
/// Mirrors the platform's buffer access mode. A write-only mode is not
/// offered: a byte view handed out as `&mut [u8]` is always readable, so a
/// write-only contract could not be enforced here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// Read-only view. [`PixelGuard::bytes_mut`](crate::PixelGuard::bytes_mut)
    /// panics on a guard acquired with this mode.
    Read,
    /// Read/write view of the backing storage.
    ReadWrite,
}

impl AccessMode {
    /// Whether this mode permits writes through the acquired view.
    #[inline]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

/// Describes what a [`BufferLock`](crate::BufferLock) supports.
///
/// Returned by [`BufferLock::capabilities`](crate::BufferLock::capabilities).
/// Lets callers discover lock behavior before acquiring, instead of probing
/// by trial. The struct uses getter methods so fields can be added over time
/// without breaking changes.
///
/// # Example
///
/// ```
/// use zenlock::LockCapabilities;
///
/// static CAPS: LockCapabilities = LockCapabilities::new()
///     .with_raw_byte_access(true)
///     .with_plane_layout(true);
///
/// assert!(CAPS.raw_byte_access());
/// assert!(!CAPS.concurrent_reads());
/// ```
#[non_exhaustive]
pub struct LockCapabilities {
    raw_byte_access: bool,
    concurrent_reads: bool,
    plane_layout: bool,
}

impl Default for LockCapabilities {
    fn default() -> Self {
        Self::new()
    }
}

impl LockCapabilities {
    /// Create capabilities with everything disabled.
    pub const fn new() -> Self {
        Self {
            raw_byte_access: false,
            concurrent_reads: false,
            plane_layout: false,
        }
    }

    /// Whether the lock can be consumed into a raw-byte-access capability.
    pub const fn raw_byte_access(&self) -> bool {
        self.raw_byte_access
    }

    /// Whether the platform allows several read locks on the same bitmap at
    /// once. When false, any overlapping lock attempt reports
    /// [`AccessError::LockContended`](crate::AccessError::LockContended).
    pub const fn concurrent_reads(&self) -> bool {
        self.concurrent_reads
    }

    /// Whether [`BufferLock::planes`](crate::BufferLock::planes) reports the
    /// buffer's plane layout (rather than an empty slice).
    pub const fn plane_layout(&self) -> bool {
        self.plane_layout
    }

    // --- const builder methods for static construction ---

    /// Set raw-byte-access support.
    pub const fn with_raw_byte_access(mut self, v: bool) -> Self {
        self.raw_byte_access = v;
        self
    }

    /// Set concurrent read-lock support.
    pub const fn with_concurrent_reads(mut self, v: bool) -> Self {
        self.concurrent_reads = v;
        self
    }

    /// Set plane-layout reporting.
    pub const fn with_plane_layout(mut self, v: bool) -> Self {
        self.plane_layout = v;
        self
    }
}

impl core::fmt::Debug for LockCapabilities {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LockCapabilities")
            .field("raw_byte_access", &self.raw_byte_access)
            .field("concurrent_reads", &self.concurrent_reads)
            .field("plane_layout", &self.plane_layout)
            .finish()
    }
}
