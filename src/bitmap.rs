//! The platform seam: bitmap, lock, and byte-access traits.
//!
//! A platform bitmap keeps its pixel storage behind an opaque handle. Access
//! goes through three steps, each a typed operation here:
//!
//! 1. [`Bitmap::lock_buffer`] — request a buffer lock from the platform
//! 2. [`BufferLock::into_byte_access`] — look up the raw-byte-access
//!    capability; not every buffer exposes one
//! 3. [`RawByteAccess`] — the capability itself; holding it keeps the lock
//!    alive, so the byte view can never outlive the lock that guards it
//!
//! Most callers use [`acquire_pixels`](crate::acquire_pixels), which runs the
//! pipeline and wraps the result in a [`PixelGuard`](crate::PixelGuard).
//! Platform backends implement these traits; [`MemoryBitmap`](crate::MemoryBitmap)
//! is the software-backed implementation.

use alloc::boxed::Box;

use crate::access::{AccessMode, LockCapabilities};
use crate::error::AccessError;
use crate::guard::PixelGuard;

/// Layout of one plane within a locked buffer.
///
/// Reported by platforms that know their buffer layout (planar video formats
/// have several planes; packed formats have one). Offsets and strides are in
/// bytes; the byte width of a pixel is format knowledge the caller brings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub struct PlaneDescription {
    /// Byte offset of the plane's first pixel from the start of the buffer.
    pub start_index: usize,
    /// Plane width in pixels.
    pub width: u32,
    /// Plane height in rows.
    pub height: u32,
    /// Byte stride between row starts.
    pub stride: usize,
}

impl PlaneDescription {
    /// Create a plane description.
    pub const fn new(start_index: usize, width: u32, height: u32, stride: usize) -> Self {
        Self {
            start_index,
            width,
            height,
            stride,
        }
    }

    /// Byte span of the plane at full stride (`stride * height`).
    #[inline]
    pub const fn full_byte_span(&self) -> usize {
        self.stride * self.height as usize
    }
}

/// An opaque, externally owned bitmap exposing pixel storage indirectly.
///
/// Implementors own (or front for) the backing storage; this crate never
/// allocates, reallocates, or frees it — it only locks the storage for the
/// duration of an acquisition.
pub trait Bitmap {
    /// Whether backing storage is present and non-empty.
    ///
    /// Handles can exist without storage (never allocated, or released by
    /// the platform). Acquisition rejects such handles up front with
    /// [`AccessError::UnallocatedBitmap`] instead of locking nothing.
    fn is_allocated(&self) -> bool;

    /// Request a lock on the backing buffer.
    ///
    /// The lock is a scoped resource: it is released when the returned
    /// object (or the capability derived from it) is dropped. Platforms
    /// that forbid overlapping locks report [`AccessError::LockContended`];
    /// this crate performs no mutual exclusion of its own.
    fn lock_buffer<'b>(
        &'b self,
        mode: AccessMode,
    ) -> Result<Box<dyn BufferLock<'b> + 'b>, AccessError>;

    /// Convenience: run the full acquisition pipeline on this bitmap.
    ///
    /// Equivalent to [`acquire_pixels(self, mode)`](crate::acquire_pixels).
    fn pixels(&self, mode: AccessMode) -> Result<PixelGuard<'_>, AccessError>
    where
        Self: Sized,
    {
        crate::guard::acquire_pixels(self, mode)
    }
}

/// A held lock on a bitmap's backing buffer.
///
/// Dropping the lock releases it. [`into_byte_access`](Self::into_byte_access)
/// consumes the lock into its raw-byte-access capability; on failure the lock
/// is dropped (and thus released) before the error reaches the caller, so a
/// failed acquisition never leaves a lock behind.
pub trait BufferLock<'b> {
    /// What this lock supports.
    fn capabilities(&self) -> LockCapabilities;

    /// Plane layout of the locked buffer, empty when the platform does not
    /// report layout (check
    /// [`capabilities().plane_layout()`](LockCapabilities::plane_layout)).
    fn planes(&self) -> &[PlaneDescription] {
        &[]
    }

    /// Look up the raw-byte-access capability and retrieve the byte view.
    ///
    /// This is the typed replacement for the original ABI's two-step probe
    /// (query an optional interface, then fetch pointer and capacity).
    ///
    /// # Errors
    ///
    /// [`AccessError::CapabilityUnavailable`] when the buffer does not
    /// expose raw byte access, [`AccessError::RetrievalFailed`] when the
    /// capability was present but the retrieval itself failed.
    fn into_byte_access(self: Box<Self>) -> Result<Box<dyn RawByteAccess + 'b>, AccessError>;
}

/// The raw-byte-access capability of a locked buffer.
///
/// Every fallible step happened before one of these exists, so access is
/// infallible. Implementors own their lock state: the underlying platform
/// lock is held until the capability object is dropped.
pub trait RawByteAccess {
    /// The locked bytes.
    fn bytes(&self) -> &[u8];

    /// The locked bytes, writable.
    fn bytes_mut(&mut self) -> &mut [u8];
}
