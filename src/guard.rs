//! Pixel buffer acquisition and the owning guard.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

use crate::access::AccessMode;
use crate::bitmap::{Bitmap, PlaneDescription, RawByteAccess};
use crate::error::AccessError;

/// Acquire a locked byte view of a bitmap's pixel storage.
///
/// Runs the full pipeline: validates that the handle has backing storage,
/// requests the platform lock, looks up the raw-byte-access capability, and
/// wraps the resulting view in a [`PixelGuard`]. The lock is held until the
/// guard is dropped or [`released`](PixelGuard::release).
///
/// On success the view is non-empty (`byte_count() > 0`) and aliases the
/// bitmap's real backing store — writes made through a `ReadWrite` guard are
/// visible through any other accessor once the guard is released.
///
/// # Errors
///
/// - [`AccessError::UnallocatedBitmap`] — the handle has no backing storage
/// - [`AccessError::LockContended`] — the platform refused the lock
/// - [`AccessError::CapabilityUnavailable`] — no raw-byte-access capability
/// - [`AccessError::RetrievalFailed`] — the byte view could not be retrieved
///
/// On any error the acquisition leaves nothing behind: whatever lock was
/// taken has already been released by drop.
pub fn acquire_pixels<B: Bitmap + ?Sized>(
    bitmap: &B,
    mode: AccessMode,
) -> Result<PixelGuard<'_>, AccessError> {
    if !bitmap.is_allocated() {
        return Err(AccessError::UnallocatedBitmap);
    }
    let lock = bitmap.lock_buffer(mode)?;
    let planes: Vec<PlaneDescription> = lock.planes().to_vec();
    let access = lock.into_byte_access()?;
    let byte_count = access.bytes().len();
    if byte_count == 0 {
        // is_allocated lied or the storage vanished under the lock; either
        // way the success guarantee (capacity > 0) cannot be met.
        return Err(AccessError::UnallocatedBitmap);
    }
    Ok(PixelGuard {
        access,
        planes,
        mode,
        byte_count,
    })
}

/// Owning guard over a locked pixel buffer view.
///
/// The guard holds the platform lock for its whole lifetime. The original
/// ABI returned a bare pointer whose guarding lock died at function return;
/// here the coupling is an ownership contract: the view is reachable only
/// through the guard, and release happens exactly once, on drop or via
/// [`release`](Self::release).
pub struct PixelGuard<'b> {
    access: Box<dyn RawByteAccess + 'b>,
    planes: Vec<PlaneDescription>,
    mode: AccessMode,
    byte_count: usize,
}

impl<'b> PixelGuard<'b> {
    /// Total addressable bytes in the view. Always greater than zero.
    #[inline]
    pub fn byte_count(&self) -> usize {
        self.byte_count
    }

    /// The access mode this guard was acquired with.
    #[inline]
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Plane layout captured at acquisition, empty when the platform does
    /// not report layout.
    #[inline]
    pub fn planes(&self) -> &[PlaneDescription] {
        &self.planes
    }

    /// Description of plane `index`, if the platform reported one.
    #[inline]
    pub fn plane(&self, index: usize) -> Option<PlaneDescription> {
        self.planes.get(index).copied()
    }

    /// The locked bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        self.access.bytes()
    }

    /// The locked bytes, writable.
    ///
    /// # Panics
    ///
    /// Panics if the guard was acquired with [`AccessMode::Read`].
    #[inline]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        assert!(
            self.mode.is_writable(),
            "pixel guard was acquired read-only"
        );
        self.access.bytes_mut()
    }

    /// Raw pointer to the first byte, for native callers.
    ///
    /// Valid exactly as long as the guard lives; never null. The caller
    /// must not free it — the storage belongs to the bitmap.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.access.bytes().as_ptr()
    }

    /// Raw writable pointer to the first byte, for native callers.
    ///
    /// # Panics
    ///
    /// Panics if the guard was acquired with [`AccessMode::Read`].
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes_mut().as_mut_ptr()
    }

    /// Release the lock now instead of at end of scope.
    ///
    /// Dropping the guard has the same effect; this form just makes the
    /// release point visible in calling code.
    pub fn release(self) {}
}

impl fmt::Debug for PixelGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PixelGuard({} bytes, {:?}, {} planes)",
            self.byte_count,
            self.mode,
            self.planes.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::LockCapabilities;
    use crate::bitmap::BufferLock;
    use crate::memory::MemoryBitmap;
    use alloc::format;
    use alloc::vec;

    // --- stub platform whose buffers fail at a chosen stage ---

    enum FailAt {
        Capability,
        Retrieval,
    }

    struct FailingBitmap {
        fail_at: FailAt,
    }

    struct FailingLock<'b> {
        fail_at: &'b FailAt,
    }

    impl Bitmap for FailingBitmap {
        fn is_allocated(&self) -> bool {
            true
        }
        fn lock_buffer<'b>(
            &'b self,
            _mode: AccessMode,
        ) -> Result<Box<dyn BufferLock<'b> + 'b>, AccessError> {
            Ok(Box::new(FailingLock {
                fail_at: &self.fail_at,
            }))
        }
    }

    impl<'b> BufferLock<'b> for FailingLock<'b> {
        fn capabilities(&self) -> LockCapabilities {
            LockCapabilities::new()
        }
        fn into_byte_access(
            self: Box<Self>,
        ) -> Result<Box<dyn RawByteAccess + 'b>, AccessError> {
            match self.fail_at {
                FailAt::Capability => Err(AccessError::CapabilityUnavailable),
                FailAt::Retrieval => Err(AccessError::RetrievalFailed),
            }
        }
    }

    // --- success path ---

    #[test]
    fn success_reports_full_capacity() {
        let bitmap = MemoryBitmap::new(128);
        let guard = acquire_pixels(&bitmap, AccessMode::ReadWrite).unwrap();
        assert_eq!(guard.byte_count(), 128);
        assert_eq!(guard.bytes().len(), 128);
        assert!(!guard.as_ptr().is_null());
        assert_eq!(guard.mode(), AccessMode::ReadWrite);
    }

    #[test]
    fn pointer_and_slice_agree() {
        let bitmap = MemoryBitmap::new(16);
        let mut guard = acquire_pixels(&bitmap, AccessMode::ReadWrite).unwrap();
        assert_eq!(guard.as_ptr(), guard.bytes().as_ptr());
        let ptr = guard.as_mut_ptr();
        assert_eq!(ptr, guard.bytes_mut().as_mut_ptr());
    }

    // --- write-through: the view aliases the backing store, not a copy ---

    #[test]
    fn writes_reach_backing_store() {
        let bitmap = MemoryBitmap::new(8);
        {
            let mut guard = acquire_pixels(&bitmap, AccessMode::ReadWrite).unwrap();
            for (i, byte) in guard.bytes_mut().iter_mut().enumerate() {
                *byte = i as u8 * 3;
            }
        }
        // Independent accessor observes every write.
        let snapshot = bitmap.to_vec();
        for (i, byte) in snapshot.iter().enumerate() {
            assert_eq!(*byte, i as u8 * 3);
        }
    }

    // --- failure stages are distinguishable ---

    #[test]
    fn capability_unavailable() {
        let bitmap = FailingBitmap {
            fail_at: FailAt::Capability,
        };
        let err = acquire_pixels(&bitmap, AccessMode::ReadWrite).err();
        assert_eq!(err, Some(AccessError::CapabilityUnavailable));
    }

    #[test]
    fn retrieval_failed() {
        let bitmap = FailingBitmap {
            fail_at: FailAt::Retrieval,
        };
        let err = acquire_pixels(&bitmap, AccessMode::ReadWrite).err();
        assert_eq!(err, Some(AccessError::RetrievalFailed));
    }

    // --- repeated acquisition ---

    #[test]
    fn reacquisition_is_consistent() {
        let bitmap = MemoryBitmap::from_vec(vec![0u8; 32]);

        let mut first = acquire_pixels(&bitmap, AccessMode::ReadWrite).unwrap();
        let count = first.byte_count();
        first.bytes_mut()[7] = 0xAB;
        first.release();

        let second = acquire_pixels(&bitmap, AccessMode::Read).unwrap();
        assert_eq!(second.byte_count(), count);
        // Same storage, not a fresh allocation.
        assert_eq!(second.bytes()[7], 0xAB);
    }

    // --- unallocated handles are rejected up front ---

    #[test]
    fn unallocated_bitmap_rejected() {
        let bitmap = MemoryBitmap::unallocated();
        let err = acquire_pixels(&bitmap, AccessMode::ReadWrite).err();
        assert_eq!(err, Some(AccessError::UnallocatedBitmap));
    }

    #[test]
    fn zero_sized_bitmap_rejected() {
        let bitmap = MemoryBitmap::new(0);
        let err = acquire_pixels(&bitmap, AccessMode::Read).err();
        assert_eq!(err, Some(AccessError::UnallocatedBitmap));
    }

    // --- lock scoping ---

    #[test]
    fn overlapping_acquisition_contends() {
        let bitmap = MemoryBitmap::new(4);
        let guard = acquire_pixels(&bitmap, AccessMode::ReadWrite).unwrap();
        let err = acquire_pixels(&bitmap, AccessMode::Read).err();
        assert_eq!(err, Some(AccessError::LockContended));
        drop(guard);
        // Released exactly once; the bitmap is lockable again.
        assert!(acquire_pixels(&bitmap, AccessMode::Read).is_ok());
    }

    #[test]
    fn explicit_release_frees_lock() {
        let bitmap = MemoryBitmap::new(4);
        // A read-only guard still takes the platform lock...
        let guard = acquire_pixels(&bitmap, AccessMode::Read).unwrap();
        guard.release();
        // ...and an explicit release frees it for the next caller.
        let again = acquire_pixels(&bitmap, AccessMode::ReadWrite);
        assert!(again.is_ok());
    }

    #[test]
    fn failed_lookup_releases_lock() {
        // Wraps real memory storage but never exposes byte access, so the
        // lookup fails after a genuine lock was taken.
        struct NoByteAccess {
            inner: MemoryBitmap,
        }
        struct OpaqueLock<'b> {
            _inner: Box<dyn BufferLock<'b> + 'b>,
        }

        impl Bitmap for NoByteAccess {
            fn is_allocated(&self) -> bool {
                self.inner.is_allocated()
            }
            fn lock_buffer<'b>(
                &'b self,
                mode: AccessMode,
            ) -> Result<Box<dyn BufferLock<'b> + 'b>, AccessError> {
                Ok(Box::new(OpaqueLock {
                    _inner: self.inner.lock_buffer(mode)?,
                }))
            }
        }

        impl<'b> BufferLock<'b> for OpaqueLock<'b> {
            fn capabilities(&self) -> LockCapabilities {
                LockCapabilities::new()
            }
            fn into_byte_access(
                self: Box<Self>,
            ) -> Result<Box<dyn RawByteAccess + 'b>, AccessError> {
                Err(AccessError::CapabilityUnavailable)
            }
        }

        let bitmap = NoByteAccess {
            inner: MemoryBitmap::new(4),
        };
        let err = acquire_pixels(&bitmap, AccessMode::ReadWrite).err();
        assert_eq!(err, Some(AccessError::CapabilityUnavailable));
        // The failed acquisition dropped the inner lock on its way out.
        assert!(bitmap.inner.lock_buffer(AccessMode::Read).is_ok());
    }

    #[test]
    #[should_panic(expected = "read-only")]
    fn read_only_guard_rejects_writes() {
        let bitmap = MemoryBitmap::new(4);
        let mut guard = acquire_pixels(&bitmap, AccessMode::Read).unwrap();
        let _ = guard.bytes_mut();
    }

    // --- convenience method on the trait ---

    #[test]
    fn bitmap_pixels_convenience() {
        let bitmap = MemoryBitmap::new(12);
        let guard = bitmap.pixels(AccessMode::Read).unwrap();
        assert_eq!(guard.byte_count(), 12);
    }

    // --- plane metadata passes through ---

    #[test]
    fn planes_captured_at_acquisition() {
        let plane = PlaneDescription::new(0, 4, 2, 16);
        let bitmap = MemoryBitmap::with_planes(vec![0u8; 32], vec![plane]);
        let guard = acquire_pixels(&bitmap, AccessMode::Read).unwrap();
        assert_eq!(guard.planes(), &[plane]);
        assert_eq!(guard.plane(0), Some(plane));
        assert_eq!(guard.plane(1), None);
    }

    #[test]
    fn debug_format() {
        let bitmap = MemoryBitmap::new(64);
        let guard = acquire_pixels(&bitmap, AccessMode::ReadWrite).unwrap();
        assert_eq!(
            format!("{guard:?}"),
            "PixelGuard(64 bytes, ReadWrite, 0 planes)"
        );
    }
}
