//! Software-backed bitmap.
//!
//! [`MemoryBitmap`] implements the platform seam over plain heap storage.
//! Tests use it as a stand-in platform; callers can use it wherever bitmap
//! locking semantics are wanted without a real platform behind them.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{RefCell, RefMut};

use crate::access::{AccessMode, LockCapabilities};
use crate::bitmap::{Bitmap, BufferLock, PlaneDescription, RawByteAccess};
use crate::error::AccessError;

/// A bitmap whose pixel storage is an owned heap buffer.
///
/// Locking is exclusive in both access modes: an overlapping
/// [`lock_buffer`](Bitmap::lock_buffer) reports
/// [`AccessError::LockContended`] instead of blocking or aliasing. A handle
/// built with [`unallocated`](Self::unallocated) (or with zero bytes) has no
/// backing storage and is rejected at acquisition.
#[derive(Debug)]
pub struct MemoryBitmap {
    storage: RefCell<Vec<u8>>,
    planes: Vec<PlaneDescription>,
}

impl MemoryBitmap {
    /// Allocate zero-filled storage of `byte_count` bytes.
    pub fn new(byte_count: usize) -> Self {
        Self::from_vec(vec![0u8; byte_count])
    }

    /// Wrap existing bytes as the backing storage.
    pub fn from_vec(storage: Vec<u8>) -> Self {
        Self {
            storage: RefCell::new(storage),
            planes: Vec::new(),
        }
    }

    /// Wrap existing bytes and attach a plane layout.
    ///
    /// The layout is reported through [`BufferLock::planes`] and captured by
    /// the guard; it is metadata pass-through, not validated against the
    /// storage here.
    pub fn with_planes(storage: Vec<u8>, planes: Vec<PlaneDescription>) -> Self {
        Self {
            storage: RefCell::new(storage),
            planes,
        }
    }

    /// A handle with no backing storage. Acquisition rejects it with
    /// [`AccessError::UnallocatedBitmap`].
    pub fn unallocated() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Total bytes of backing storage.
    ///
    /// # Panics
    ///
    /// Panics if the storage is currently locked.
    pub fn byte_capacity(&self) -> usize {
        self.storage.borrow().len()
    }

    /// Copy the backing storage into `dst` (up to `dst.len()` bytes).
    ///
    /// Independent of the lock pipeline — this is how callers observe pixel
    /// data without holding a lock.
    ///
    /// # Panics
    ///
    /// Panics if the storage is currently locked.
    pub fn copy_to(&self, dst: &mut [u8]) {
        let storage = self.storage.borrow();
        let n = dst.len().min(storage.len());
        dst[..n].copy_from_slice(&storage[..n]);
    }

    /// Snapshot the backing storage.
    ///
    /// # Panics
    ///
    /// Panics if the storage is currently locked.
    pub fn to_vec(&self) -> Vec<u8> {
        self.storage.borrow().clone()
    }
}

impl Bitmap for MemoryBitmap {
    fn is_allocated(&self) -> bool {
        // A locked bitmap is by definition allocated; don't contend on the
        // RefCell just to answer that.
        match self.storage.try_borrow() {
            Ok(storage) => !storage.is_empty(),
            Err(_) => true,
        }
    }

    fn lock_buffer<'b>(
        &'b self,
        _mode: AccessMode,
    ) -> Result<Box<dyn BufferLock<'b> + 'b>, AccessError> {
        // Exclusive in both modes; the mode only governs what the guard
        // permits, not who else may lock.
        let storage = self
            .storage
            .try_borrow_mut()
            .map_err(|_| AccessError::LockContended)?;
        Ok(Box::new(MemoryLock {
            storage,
            planes: &self.planes,
        }))
    }
}

struct MemoryLock<'b> {
    storage: RefMut<'b, Vec<u8>>,
    planes: &'b [PlaneDescription],
}

impl<'b> BufferLock<'b> for MemoryLock<'b> {
    fn capabilities(&self) -> LockCapabilities {
        LockCapabilities::new()
            .with_raw_byte_access(true)
            .with_plane_layout(!self.planes.is_empty())
    }

    fn planes(&self) -> &[PlaneDescription] {
        self.planes
    }

    fn into_byte_access(self: Box<Self>) -> Result<Box<dyn RawByteAccess + 'b>, AccessError> {
        // Memory storage always supports raw byte access; the RefMut moves
        // into the capability object, so the lock outlives the lookup.
        Ok(Box::new(MemoryByteAccess {
            storage: self.storage,
        }))
    }
}

struct MemoryByteAccess<'b> {
    storage: RefMut<'b, Vec<u8>>,
}

impl RawByteAccess for MemoryByteAccess<'_> {
    fn bytes(&self) -> &[u8] {
        &self.storage
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.storage
    }
}
