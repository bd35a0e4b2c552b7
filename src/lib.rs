//! Scoped, capability-checked access to bitmap pixel storage.
//!
//! Platform image objects keep their pixel storage behind an opaque handle.
//! Pixel-processing code that cannot work with the platform's abstract bitmap
//! type needs a flat byte view of that storage — but the view is only valid
//! while the platform's buffer lock is held. This crate makes that coupling
//! explicit:
//!
//! - [`Bitmap`] / [`BufferLock`] / [`RawByteAccess`] — the platform seam:
//!   lock a bitmap's backing buffer, then look up its raw-byte-access
//!   capability as a typed `Result` instead of a reflective interface query
//! - [`acquire_pixels`] — run the whole acquisition pipeline in one call
//! - [`PixelGuard`] — owning guard over the locked view; the lock is held
//!   exactly as long as the guard lives and released exactly once
//! - [`AccessError`] — closed enumeration of the acquisition failures
//! - [`MemoryBitmap`] — software-backed [`Bitmap`] for tests and callers
//!   without a platform
//! - [`PlaneDescription`] + typed plane views over `imgref`/`rgb` — optional
//!   layout metadata and structured row access for processing code
//!
//! ```
//! use zenlock::{AccessMode, MemoryBitmap, acquire_pixels};
//!
//! let bitmap = MemoryBitmap::new(64);
//! let mut guard = acquire_pixels(&bitmap, AccessMode::ReadWrite)?;
//! assert_eq!(guard.byte_count(), 64);
//! guard.bytes_mut()[0] = 0xFF;
//! guard.release(); // lock released; writes are visible through the bitmap
//! assert_eq!(bitmap.to_vec()[0], 0xFF);
//! # Ok::<(), zenlock::AccessError>(())
//! ```

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

mod access;
mod bitmap;
mod error;
mod guard;
mod memory;
mod view;

pub use access::{AccessMode, LockCapabilities};
pub use bitmap::{Bitmap, BufferLock, PlaneDescription, RawByteAccess};
pub use error::AccessError;
pub use guard::{PixelGuard, acquire_pixels};
pub use memory::MemoryBitmap;
pub use view::ViewError;

// Re-exports for implementors and users of the typed plane views.
pub use imgref::{Img, ImgRef, ImgRefMut};
pub use rgb;
pub use rgb::RGBA as Rgba;
pub use rgb::alt::BGRA as Bgra;
