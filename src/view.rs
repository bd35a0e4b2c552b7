//! Typed plane views over a locked buffer.
//!
//! A [`PixelGuard`](crate::PixelGuard) hands out flat bytes; processing code
//! usually wants rows of pixels. These views reinterpret a plane of the
//! locked buffer as `imgref` images with the plane's stride — no copy, no
//! conversion, no allocation. The pixel format is knowledge the caller
//! brings (from the bitmap's own metadata); the views only validate that the
//! plane's geometry fits the locked bytes.

use core::fmt;

use imgref::{Img, ImgRef, ImgRefMut};
use rgb::alt::BGRA;
use rgb::{FromSlice, RGBA};

use crate::bitmap::PlaneDescription;
use crate::guard::PixelGuard;

/// Errors from typed plane view construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ViewError {
    /// No plane with that index was reported at acquisition.
    UnknownPlane,
    /// Plane width or height is zero, or the extent overflows.
    InvalidDimensions,
    /// Plane stride is smaller than `width * bytes_per_pixel`.
    StrideTooSmall,
    /// Plane stride is not a whole number of pixels.
    StrideMisaligned,
    /// The plane's extent runs past the end of the locked bytes.
    Truncated,
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPlane => write!(f, "no plane with that index"),
            Self::InvalidDimensions => write!(f, "plane dimensions are zero or overflow"),
            Self::StrideTooSmall => write!(f, "plane stride is smaller than a pixel row"),
            Self::StrideMisaligned => write!(f, "plane stride is not a whole number of pixels"),
            Self::Truncated => write!(f, "plane extent runs past the locked bytes"),
        }
    }
}

impl core::error::Error for ViewError {}

/// Validate a plane against the locked byte count for a pixel size.
///
/// Returns the plane and its byte span, using the convention that the last
/// row need not carry full stride padding.
fn plane_extent(
    planes: &[PlaneDescription],
    byte_count: usize,
    index: usize,
    bytes_per_pixel: usize,
) -> Result<(PlaneDescription, usize), ViewError> {
    let plane = planes.get(index).copied().ok_or(ViewError::UnknownPlane)?;
    if plane.width == 0 || plane.height == 0 {
        return Err(ViewError::InvalidDimensions);
    }
    let row_bytes = (plane.width as usize)
        .checked_mul(bytes_per_pixel)
        .ok_or(ViewError::InvalidDimensions)?;
    if plane.stride < row_bytes {
        return Err(ViewError::StrideTooSmall);
    }
    if !plane.stride.is_multiple_of(bytes_per_pixel) {
        return Err(ViewError::StrideMisaligned);
    }
    let span = (plane.height as usize - 1)
        .checked_mul(plane.stride)
        .and_then(|rows| rows.checked_add(row_bytes))
        .ok_or(ViewError::InvalidDimensions)?;
    let end = plane
        .start_index
        .checked_add(span)
        .ok_or(ViewError::InvalidDimensions)?;
    if end > byte_count {
        return Err(ViewError::Truncated);
    }
    Ok((plane, span))
}

impl<'b> PixelGuard<'b> {
    /// View plane `index` as single-byte luma pixels.
    pub fn plane_luma8(&self, index: usize) -> Result<ImgRef<'_, u8>, ViewError> {
        let (plane, span) = plane_extent(self.planes(), self.byte_count(), index, 1)?;
        let bytes = &self.bytes()[plane.start_index..plane.start_index + span];
        Ok(Img::new_stride(
            bytes,
            plane.width as usize,
            plane.height as usize,
            plane.stride,
        ))
    }

    /// View plane `index` as writable single-byte luma pixels.
    ///
    /// # Panics
    ///
    /// Panics if the guard was acquired with [`AccessMode::Read`](crate::AccessMode::Read).
    pub fn plane_luma8_mut(&mut self, index: usize) -> Result<ImgRefMut<'_, u8>, ViewError> {
        let (plane, span) = plane_extent(self.planes(), self.byte_count(), index, 1)?;
        let bytes = &mut self.bytes_mut()[plane.start_index..plane.start_index + span];
        Ok(Img::new_stride(
            bytes,
            plane.width as usize,
            plane.height as usize,
            plane.stride,
        ))
    }

    /// View plane `index` as RGBA8 pixels.
    pub fn plane_rgba8(&self, index: usize) -> Result<ImgRef<'_, RGBA<u8>>, ViewError> {
        let (plane, span) = plane_extent(self.planes(), self.byte_count(), index, 4)?;
        let bytes = &self.bytes()[plane.start_index..plane.start_index + span];
        Ok(Img::new_stride(
            bytes.as_rgba(),
            plane.width as usize,
            plane.height as usize,
            plane.stride / 4,
        ))
    }

    /// View plane `index` as writable RGBA8 pixels.
    ///
    /// # Panics
    ///
    /// Panics if the guard was acquired with [`AccessMode::Read`](crate::AccessMode::Read).
    pub fn plane_rgba8_mut(
        &mut self,
        index: usize,
    ) -> Result<ImgRefMut<'_, RGBA<u8>>, ViewError> {
        let (plane, span) = plane_extent(self.planes(), self.byte_count(), index, 4)?;
        let bytes = &mut self.bytes_mut()[plane.start_index..plane.start_index + span];
        Ok(Img::new_stride(
            bytes.as_rgba_mut(),
            plane.width as usize,
            plane.height as usize,
            plane.stride / 4,
        ))
    }

    /// View plane `index` as BGRA8 pixels (the common packed layout on
    /// Windows bitmaps).
    pub fn plane_bgra8(&self, index: usize) -> Result<ImgRef<'_, BGRA<u8>>, ViewError> {
        let (plane, span) = plane_extent(self.planes(), self.byte_count(), index, 4)?;
        let bytes = &self.bytes()[plane.start_index..plane.start_index + span];
        Ok(Img::new_stride(
            bytes.as_bgra(),
            plane.width as usize,
            plane.height as usize,
            plane.stride / 4,
        ))
    }

    /// View plane `index` as writable BGRA8 pixels.
    ///
    /// # Panics
    ///
    /// Panics if the guard was acquired with [`AccessMode::Read`](crate::AccessMode::Read).
    pub fn plane_bgra8_mut(
        &mut self,
        index: usize,
    ) -> Result<ImgRefMut<'_, BGRA<u8>>, ViewError> {
        let (plane, span) = plane_extent(self.planes(), self.byte_count(), index, 4)?;
        let bytes = &mut self.bytes_mut()[plane.start_index..plane.start_index + span];
        Ok(Img::new_stride(
            bytes.as_bgra_mut(),
            plane.width as usize,
            plane.height as usize,
            plane.stride / 4,
        ))
    }
}
