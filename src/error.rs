//! Acquisition errors.

use core::fmt;

/// Errors from pixel buffer acquisition.
///
/// This enumeration is closed: each stage of the acquisition pipeline has
/// exactly one failure here, so callers can match exhaustively and tests can
/// tell the stages apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessError {
    /// The bitmap handle has no backing storage (never allocated, already
    /// released, or zero-sized).
    UnallocatedBitmap,
    /// The platform refused the buffer lock because another lock is held.
    LockContended,
    /// The buffer reference does not expose a raw-byte-access capability.
    CapabilityUnavailable,
    /// The capability was present but the pointer/capacity retrieval failed.
    RetrievalFailed,
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnallocatedBitmap => write!(f, "bitmap has no backing storage"),
            Self::LockContended => write!(f, "buffer lock is already held"),
            Self::CapabilityUnavailable => {
                write!(f, "buffer does not expose raw byte access")
            }
            Self::RetrievalFailed => write!(f, "raw buffer retrieval failed"),
        }
    }
}

impl core::error::Error for AccessError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn display_messages() {
        assert_eq!(
            format!("{}", AccessError::UnallocatedBitmap),
            "bitmap has no backing storage"
        );
        assert!(format!("{}", AccessError::LockContended).contains("lock"));
        assert!(format!("{}", AccessError::CapabilityUnavailable).contains("byte access"));
        assert!(format!("{}", AccessError::RetrievalFailed).contains("retrieval"));
    }

    #[test]
    fn usable_as_error_trait_object() {
        let err: &dyn core::error::Error = &AccessError::RetrievalFailed;
        assert!(err.source().is_none());
    }
}
