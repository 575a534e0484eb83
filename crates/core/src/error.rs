//! Error types for GridMorph
//!
//! Every fallible operation in the library returns a value of this closed
//! enum; there is no panicking error path in non-test code. Composite
//! operations check every intermediate result and abort on the first
//! failure, passing the inner code through unchanged. A failed call leaves
//! output images in an unspecified but safe state.

use thiserror::Error;

use crate::image::coords::Coordinate;
use crate::types::TypeDescriptor;

/// Main error type for GridMorph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("image is already allocated")]
    AlreadyAllocated,

    #[error("image is not allocated")]
    NotAllocated,

    #[error("invalid parameter: {0}")]
    BadParameters(String),

    #[error("size mismatch: expected {expected}, got {actual}")]
    BadSize {
        expected: Coordinate,
        actual: Coordinate,
    },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("coordinate {coordinate} out of bounds for size {size}")]
    OutOfBounds {
        coordinate: Coordinate,
        size: Coordinate,
    },

    /// Runtime type mismatch. Inside the dispatcher this is the ordinary
    /// "try the next candidate" signal and never surfaces; it only reaches
    /// callers through direct [`crate::variant::Variant`] accessors.
    #[error("bad cast: expected {expected}, found {found}")]
    BadCast {
        expected: TypeDescriptor,
        found: TypeDescriptor,
    },

    /// No dispatch candidate matched the runtime argument types. Recoverable:
    /// callers may retry with another type combination or report the
    /// combination as unsupported.
    #[error("no dispatch candidate accepts the runtime argument types")]
    NotImplemented,

    #[error("{0} exceeds the representable range")]
    Overflow(&'static str),
}

/// Result type alias for GridMorph operations
pub type Result<T> = std::result::Result<T, Error>;
