//! # GridMorph Core
//!
//! Core types, runtime type dispatch and neighborhood views for the
//! GridMorph image-processing library.
//!
//! This crate provides:
//! - `TypeDescriptor` / `Variant`: runtime-tagged value types
//! - `Image<T>`: generic N-dimensional image over a dense buffer
//! - `DynImage`: the opaque, type-erased image handle
//! - `dispatch`: trial-downcast dispatch from erased entry points to typed
//!   implementations
//! - `StructuringElement` / `Neighborhood`: neighbor-offset sets and
//!   iteration views for the neighborhood operators
//! - Algorithm traits for consistent API

pub mod dispatch;
pub mod error;
pub mod image;
pub mod se;
pub mod types;
pub mod variant;

pub use error::{Error, Result};
pub use image::{Coordinate, DynImage, Image, PixelValue, ScalarPixel};
pub use se::StructuringElement;
pub use types::{CompoundKind, ScalarKind, TypeDescriptor};
pub use variant::{describe, Variant};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::dispatch::{first_suitable, Tried};
    pub use crate::error::{Error, Result};
    pub use crate::image::{
        create_image, downcast_image, downcast_image_mut, set_same, Coordinate, DynImage,
        Image, Neighborhood, PixelValue, ScalarPixel,
    };
    pub use crate::se::StructuringElement;
    pub use crate::types::{CompoundKind, ScalarKind, TypeDescriptor};
    pub use crate::variant::{describe, Variant, VariantValue};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in GridMorph.
///
/// Algorithms are pure functions that transform input data according to
/// parameters. The erased entry points implement it over boxed
/// [`DynImage`] handles so callers can hold a uniform collection of
/// operators.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(
        &self,
        input: Self::Input,
        params: Self::Params,
    ) -> std::result::Result<Self::Output, Self::Error>;
}
