//! Shared plumbing for the erased entry points
//!
//! Argument bundles passed through the dispatcher, typed geometry checks and
//! the pointwise helpers the composite operators are built from.

use gridmorph_core::image::{DynImage, Image, PixelValue};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::variant::Variant;
use gridmorph_core::{Error, Result};

/// Arguments of a one-input, one-output neighborhood operator.
pub(crate) struct UnaryArgs<'a> {
    pub input: &'a dyn DynImage,
    pub se: &'a StructuringElement,
    pub output: &'a mut dyn DynImage,
}

/// Arguments of a one-input operator with a numeric level parameter.
pub(crate) struct UnaryLevelArgs<'a> {
    pub input: &'a dyn DynImage,
    pub level: &'a Variant,
    pub se: &'a StructuringElement,
    pub output: &'a mut dyn DynImage,
}

/// Arguments of a marker/mask operator.
pub(crate) struct BinaryArgs<'a> {
    pub marker: &'a dyn DynImage,
    pub mask: &'a dyn DynImage,
    pub se: &'a StructuringElement,
    pub output: &'a mut dyn DynImage,
}

/// Arguments of the labelling entry points.
pub(crate) struct LabelArgs<'a> {
    pub input: &'a dyn DynImage,
    pub se: &'a StructuringElement,
    pub output: &'a mut dyn DynImage,
}

/// Arguments of the distance entry points.
pub(crate) struct DistanceArgs<'a> {
    pub input: &'a dyn DynImage,
    pub se: &'a StructuringElement,
    pub distance: &'a mut dyn DynImage,
    pub residual: &'a mut dyn DynImage,
}

/// Typed counterpart of [`gridmorph_core::image::set_same`]: give `target`
/// the geometry of `reference`, or fail when it already differs.
pub(crate) fn ensure_same_geometry<T: PixelValue, U: PixelValue>(
    reference: &Image<T>,
    target: &mut Image<U>,
) -> Result<()> {
    if !reference.is_allocated() {
        return Err(Error::NotAllocated);
    }
    if !target.is_allocated() {
        return target.allocate(reference.size());
    }
    if target.size() != reference.size() {
        return Err(Error::BadSize {
            expected: reference.size().clone(),
            actual: target.size().clone(),
        });
    }
    Ok(())
}

/// Require two cooperating inputs to share a geometry.
pub(crate) fn check_same_geometry<T: PixelValue, U: PixelValue>(
    a: &Image<T>,
    b: &Image<U>,
) -> Result<()> {
    if !a.is_allocated() || !b.is_allocated() {
        return Err(Error::NotAllocated);
    }
    if a.size() != b.size() {
        return Err(Error::BadSize {
            expected: a.size().clone(),
            actual: b.size().clone(),
        });
    }
    Ok(())
}

/// Pointwise unary map into a prepared output.
pub(crate) fn map_into<T: PixelValue, F>(input: &Image<T>, output: &mut Image<T>, f: F) -> Result<()>
where
    F: Fn(T) -> T,
{
    ensure_same_geometry(input, output)?;
    for (out, value) in output.as_mut_slice().iter_mut().zip(input.as_slice()) {
        *out = f(*value);
    }
    Ok(())
}

/// Pointwise binary map into a prepared output.
pub(crate) fn map2_into<T: PixelValue, F>(
    a: &Image<T>,
    b: &Image<T>,
    output: &mut Image<T>,
    f: F,
) -> Result<()>
where
    F: Fn(T, T) -> T,
{
    check_same_geometry(a, b)?;
    ensure_same_geometry(a, output)?;
    for (offset, out) in output.as_mut_slice().iter_mut().enumerate() {
        *out = f(a.pixel(offset), b.pixel(offset));
    }
    Ok(())
}

/// The scalar pixel matrix every unary neighborhood operator is instantiated
/// for, in dispatch order: the 2-D single-list row tier first, then the
/// generic N-D tier.
macro_rules! two_tier_matrix {
    ($rows:ident, $generic:ident) => {
        &[
            $rows::<bool> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $rows::<u8> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $rows::<u16> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $rows::<u32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $rows::<i32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $rows::<f32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $rows::<f64> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $generic::<bool> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $generic::<u8> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $generic::<u16> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $generic::<u32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $generic::<i32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $generic::<f32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $generic::<f64> as ::gridmorph_core::dispatch::Candidate<_, _>,
        ]
    };
}

/// Single-tier scalar matrix for the queue-driven operators.
macro_rules! scalar_matrix {
    ($f:ident) => {
        &[
            $f::<bool> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<u8> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<u16> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<u32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<i32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<f32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<f64> as ::gridmorph_core::dispatch::Candidate<_, _>,
        ]
    };
}

/// Numeric-only scalar matrix for the height-parameterized operators.
macro_rules! numeric_matrix {
    ($f:ident) => {
        &[
            $f::<u8> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<u16> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<u32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<i32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<f32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<f64> as ::gridmorph_core::dispatch::Candidate<_, _>,
        ]
    };
}

/// Input-type × label-type matrix for labelling and distance operators.
macro_rules! label_matrix {
    ($f:ident) => {
        &[
            $f::<bool, u16> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<bool, u32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<u8, u16> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<u8, u32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<u16, u16> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<u16, u32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<u32, u16> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<u32, u32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<i32, u16> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<i32, u32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<f32, u16> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<f32, u32> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<f64, u16> as ::gridmorph_core::dispatch::Candidate<_, _>,
            $f::<f64, u32> as ::gridmorph_core::dispatch::Candidate<_, _>,
        ]
    };
}

pub(crate) use label_matrix;
pub(crate) use numeric_matrix;
pub(crate) use scalar_matrix;
pub(crate) use two_tier_matrix;
