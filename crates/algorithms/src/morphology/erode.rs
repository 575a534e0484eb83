//! Morphological erosion (minimum filter)
//!
//! Replaces each pixel with the minimum value over its structuring-element
//! neighborhood (the center participates when the element contains it).

use gridmorph_core::dispatch::{first_suitable, Tried};
use gridmorph_core::image::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image, ScalarPixel,
};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::{Algorithm, Error, Result};

use super::reduce::{neighborhood_reduce_nd, neighborhood_reduce_rows, pick_min};
use crate::support::{two_tier_matrix, UnaryArgs};

/// Parameters for morphological erosion
#[derive(Debug, Clone, Default)]
pub struct ErodeParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Erosion algorithm
#[derive(Debug, Clone, Default)]
pub struct Erode;

impl Algorithm for Erode {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = ErodeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Erode"
    }

    fn description(&self) -> &'static str {
        "Morphological erosion (minimum filter over structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(input.dynamic_type(), input.dimension())?;
        erode(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// Erode a typed image into a prepared (or unallocated) output.
pub fn erode_into<T: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    neighborhood_reduce_nd(input, element, output, pick_min)
}

/// Erode a type-erased image.
///
/// Dispatches over the scalar pixel matrix: the 2-D single-list row tier is
/// tried first, then the generic N-D implementation.
pub fn erode(
    input: &dyn DynImage,
    element: &StructuringElement,
    output: &mut dyn DynImage,
) -> Result<()> {
    set_same(input, output)?;
    let mut args = UnaryArgs {
        input,
        se: element,
        output,
    };
    first_suitable(&mut args, two_tier_matrix!(rows_candidate, generic_candidate))
}

fn rows_candidate<T: ScalarPixel>(args: &mut UnaryArgs) -> Tried<()> {
    if args.input.dimension() != 2 || args.se.dimension() != 2 || !args.se.is_single_list() {
        return Tried::Pass;
    }
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<T>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(neighborhood_reduce_rows(input, args.se, output, pick_min))
}

fn generic_candidate<T: ScalarPixel>(args: &mut UnaryArgs) -> Tried<()> {
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<T>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(erode_into(input, args.se, output))
}
