//! Morphological dilation (maximum filter)
//!
//! Dual of erosion: replaces each pixel with the maximum value over the
//! point-reflected structuring-element neighborhood. The reflection makes
//! erosion/dilation an adjunction, so
//! `dilate(im, se) == complement(erode(complement(im), se.transpose()))`
//! holds for asymmetric elements too.

use gridmorph_core::dispatch::{first_suitable, Tried};
use gridmorph_core::image::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image, ScalarPixel,
};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::{Algorithm, Error, Result};

use super::reduce::{neighborhood_reduce_nd, neighborhood_reduce_rows, pick_max};
use crate::support::{two_tier_matrix, UnaryArgs};

/// Parameters for morphological dilation
#[derive(Debug, Clone, Default)]
pub struct DilateParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Dilation algorithm
#[derive(Debug, Clone, Default)]
pub struct Dilate;

impl Algorithm for Dilate {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = DilateParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Dilate"
    }

    fn description(&self) -> &'static str {
        "Morphological dilation (maximum filter over structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(input.dynamic_type(), input.dimension())?;
        dilate(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// Dilate a typed image into a prepared (or unallocated) output.
pub fn dilate_into<T: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    neighborhood_reduce_nd(input, &element.transpose(), output, pick_max)
}

/// Dilate a type-erased image.
pub fn dilate(
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
    Tried::Done(neighborhood_reduce_rows(
        input,
        &args.se.transpose(),
        output,
        pick_max,
    ))
}

fn generic_candidate<T: ScalarPixel>(args: &mut UnaryArgs) -> Tried<()> {
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<T>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(dilate_into(input, args.se, output))
}
