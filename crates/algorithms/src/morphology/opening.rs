//! Morphological opening (erosion followed by dilation)
//!
//! Removes small bright features while preserving the overall shape of
//! larger bright regions.

use gridmorph_core::dispatch::{first_suitable, Tried};
use gridmorph_core::image::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image, ScalarPixel,
};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::{Algorithm, Error, Result};

use super::dilate::dilate_into;
use super::erode::erode_into;
use crate::support::{scalar_matrix, UnaryArgs};

/// Parameters for morphological opening
#[derive(Debug, Clone, Default)]
pub struct OpeningParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Opening algorithm
#[derive(Debug, Clone, Default)]
pub struct Opening;

impl Algorithm for Opening {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = OpeningParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Opening"
    }

    fn description(&self) -> &'static str {
        "Morphological opening (erosion then dilation) to remove small bright features"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(input.dynamic_type(), input.dimension())?;
        opening(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// Open a typed image: erode, then dilate with the same element.
pub fn opening_into<T: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut eroded = input.same_geometry::<T>()?;
    erode_into(input, element, &mut eroded)?;
    dilate_into(&eroded, element, output)
}

/// Open a type-erased image.
pub fn opening(
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
    first_suitable(&mut args, scalar_matrix!(opening_candidate))
}

fn opening_candidate<T: ScalarPixel>(args: &mut UnaryArgs) -> Tried<()> {
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<T>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(opening_into(input, args.se, output))
}
