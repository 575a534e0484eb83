//! Morphological closing (dilation followed by erosion)
//!
//! Fills small dark gaps while preserving the overall shape of larger dark
//! regions.

use gridmorph_core::dispatch::{first_suitable, Tried};
use gridmorph_core::image::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image, ScalarPixel,
};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::{Algorithm, Error, Result};

use super::dilate::dilate_into;
use super::erode::erode_into;
use crate::support::{scalar_matrix, UnaryArgs};

/// Parameters for morphological closing
#[derive(Debug, Clone, Default)]
pub struct ClosingParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Closing algorithm
#[derive(Debug, Clone, Default)]
pub struct Closing;

impl Algorithm for Closing {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = ClosingParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Closing"
    }

    fn description(&self) -> &'static str {
        "Morphological closing (dilation then erosion) to fill small dark gaps"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(input.dynamic_type(), input.dimension())?;
        closing(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// Close a typed image: dilate, then erode with the same element.
pub fn closing_into<T: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut dilated = input.same_geometry::<T>()?;
    dilate_into(input, element, &mut dilated)?;
    erode_into(&dilated, element, output)
}

/// Close a type-erased image.
pub fn closing(
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
    first_suitable(&mut args, scalar_matrix!(closing_candidate))
}

fn closing_candidate<T: ScalarPixel>(args: &mut UnaryArgs) -> Tried<()> {
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<T>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(closing_into(input, args.se, output))
}
