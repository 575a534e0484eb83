//! Top-hat transforms
//!
//! - **Top-hat**: original minus opening (bright feature extraction)
//! - **Black-hat**: closing minus original (dark feature extraction)

use gridmorph_core::dispatch::{first_suitable, Tried};
use gridmorph_core::image::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image, ScalarPixel,
};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::{Algorithm, Error, Result};

use super::closing::closing_into;
use super::opening::opening_into;
use crate::support::{map2_into, scalar_matrix, UnaryArgs};

/// Parameters for the top-hat transform
#[derive(Debug, Clone, Default)]
pub struct TopHatParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Parameters for the black-hat transform
#[derive(Debug, Clone, Default)]
pub struct BlackHatParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Top-hat algorithm
#[derive(Debug, Clone, Default)]
pub struct TopHat;

impl Algorithm for TopHat {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = TopHatParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "TopHat"
    }

    fn description(&self) -> &'static str {
        "White top-hat (original minus opening) for bright feature extraction"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(input.dynamic_type(), input.dimension())?;
        top_hat(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// Black-hat algorithm
#[derive(Debug, Clone, Default)]
pub struct BlackHat;

impl Algorithm for BlackHat {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = BlackHatParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "BlackHat"
    }

    fn description(&self) -> &'static str {
        "Black top-hat (closing minus original) for dark feature extraction"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(input.dynamic_type(), input.dimension())?;
        black_hat(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// Top-hat of a typed image: input minus its opening.
pub fn top_hat_into<T: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut opened = input.same_geometry::<T>()?;
    opening_into(input, element, &mut opened)?;
    map2_into(input, &opened, output, |c, o| c.sub_bounded(o))
}

/// Black-hat of a typed image: its closing minus the input.
pub fn black_hat_into<T: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut closed = input.same_geometry::<T>()?;
    closing_into(input, element, &mut closed)?;
    map2_into(&closed, input, output, |c, o| c.sub_bounded(o))
}

/// Top-hat of a type-erased image.
pub fn top_hat(
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
    first_suitable(&mut args, scalar_matrix!(top_hat_candidate))
}

/// Black-hat of a type-erased image.
pub fn black_hat(
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
    first_suitable(&mut args, scalar_matrix!(black_hat_candidate))
}

fn top_hat_candidate<T: ScalarPixel>(args: &mut UnaryArgs) -> Tried<()> {
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<T>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(top_hat_into(input, args.se, output))
}

fn black_hat_candidate<T: ScalarPixel>(args: &mut UnaryArgs) -> Tried<()> {
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<T>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(black_hat_into(input, args.se, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmorph_core::image::Coordinate;
    use gridmorph_core::se::square;

    #[test]
    fn test_top_hat_isolates_bright_spot() {
        let mut input = Image::filled(&Coordinate::xy(7, 7), 20u8).unwrap();
        input.set(&Coordinate::xy(3, 3), 90).unwrap();
        let mut output = input.same_geometry::<u8>().unwrap();
        top_hat_into(&input, &square(1), &mut output).unwrap();

        assert_eq!(output.get(&Coordinate::xy(3, 3)).unwrap(), 70);
        assert_eq!(output.get(&Coordinate::xy(1, 1)).unwrap(), 0);
    }

    #[test]
    fn test_black_hat_isolates_dark_spot() {
        let mut input = Image::filled(&Coordinate::xy(7, 7), 20u8).unwrap();
        input.set(&Coordinate::xy(3, 3), 4).unwrap();
        let mut output = input.same_geometry::<u8>().unwrap();
        black_hat_into(&input, &square(1), &mut output).unwrap();

        assert_eq!(output.get(&Coordinate::xy(3, 3)).unwrap(), 16);
        assert_eq!(output.get(&Coordinate::xy(1, 1)).unwrap(), 0);
    }
}
