//! Morphological gradients
//!
//! Three edge detectors built from erosion and dilation with bounded
//! subtraction:
//! - **gradient**: dilation minus erosion
//! - **internal gradient**: center minus erosion
//! - **external gradient**: dilation minus center

use gridmorph_core::dispatch::{first_suitable, Tried};
use gridmorph_core::image::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image, ScalarPixel,
};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::{Algorithm, Error, Result};

use super::dilate::dilate_into;
use super::erode::erode_into;
use crate::support::{map2_into, scalar_matrix, UnaryArgs};

/// Parameters for the morphological gradients
#[derive(Debug, Clone, Default)]
pub struct GradientParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Morphological gradient algorithm
#[derive(Debug, Clone, Default)]
pub struct Gradient;

impl Algorithm for Gradient {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = GradientParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "MorphologicalGradient"
    }

    fn description(&self) -> &'static str {
        "Morphological gradient (dilation minus erosion) for edge detection"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(input.dynamic_type(), input.dimension())?;
        gradient(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// Internal (erosion-side) gradient algorithm
#[derive(Debug, Clone, Default)]
pub struct InternalGradient;

impl Algorithm for InternalGradient {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = GradientParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "InternalGradient"
    }

    fn description(&self) -> &'static str {
        "Internal gradient (center minus erosion)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(input.dynamic_type(), input.dimension())?;
        internal_gradient(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// External (dilation-side) gradient algorithm
#[derive(Debug, Clone, Default)]
pub struct ExternalGradient;

impl Algorithm for ExternalGradient {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = GradientParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ExternalGradient"
    }

    fn description(&self) -> &'static str {
        "External gradient (dilation minus center)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(input.dynamic_type(), input.dimension())?;
        external_gradient(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// Gradient of a typed image: dilation minus erosion.
pub fn gradient_into<T: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut dilated = input.same_geometry::<T>()?;
    let mut eroded = input.same_geometry::<T>()?;
    dilate_into(input, element, &mut dilated)?;
    erode_into(input, element, &mut eroded)?;
    map2_into(&dilated, &eroded, output, |d, e| d.sub_bounded(e))
}

/// Internal gradient of a typed image: center minus erosion.
pub fn internal_gradient_into<T: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut eroded = input.same_geometry::<T>()?;
    erode_into(input, element, &mut eroded)?;
    map2_into(input, &eroded, output, |c, e| c.sub_bounded(e))
}

/// External gradient of a typed image: dilation minus center.
pub fn external_gradient_into<T: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut dilated = input.same_geometry::<T>()?;
    dilate_into(input, element, &mut dilated)?;
    map2_into(&dilated, input, output, |d, c| d.sub_bounded(c))
}

macro_rules! erased_gradient_entry {
    ($(#[$doc:meta])* $name:ident, $candidate:ident, $typed:ident) => {
        $(#[$doc])*
        pub fn $name(
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
            first_suitable(&mut args, scalar_matrix!($candidate))
        }

        fn $candidate<T: ScalarPixel>(args: &mut UnaryArgs) -> Tried<()> {
            let Some(input) = downcast_image::<T>(args.input) else {
                return Tried::Pass;
            };
            let Some(output) = downcast_image_mut::<T>(&mut *args.output) else {
                return Tried::Pass;
            };
            Tried::Done($typed(input, args.se, output))
        }
    };
}

erased_gradient_entry!(
    /// Gradient of a type-erased image.
    gradient,
    gradient_candidate,
    gradient_into
);
erased_gradient_entry!(
    /// Internal gradient of a type-erased image.
    internal_gradient,
    internal_gradient_candidate,
    internal_gradient_into
);
erased_gradient_entry!(
    /// External gradient of a type-erased image.
    external_gradient,
    external_gradient_candidate,
    external_gradient_into
);

#[cfg(test)]
mod tests {
    use super::*;
    use gridmorph_core::image::Coordinate;
    use gridmorph_core::se::square;

    fn step_image() -> Image<u8> {
        // Left half 5, right half 15.
        let mut data = Vec::new();
        for _y in 0..5 {
            for x in 0..5 {
                data.push(if x < 3 { 5u8 } else { 15 });
            }
        }
        Image::from_vec(&Coordinate::xy(5, 5), data).unwrap()
    }

    #[test]
    fn test_gradient_detects_step() {
        let input = step_image();
        let mut output = input.same_geometry::<u8>().unwrap();
        gradient_into(&input, &square(1), &mut output).unwrap();

        // On both sides of the step the gradient is 10, away from it 0.
        assert_eq!(output.get(&Coordinate::xy(2, 2)).unwrap(), 10);
        assert_eq!(output.get(&Coordinate::xy(3, 2)).unwrap(), 10);
        assert_eq!(output.get(&Coordinate::xy(0, 2)).unwrap(), 0);
    }

    #[test]
    fn test_half_gradients_split_the_step() {
        let input = step_image();
        let mut internal = input.same_geometry::<u8>().unwrap();
        let mut external = input.same_geometry::<u8>().unwrap();
        internal_gradient_into(&input, &square(1), &mut internal).unwrap();
        external_gradient_into(&input, &square(1), &mut external).unwrap();

        // The bright side of the step carries the internal gradient, the
        // dark side the external one.
        assert_eq!(internal.get(&Coordinate::xy(3, 2)).unwrap(), 10);
        assert_eq!(internal.get(&Coordinate::xy(2, 2)).unwrap(), 0);
        assert_eq!(external.get(&Coordinate::xy(2, 2)).unwrap(), 10);
        assert_eq!(external.get(&Coordinate::xy(3, 2)).unwrap(), 0);
    }

    #[test]
    fn test_gradient_uniform_is_zero() {
        let input = Image::filled(&Coordinate::xy(4, 4), 9u8).unwrap();
        let mut output: Image<u8> = Image::new(2);
        gradient(&input, &square(1), &mut output).unwrap();
        assert!(output.as_slice().iter().all(|&v| v == 0));
    }
}
