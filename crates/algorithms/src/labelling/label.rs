//! Connected-component labelling into an image
//!
//! Two public variants share the flood core:
//! - [`label`]: components of non-background pixels (background = the pixel
//!   type's zero value, labelled 0)
//! - [`label_plateaus`]: flat zones (maximal connected regions of equal
//!   value), covering every pixel

use gridmorph_core::dispatch::{first_suitable, Tried};
use gridmorph_core::image::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image, PixelValue,
    ScalarPixel,
};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::types::{ScalarKind, TypeDescriptor};
use gridmorph_core::{Algorithm, Error, Result};

use super::flood::{flood_label, FloodResult};
use crate::support::{ensure_same_geometry, label_matrix, LabelArgs};

/// Parameters for connected-component labelling
#[derive(Debug, Clone)]
pub struct LabelParams {
    /// Structuring element defining adjacency
    pub element: StructuringElement,
    /// Pixel type of the label image created by the erased wrapper
    pub label_kind: ScalarKind,
}

impl Default for LabelParams {
    fn default() -> Self {
        Self {
            element: StructuringElement::default(),
            label_kind: ScalarKind::U32,
        }
    }
}

/// Connected-component labelling algorithm
#[derive(Debug, Clone, Default)]
pub struct Label;

impl Algorithm for Label {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = LabelParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Label"
    }

    fn description(&self) -> &'static str {
        "Label connected components of non-background pixels"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(
            TypeDescriptor::scalar(params.label_kind),
            input.dimension(),
        )?;
        label(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// Flat-zone labelling algorithm
#[derive(Debug, Clone, Default)]
pub struct LabelPlateaus;

impl Algorithm for LabelPlateaus {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = LabelParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "LabelPlateaus"
    }

    fn description(&self) -> &'static str {
        "Label every flat zone (connected region of equal value)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(
            TypeDescriptor::scalar(params.label_kind),
            input.dimension(),
        )?;
        label_plateaus(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// Convert flood indices into the label image, checking that the component
/// count fits the label pixel type.
pub(crate) fn write_labels<L: ScalarPixel>(
    result: &FloodResult,
    output: &mut Image<L>,
) -> Result<()> {
    L::from_count(result.count).ok_or(Error::Overflow("label count"))?;
    for (out, &index) in output.as_mut_slice().iter_mut().zip(&result.labels) {
        *out = L::from_count(index).ok_or(Error::Overflow("label count"))?;
    }
    Ok(())
}

/// Label the connected components of non-background pixels.
///
/// Background is the pixel type's zero value and stays labelled 0; every
/// other pixel receives the label of its component, counted from 1 in
/// traversal order. Returns the component count.
pub fn label_into<T: PixelValue, L: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<L>,
) -> Result<usize> {
    ensure_same_geometry(input, output)?;
    let background = T::default();
    let result = flood_label(
        input,
        element,
        |v| v != background,
        |_, _| true,
        |_, _, _, _| (),
    )?;
    write_labels(&result, output)?;
    Ok(result.count)
}

/// Label every flat zone of the image.
///
/// All pixels participate; two neighbors share a zone exactly when their
/// values are equal. Returns the zone count.
pub fn label_plateaus_into<T: PixelValue, L: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<L>,
) -> Result<usize> {
    ensure_same_geometry(input, output)?;
    let result = flood_label(input, element, |_| true, |a, b| a == b, |_, _, _, _| ())?;
    write_labels(&result, output)?;
    Ok(result.count)
}

/// Label the connected components of a type-erased image.
pub fn label(
    input: &dyn DynImage,
    element: &StructuringElement,
    output: &mut dyn DynImage,
) -> Result<usize> {
    set_same(input, output)?;
    let mut args = LabelArgs {
        input,
        se: element,
        output,
    };
    first_suitable(&mut args, label_matrix!(label_candidate))
}

/// Label the flat zones of a type-erased image.
pub fn label_plateaus(
    input: &dyn DynImage,
    element: &StructuringElement,
    output: &mut dyn DynImage,
) -> Result<usize> {
    set_same(input, output)?;
    let mut args = LabelArgs {
        input,
        se: element,
        output,
    };
    first_suitable(&mut args, label_matrix!(label_plateaus_candidate))
}

fn label_candidate<T: ScalarPixel, L: ScalarPixel>(args: &mut LabelArgs) -> Tried<usize> {
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<L>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(label_into(input, args.se, output))
}

fn label_plateaus_candidate<T: ScalarPixel, L: ScalarPixel>(args: &mut LabelArgs) -> Tried<usize> {
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<L>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(label_plateaus_into(input, args.se, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmorph_core::image::Coordinate;
    use gridmorph_core::se::{cross, square};

    #[test]
    fn test_label_two_blobs() {
        // Two foreground blobs separated by background under 4-adjacency.
        let input = Image::from_vec(
            &Coordinate::xy(5, 1),
            vec![7u8, 7, 0, 3, 3],
        )
        .unwrap();
        let mut output: Image<u32> = input.same_geometry().unwrap();
        let count = label_into(&input, &cross(1), &mut output).unwrap();
        assert_eq!(count, 2);
        assert_eq!(output.as_slice(), &[1, 1, 0, 2, 2]);
    }

    #[test]
    fn test_label_diagonal_connectivity_depends_on_element() {
        // Two diagonal pixels: separate under cross, joined under square.
        let input = Image::from_vec(
            &Coordinate::xy(2, 2),
            vec![1u8, 0, 0, 1],
        )
        .unwrap();

        let mut output: Image<u32> = input.same_geometry().unwrap();
        assert_eq!(label_into(&input, &cross(1), &mut output).unwrap(), 2);

        let mut output: Image<u32> = input.same_geometry().unwrap();
        assert_eq!(label_into(&input, &square(1), &mut output).unwrap(), 1);
    }

    #[test]
    fn test_label_plateaus_covers_everything() {
        let input = Image::from_vec(
            &Coordinate::xy(4, 1),
            vec![5u8, 5, 2, 5],
        )
        .unwrap();
        let mut output: Image<u32> = input.same_geometry().unwrap();
        let count = label_plateaus_into(&input, &cross(1), &mut output).unwrap();
        assert_eq!(count, 3);
        assert_eq!(output.as_slice(), &[1, 1, 2, 3]);
    }

    #[test]
    fn test_label_overflow_is_checked() {
        // A 16x16 checkerboard has 256 flat zones, one more than u8 holds.
        let mut data = Vec::new();
        for y in 0..16isize {
            for x in 0..16isize {
                data.push(((x + y) % 2) as u8);
            }
        }
        let input = Image::from_vec(&Coordinate::xy(16, 16), data).unwrap();
        let mut output: Image<u8> = input.same_geometry().unwrap();
        assert_eq!(
            label_plateaus_into(&input, &cross(1), &mut output),
            Err(Error::Overflow("label count"))
        );
    }

    #[test]
    fn test_label_erased_dispatch() {
        let input = Image::from_vec(
            &Coordinate::xy(5, 1),
            vec![7u8, 7, 0, 3, 3],
        )
        .unwrap();
        let mut output: Image<u16> = Image::new(2);
        let count = label(&input, &cross(1), &mut output).unwrap();
        assert_eq!(count, 2);
        assert_eq!(output.as_slice(), &[1, 1, 0, 2, 2]);
    }

    #[test]
    fn test_label_algorithm_wrapper_uses_label_kind() {
        let input = Image::from_vec(
            &Coordinate::xy(3, 1),
            vec![1u8, 0, 1],
        )
        .unwrap();
        let params = LabelParams {
            element: cross(1),
            label_kind: ScalarKind::U16,
        };
        let output = Label.execute(Box::new(input), params).unwrap();
        assert!(downcast_image::<u16>(output.as_ref()).is_some());
    }
}
