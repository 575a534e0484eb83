//! Regional extrema labelling
//!
//! A flat zone is a regional minimum (maximum) when every boundary
//! transition into a neighboring zone strictly increases (decreases). The
//! check is a per-zone boolean AND-reduced over every inspected boundary
//! edge; zones failing it are discarded and their pixels stay 0.

use gridmorph_core::dispatch::{first_suitable, Tried};
use gridmorph_core::image::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image, ScalarPixel,
};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::types::{ScalarKind, TypeDescriptor};
use gridmorph_core::{Algorithm, Error, Result};

use super::flood::flood_label;
use super::label::LabelParams;
use crate::support::{ensure_same_geometry, label_matrix, LabelArgs};

/// Regional-minima labelling algorithm
#[derive(Debug, Clone, Default)]
pub struct LabelMinima;

impl Algorithm for LabelMinima {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = LabelParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "LabelMinima"
    }

    fn description(&self) -> &'static str {
        "Label regional minima plateaus, discarding non-extremal flat zones"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(
            TypeDescriptor::scalar(params.label_kind),
            input.dimension(),
        )?;
        label_minima(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// Regional-maxima labelling algorithm
#[derive(Debug, Clone, Default)]
pub struct LabelMaxima;

impl Algorithm for LabelMaxima {
    type Input = Box<dyn DynImage>;
    type Output = Box<dyn DynImage>;
    type Params = LabelParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "LabelMaxima"
    }

    fn description(&self) -> &'static str {
        "Label regional maxima plateaus, discarding non-extremal flat zones"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(
            TypeDescriptor::scalar(params.label_kind),
            input.dimension(),
        )?;
        label_maxima(input.as_ref(), &params.element, output.as_mut())?;
        Ok(output)
    }
}

/// Collect the extremal flat zones of an image: plateau value plus every
/// member offset, in traversal order. `maxima` selects the direction of the
/// strict order check.
///
/// This is also the seeding stage of morphological reconstruction.
pub(crate) fn extremal_plateaus<T: ScalarPixel>(
    image: &Image<T>,
    element: &StructuringElement,
    maxima: bool,
) -> Result<Vec<(T, Vec<usize>)>> {
    let mut extremal: Vec<bool> = Vec::new();
    let result = flood_label(
        image,
        element,
        |_| true,
        |a, b| a == b,
        |zone, value, _offset, neighbor| {
            if extremal.len() < zone {
                extremal.resize(zone, true);
            }
            let strictly_better = if maxima { value > neighbor } else { value < neighbor };
            if !strictly_better {
                extremal[zone - 1] = false;
            }
        },
    )?;
    extremal.resize(result.count, true);

    let mut values: Vec<Option<T>> = vec![None; result.count];
    let mut members: Vec<Vec<usize>> = vec![Vec::new(); result.count];
    for (offset, &zone) in result.labels.iter().enumerate() {
        if zone == 0 || !extremal[zone - 1] {
            continue;
        }
        values[zone - 1].get_or_insert(image.pixel(offset));
        members[zone - 1].push(offset);
    }

    Ok(values
        .into_iter()
        .zip(members)
        .filter_map(|(value, points)| value.map(|v| (v, points)))
        .collect())
}

fn label_extrema_into<T: ScalarPixel, L: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<L>,
    maxima: bool,
) -> Result<usize> {
    ensure_same_geometry(input, output)?;
    let plateaus = extremal_plateaus(input, element, maxima)?;
    output.fill(L::default());
    for (index, (_value, points)) in plateaus.iter().enumerate() {
        let label = L::from_count(index + 1).ok_or(Error::Overflow("label count"))?;
        for &offset in points {
            *output.pixel_mut(offset) = label;
        }
    }
    Ok(plateaus.len())
}

/// Label the regional minima of a typed image. Returns the minima count.
pub fn label_minima_into<T: ScalarPixel, L: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<L>,
) -> Result<usize> {
    label_extrema_into(input, element, output, false)
}

/// Label the regional maxima of a typed image. Returns the maxima count.
pub fn label_maxima_into<T: ScalarPixel, L: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<L>,
) -> Result<usize> {
    label_extrema_into(input, element, output, true)
}

/// Label the regional minima of a type-erased image.
pub fn label_minima(
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
    first_suitable(&mut args, label_matrix!(minima_candidate))
}

/// Label the regional maxima of a type-erased image.
pub fn label_maxima(
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
    first_suitable(&mut args, label_matrix!(maxima_candidate))
}

fn minima_candidate<T: ScalarPixel, L: ScalarPixel>(args: &mut LabelArgs) -> Tried<usize> {
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<L>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(label_minima_into(input, args.se, output))
}

fn maxima_candidate<T: ScalarPixel, L: ScalarPixel>(args: &mut LabelArgs) -> Tried<usize> {
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<L>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(label_maxima_into(input, args.se, output))
}
