//! Distance transforms by boundary flooding
//!
//! A multi-source breadth-first flood over the adjacency given by the
//! structuring element: interior-boundary foreground pixels (foreground with
//! at least one in-image background neighbor) seed at distance 1, and each
//! ring of newly reached pixels receives the previous level plus one. The
//! level counter is checked against the distance image's pixel type and
//! fails with `Overflow` when exceeded.
//!
//! [`quasi_distance`] additionally emits a residual image: the bounded
//! difference between each pixel's value and the value of the neighbor it
//! was first reached from (for seeds, that neighbor is background).

use std::collections::VecDeque;

use gridmorph_core::dispatch::{first_suitable, Tried};
use gridmorph_core::image::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image, Neighborhood,
    ScalarPixel,
};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::types::{ScalarKind, TypeDescriptor};
use gridmorph_core::{Algorithm, Error, Result};

use crate::support::{check_same_geometry, ensure_same_geometry, label_matrix, DistanceArgs};

/// Multi-source BFS shared by the distance transforms.
///
/// `control`, when given, replaces the background test: a pixel is
/// background when the control image is zero there, instead of the input.
/// `on_reach(pixel, from)` fires once per admitted pixel, in flood order.
fn distance_flood<T, D, F>(
    input: &Image<T>,
    control: Option<&Image<T>>,
    element: &StructuringElement,
    output: &mut Image<D>,
    mut on_reach: F,
) -> Result<()>
where
    T: ScalarPixel,
    D: ScalarPixel,
    F: FnMut(usize, usize),
{
    ensure_same_geometry(input, output)?;
    if let Some(control) = control {
        check_same_geometry(input, control)?;
    }

    let zero = T::default();
    let is_background = |offset: usize| match control {
        Some(control) => control.pixel(offset) == zero,
        None => input.pixel(offset) == zero,
    };
    let is_foreground = |offset: usize| input.pixel(offset) != zero && !is_background(offset);

    output.fill(D::default());
    let propagation = element.remove_center();
    let mut hood = Neighborhood::new(input, &propagation)?;
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    // Seed the interior boundary at distance 1.
    let one = D::from_count(1).ok_or(Error::Overflow("distance level"))?;
    for offset in 0..input.len() {
        if !is_foreground(offset) {
            continue;
        }
        hood.center_at_offset(offset)?;
        let touching = hood.iter().find(|n| is_background(n.offset));
        if let Some(background) = touching {
            *output.pixel_mut(offset) = one;
            on_reach(offset, background.offset);
            queue.push_back((offset, 1));
        }
    }
    tracing::debug!(seeds = queue.len(), "distance flood seeded");

    // Breadth-expand level by level.
    while let Some((center, level)) = queue.pop_front() {
        let next = level + 1;
        hood.center_at_offset(center)?;
        for neighbor in hood.iter() {
            let target = neighbor.offset;
            if !is_foreground(target) || output.pixel(target) != D::default() {
                continue;
            }
            *output.pixel_mut(target) = D::from_count(next).ok_or(Error::Overflow("distance level"))?;
            on_reach(target, center);
            queue.push_back((target, next));
        }
    }
    Ok(())
}

/// Distance-to-background of a typed image.
///
/// Background is the zero value of the pixel type, or of `control` when one
/// is given (the geodesic variant). Foreground pixels unreachable from any
/// seed stay 0.
pub fn binary_distance_into<T: ScalarPixel, D: ScalarPixel>(
    input: &Image<T>,
    control: Option<&Image<T>>,
    element: &StructuringElement,
    output: &mut Image<D>,
) -> Result<()> {
    distance_flood(input, control, element, output, |_, _| ())
}

/// Distance plus residual of a typed image.
pub fn quasi_distance_into<T: ScalarPixel, D: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    distance: &mut Image<D>,
    residual: &mut Image<T>,
) -> Result<()> {
    ensure_same_geometry(input, residual)?;
    residual.fill(T::default());
    distance_flood(input, None, element, distance, |reached, from| {
        *residual.pixel_mut(reached) = input.pixel(reached).sub_bounded(input.pixel(from));
    })
}

/// Parameters for the distance transforms
#[derive(Debug, Clone)]
pub struct QuasiDistanceParams {
    /// Structuring element defining adjacency
    pub element: StructuringElement,
    /// Pixel type of the distance image created by the erased wrapper
    pub distance_kind: ScalarKind,
}

impl Default for QuasiDistanceParams {
    fn default() -> Self {
        Self {
            element: StructuringElement::default(),
            distance_kind: ScalarKind::U32,
        }
    }
}

/// Quasi-distance algorithm
#[derive(Debug, Clone, Default)]
pub struct QuasiDistance;

impl Algorithm for QuasiDistance {
    type Input = Box<dyn DynImage>;
    type Output = (Box<dyn DynImage>, Box<dyn DynImage>);
    type Params = QuasiDistanceParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "QuasiDistance"
    }

    fn description(&self) -> &'static str {
        "BFS distance-to-background with a residual image"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut distance = create_image(
            TypeDescriptor::scalar(params.distance_kind),
            input.dimension(),
        )?;
        let mut residual = create_image(input.dynamic_type(), input.dimension())?;
        quasi_distance(
            input.as_ref(),
            &params.element,
            distance.as_mut(),
            residual.as_mut(),
        )?;
        Ok((distance, residual))
    }
}

/// Quasi-distance of a type-erased image.
pub fn quasi_distance(
    input: &dyn DynImage,
    element: &StructuringElement,
    distance: &mut dyn DynImage,
    residual: &mut dyn DynImage,
) -> Result<()> {
    set_same(input, distance)?;
    set_same(input, residual)?;
    let mut args = DistanceArgs {
        input,
        se: element,
        distance,
        residual,
    };
    first_suitable(&mut args, label_matrix!(quasi_distance_candidate))
}

fn quasi_distance_candidate<T: ScalarPixel, D: ScalarPixel>(
    args: &mut DistanceArgs,
) -> Tried<()> {
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(distance) = downcast_image_mut::<D>(&mut *args.distance) else {
        return Tried::Pass;
    };
    let Some(residual) = downcast_image_mut::<T>(&mut *args.residual) else {
        return Tried::Pass;
    };
    Tried::Done(quasi_distance_into(input, args.se, distance, residual))
}
