//! Morphological reconstruction (geodesic flooding)
//!
//! Grows a marker image under a mask image until a fixed point, by
//! priority-queue flooding:
//!
//! 1. form the predicate image (`min(marker, mask)` for reconstruction by
//!    dilation, `max` for its dual),
//! 2. label the extremal plateaus of the predicate image under the reversed
//!    order, one queue seed per plateau holding every member offset,
//! 3. initialize the output to the order's worst sentinel and write each
//!    seed plateau at its level,
//! 4. pop the best plateau, and admit every neighbor not yet flooded at an
//!    equal-or-better level with priority `min(level, mask[n])` (dually,
//!    `max`).
//!
//! Once written, an output pixel is only ever improved (raised for the
//! dilation direction, lowered for the erosion direction), so the flood is
//! monotone and runs in one pass per queue entry. The result is idempotent
//! and bounded by the mask.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::marker::PhantomData;

use gridmorph_core::dispatch::{first_suitable, Tried};
use gridmorph_core::image::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image, Neighborhood,
    ScalarPixel,
};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::{Algorithm, Error, Result};

use crate::labelling::extremal_plateaus;
use crate::support::{check_same_geometry, ensure_same_geometry, scalar_matrix, BinaryArgs};

/// Direction of a reconstruction flood.
pub(crate) trait FloodOrder<T: ScalarPixel> {
    /// Strictly better priority under this order.
    fn better(a: T, b: T) -> bool;

    /// Geodesic bound against the mask.
    fn meet(level: T, mask: T) -> T;

    /// Worst sentinel the output starts from.
    fn worst() -> T;

    /// Whether the predicate image's extremal plateaus are maxima.
    const MAXIMA: bool;
}

/// Reconstruction by dilation: bright plateaus flood downhill.
pub(crate) enum ByDilation {}

impl<T: ScalarPixel> FloodOrder<T> for ByDilation {
    fn better(a: T, b: T) -> bool {
        a > b
    }

    fn meet(level: T, mask: T) -> T {
        if mask < level {
            mask
        } else {
            level
        }
    }

    fn worst() -> T {
        T::min_value()
    }

    const MAXIMA: bool = true;
}

/// Reconstruction by erosion: dark plateaus flood uphill.
pub(crate) enum ByErosion {}

impl<T: ScalarPixel> FloodOrder<T> for ByErosion {
    fn better(a: T, b: T) -> bool {
        a < b
    }

    fn meet(level: T, mask: T) -> T {
        if mask > level {
            mask
        } else {
            level
        }
    }

    fn worst() -> T {
        T::max_value()
    }

    const MAXIMA: bool = false;
}

/// Queue entry: a flood level plus the points admitted at that level.
struct Entry<T, O> {
    level: T,
    points: Vec<usize>,
    _order: PhantomData<O>,
}

impl<T, O> Entry<T, O> {
    fn new(level: T, points: Vec<usize>) -> Self {
        Self {
            level,
            points,
            _order: PhantomData,
        }
    }
}

impl<T: ScalarPixel, O: FloodOrder<T>> PartialEq for Entry<T, O> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: ScalarPixel, O: FloodOrder<T>> Eq for Entry<T, O> {}

impl<T: ScalarPixel, O: FloodOrder<T>> PartialOrd for Entry<T, O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: ScalarPixel, O: FloodOrder<T>> Ord for Entry<T, O> {
    fn cmp(&self, other: &Self) -> Ordering {
        if O::better(self.level, other.level) {
            Ordering::Greater
        } else if O::better(other.level, self.level) {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }
}

pub(crate) fn reconstruct_into<T: ScalarPixel, O: FloodOrder<T>>(
    marker: &Image<T>,
    mask: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    check_same_geometry(marker, mask)?;
    ensure_same_geometry(mask, output)?;

    // Predicate image: the marker clipped to the mask's side of the order.
    let mut work = mask.same_geometry::<T>()?;
    for offset in 0..mask.len() {
        *work.pixel_mut(offset) = O::meet(marker.pixel(offset), mask.pixel(offset));
    }

    let plateaus = extremal_plateaus(&work, element, O::MAXIMA)?;
    tracing::debug!(seeds = plateaus.len(), "reconstruction queue seeded");

    output.fill(O::worst());
    let mut heap: BinaryHeap<Entry<T, O>> = BinaryHeap::with_capacity(plateaus.len());
    for (level, points) in plateaus {
        for &point in &points {
            *output.pixel_mut(point) = level;
        }
        heap.push(Entry::new(level, points));
    }

    let propagation = element.remove_center();
    let mut hood = Neighborhood::new(mask, &propagation)?;

    while let Some(entry) = heap.pop() {
        for &point in &entry.points {
            // Stale when the pixel has been flooded at a better level since
            // this entry was queued.
            if O::better(output.pixel(point), entry.level) {
                continue;
            }
            hood.center_at_offset(point)?;
            for neighbor in hood.iter() {
                let admitted = O::meet(entry.level, neighbor.value);
                if O::better(admitted, output.pixel(neighbor.offset)) {
                    *output.pixel_mut(neighbor.offset) = admitted;
                    heap.push(Entry::new(admitted, vec![neighbor.offset]));
                }
            }
        }
    }
    Ok(())
}

/// Opening by reconstruction of a typed image.
///
/// Floods `min(marker, mask)` from its regional maxima; the result never
/// exceeds the mask and is idempotent in the marker.
pub fn opening_by_reconstruction_into<T: ScalarPixel>(
    marker: &Image<T>,
    mask: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    reconstruct_into::<T, ByDilation>(marker, mask, element, output)
}

/// Closing by reconstruction of a typed image, dual of
/// [`opening_by_reconstruction_into`].
pub fn closing_by_reconstruction_into<T: ScalarPixel>(
    marker: &Image<T>,
    mask: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    reconstruct_into::<T, ByErosion>(marker, mask, element, output)
}

/// Parameters for reconstruction
#[derive(Debug, Clone, Default)]
pub struct ReconstructionParams {
    /// Structuring element defining adjacency of the flood
    pub element: StructuringElement,
}

/// Opening-by-reconstruction algorithm
#[derive(Debug, Clone, Default)]
pub struct OpeningByReconstruction;

impl Algorithm for OpeningByReconstruction {
    type Input = (Box<dyn DynImage>, Box<dyn DynImage>);
    type Output = Box<dyn DynImage>;
    type Params = ReconstructionParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "OpeningByReconstruction"
    }

    fn description(&self) -> &'static str {
        "Geodesic reconstruction of a marker under a mask, by dilation"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (marker, mask) = input;
        let mut output = create_image(mask.dynamic_type(), mask.dimension())?;
        opening_by_reconstruction(
            marker.as_ref(),
            mask.as_ref(),
            &params.element,
            output.as_mut(),
        )?;
        Ok(output)
    }
}

/// Closing-by-reconstruction algorithm
#[derive(Debug, Clone, Default)]
pub struct ClosingByReconstruction;

impl Algorithm for ClosingByReconstruction {
    type Input = (Box<dyn DynImage>, Box<dyn DynImage>);
    type Output = Box<dyn DynImage>;
    type Params = ReconstructionParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ClosingByReconstruction"
    }

    fn description(&self) -> &'static str {
        "Geodesic reconstruction of a marker under a mask, by erosion"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let (marker, mask) = input;
        let mut output = create_image(mask.dynamic_type(), mask.dimension())?;
        closing_by_reconstruction(
            marker.as_ref(),
            mask.as_ref(),
            &params.element,
            output.as_mut(),
        )?;
        Ok(output)
    }
}

/// Opening by reconstruction of a type-erased marker/mask pair.
pub fn opening_by_reconstruction(
    marker: &dyn DynImage,
    mask: &dyn DynImage,
    element: &StructuringElement,
    output: &mut dyn DynImage,
) -> Result<()> {
    set_same(mask, output)?;
    let mut args = BinaryArgs {
        marker,
        mask,
        se: element,
        output,
    };
    first_suitable(&mut args, scalar_matrix!(opening_candidate))
}

/// Closing by reconstruction of a type-erased marker/mask pair.
pub fn closing_by_reconstruction(
    marker: &dyn DynImage,
    mask: &dyn DynImage,
    element: &StructuringElement,
    output: &mut dyn DynImage,
) -> Result<()> {
    set_same(mask, output)?;
    let mut args = BinaryArgs {
        marker,
        mask,
        se: element,
        output,
    };
    first_suitable(&mut args, scalar_matrix!(closing_candidate))
}

fn opening_candidate<T: ScalarPixel>(args: &mut BinaryArgs) -> Tried<()> {
    let (Some(marker), Some(mask)) = (
        downcast_image::<T>(args.marker),
        downcast_image::<T>(args.mask),
    ) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<T>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(reconstruct_into::<T, ByDilation>(
        marker, mask, args.se, output,
    ))
}

fn closing_candidate<T: ScalarPixel>(args: &mut BinaryArgs) -> Tried<()> {
    let (Some(marker), Some(mask)) = (
        downcast_image::<T>(args.marker),
        downcast_image::<T>(args.mask),
    ) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<T>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(reconstruct_into::<T, ByErosion>(
        marker, mask, args.se, output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmorph_core::image::Coordinate;
    use gridmorph_core::se::cross;

    fn two_domes() -> Image<u8> {
        // Two bright domes of height 9 and 5 on a dark background.
        Image::from_vec(
            &Coordinate::xy(7, 1),
            vec![0u8, 9, 0, 0, 5, 0, 0],
        )
        .unwrap()
    }

    #[test]
    fn test_reconstruction_recovers_marked_dome() {
        let mask = two_domes();
        // Marker keeps only the tall dome's summit (lowered by one).
        let mut marker = mask.same_geometry::<u8>().unwrap();
        marker.set(&Coordinate::xy(1, 0), 8).unwrap();

        let mut output = mask.same_geometry::<u8>().unwrap();
        opening_by_reconstruction_into(&marker, &mask, &cross(1), &mut output).unwrap();

        // The marked dome is rebuilt up to min(8, mask); the unmarked one
        // is levelled to the background.
        assert_eq!(output.as_slice(), &[0, 8, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_reconstruction_is_bounded_by_mask() {
        let mask = two_domes();
        let marker = Image::filled(&Coordinate::xy(7, 1), 200u8).unwrap();
        let mut output = mask.same_geometry::<u8>().unwrap();
        opening_by_reconstruction_into(&marker, &mask, &cross(1), &mut output).unwrap();

        for offset in 0..mask.len() {
            assert!(output.pixel(offset) <= mask.pixel(offset));
        }
        // A marker above the mask everywhere reconstructs the mask itself.
        assert_eq!(output, mask);
    }

    #[test]
    fn test_reconstruction_is_idempotent() {
        let mask = Image::from_vec(
            &Coordinate::xy(9, 1),
            vec![1u8, 7, 2, 6, 3, 8, 1, 4, 2],
        )
        .unwrap();
        let mut marker = mask.same_geometry::<u8>().unwrap();
        marker.set(&Coordinate::xy(3, 0), 5).unwrap();

        let mut once = mask.same_geometry::<u8>().unwrap();
        opening_by_reconstruction_into(&marker, &mask, &cross(1), &mut once).unwrap();

        let mut twice = mask.same_geometry::<u8>().unwrap();
        opening_by_reconstruction_into(&once, &mask, &cross(1), &mut twice).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_closing_by_reconstruction_fills_marked_basin() {
        // Dual case: dark basins under a bright background.
        let mask = Image::from_vec(
            &Coordinate::xy(7, 1),
            vec![9u8, 1, 9, 9, 4, 9, 9],
        )
        .unwrap();
        let mut marker = Image::filled(&Coordinate::xy(7, 1), 9u8).unwrap();
        marker.set(&Coordinate::xy(1, 0), 2).unwrap();

        let mut output = mask.same_geometry::<u8>().unwrap();
        closing_by_reconstruction_into(&marker, &mask, &cross(1), &mut output).unwrap();

        // The marked basin reopens down to max(2, mask); the unmarked one
        // is filled to the background level.
        assert_eq!(output.as_slice(), &[9, 2, 9, 9, 9, 9, 9]);
    }

    #[test]
    fn test_reconstruction_geometry_mismatch() {
        let mask = two_domes();
        let marker: Image<u8> = Image::alloc(&Coordinate::xy(3, 1)).unwrap();
        let mut output = mask.same_geometry::<u8>().unwrap();
        assert!(matches!(
            opening_by_reconstruction_into(&marker, &mask, &cross(1), &mut output),
            Err(Error::BadSize { .. })
        ));
    }

    #[test]
    fn test_reconstruction_erased_dispatch() {
        let mask = two_domes();
        let mut marker = mask.same_geometry::<u8>().unwrap();
        marker.set(&Coordinate::xy(1, 0), 8).unwrap();
        let mut output: Image<u8> = Image::new(2);
        opening_by_reconstruction(&marker, &mask, &cross(1), &mut output).unwrap();
        assert_eq!(output.as_slice(), &[0, 8, 0, 0, 0, 0, 0]);
    }
}
