//! Neighborhood views over an image
//!
//! A [`Neighborhood`] binds one image and one structuring element and
//! iterates the pixels at the active offsets around a center point. The view
//! is transient and non-owning: re-centering reuses the same object without
//! reallocation, and starting a new center invalidates the previous
//! iteration (enforced by the borrow checker).
//!
//! Border policy: offsets falling outside the allocated buffer are silently
//! skipped. This is applied uniformly by every algorithm in the library.

use std::ops::Range;

use crate::error::{Error, Result};
use crate::image::coords::{from_coordinate_to_offset, from_offset_to_coordinate, Coordinate};
use crate::image::element::PixelValue;
use crate::image::grid::Image;
use crate::se::StructuringElement;

/// One neighbor produced by the view: the pixel's linear offset in the bound
/// image plus its value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<T> {
    pub offset: usize,
    pub value: T,
}

/// Transient iteration object bound to one image and one structuring
/// element.
pub struct Neighborhood<'a, T: PixelValue> {
    image: &'a Image<T>,
    se: &'a StructuringElement,
    /// Precomputed linear delta per structuring-element offset.
    deltas: Vec<isize>,
    center: Coordinate,
    center_offset: usize,
    active: Range<usize>,
}

impl<'a, T: PixelValue> Neighborhood<'a, T> {
    /// Bind a view, initially centered on the origin.
    pub fn new(image: &'a Image<T>, se: &'a StructuringElement) -> Result<Self> {
        if !image.is_allocated() {
            return Err(Error::NotAllocated);
        }
        if image.dimension() != se.dimension() {
            return Err(Error::DimensionMismatch {
                expected: image.dimension(),
                actual: se.dimension(),
            });
        }

        let size = image.size();
        let mut strides = vec![0isize; size.dimension()];
        let mut stride = 1isize;
        for d in 0..size.dimension() {
            strides[d] = stride;
            stride *= size[d];
        }
        let deltas = se
            .offsets()
            .iter()
            .map(|offset| {
                (0..size.dimension())
                    .map(|d| offset[d] * strides[d])
                    .sum()
            })
            .collect();

        let center = Coordinate::zeros(size.dimension());
        let active = se.list_range(se.active_list(&center));
        Ok(Self {
            image,
            se,
            deltas,
            center,
            center_offset: 0,
            active,
        })
    }

    /// Re-center the view on a coordinate.
    ///
    /// Re-evaluates the structuring element's list chooser for the new
    /// center. Fails with `OutOfBounds` when the center itself lies outside
    /// the image.
    pub fn center(&mut self, coordinate: &Coordinate) -> Result<()> {
        self.center_offset = from_coordinate_to_offset(self.image.size(), coordinate)?;
        self.center.clone_from(coordinate);
        self.active = self.se.list_range(self.se.active_list(&self.center));
        Ok(())
    }

    /// Re-center the view on a linear offset.
    pub fn center_at_offset(&mut self, offset: usize) -> Result<()> {
        let coordinate = from_offset_to_coordinate(self.image.size(), offset)?;
        self.center = coordinate;
        self.center_offset = offset;
        self.active = self.se.list_range(self.se.active_list(&self.center));
        Ok(())
    }

    pub fn center_coordinate(&self) -> &Coordinate {
        &self.center
    }

    pub fn center_offset(&self) -> usize {
        self.center_offset
    }

    /// Single-pass, forward-only iteration over the in-bounds neighbors at
    /// the currently active offsets.
    pub fn iter(&self) -> Neighbors<'_, 'a, T> {
        Neighbors {
            hood: self,
            index: self.active.start,
        }
    }
}

/// Iterator over the active, in-bounds neighbors of the current center.
pub struct Neighbors<'n, 'a, T: PixelValue> {
    hood: &'n Neighborhood<'a, T>,
    index: usize,
}

impl<T: PixelValue> Iterator for Neighbors<'_, '_, T> {
    type Item = Neighbor<T>;

    fn next(&mut self) -> Option<Neighbor<T>> {
        let hood = self.hood;
        let size = hood.image.size();
        while self.index < hood.active.end {
            let k = self.index;
            self.index += 1;

            let offset = &hood.se.offsets()[k];
            let mut inside = true;
            for d in 0..size.dimension() {
                let n = hood.center[d] + offset[d];
                if n < 0 || n >= size[d] {
                    inside = false;
                    break;
                }
            }
            if inside {
                let linear = (hood.center_offset as isize + hood.deltas[k]) as usize;
                return Some(Neighbor {
                    offset: linear,
                    value: hood.image.pixel(linear),
                });
            }
        }
        None
    }
}
