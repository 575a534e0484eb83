//! Neighborhood reduction cores shared by erosion and dilation
//!
//! Two implementations back every min/max filter: a generic N-D walk over a
//! [`Neighborhood`] view, and a 2-D row tier for single-list elements that
//! parallelizes over rows. Both apply the uniform border policy: offsets
//! falling outside the image are skipped, and a pixel whose active
//! neighborhood yields no in-bounds sample keeps its input value.

use crate::maybe_rayon::*;

use gridmorph_core::image::{Image, Neighborhood, ScalarPixel};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::Result;

use crate::support::ensure_same_geometry;

#[inline]
pub(crate) fn pick_min<T: PartialOrd>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

#[inline]
pub(crate) fn pick_max<T: PartialOrd>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

/// Generic N-D reduction over the active neighborhood of every pixel.
pub(crate) fn neighborhood_reduce_nd<T: ScalarPixel>(
    input: &Image<T>,
    se: &StructuringElement,
    output: &mut Image<T>,
    pick: fn(T, T) -> T,
) -> Result<()> {
    ensure_same_geometry(input, output)?;
    let mut hood = Neighborhood::new(input, se)?;

    for offset in 0..input.len() {
        hood.center_at_offset(offset)?;
        let mut acc: Option<T> = None;
        for neighbor in hood.iter() {
            acc = Some(match acc {
                None => neighbor.value,
                Some(current) => pick(current, neighbor.value),
            });
        }
        *output.pixel_mut(offset) = acc.unwrap_or_else(|| input.pixel(offset));
    }
    Ok(())
}

/// 2-D row tier for single-list elements, parallel over rows.
///
/// Callers guarantee a two-dimensional image and a single-list element; the
/// dispatcher's fast tier checks both before selecting this path.
pub(crate) fn neighborhood_reduce_rows<T: ScalarPixel>(
    input: &Image<T>,
    se: &StructuringElement,
    output: &mut Image<T>,
    pick: fn(T, T) -> T,
) -> Result<()> {
    ensure_same_geometry(input, output)?;
    let size = input.size();
    let (width, height) = (size[0], size[1]);
    let offsets: Vec<(isize, isize)> = se.offsets().iter().map(|o| (o[0], o[1])).collect();

    let data: Vec<T> = (0..height)
        .into_par_iter()
        .flat_map(|y| {
            let mut row = Vec::with_capacity(width as usize);
            for x in 0..width {
                let mut acc: Option<T> = None;
                for &(dx, dy) in &offsets {
                    let nx = x + dx;
                    let ny = y + dy;
                    if nx < 0 || ny < 0 || nx >= width || ny >= height {
                        continue;
                    }
                    // In bounds by the check above.
                    let value = unsafe { input.pixel_unchecked((nx + ny * width) as usize) };
                    acc = Some(match acc {
                        None => value,
                        Some(current) => pick(current, value),
                    });
                }
                row.push(acc.unwrap_or_else(|| input.pixel((x + y * width) as usize)));
            }
            row
        })
        .collect();

    output.as_mut_slice().copy_from_slice(&data);
    Ok(())
}
