//! Generic connected-component flood core
//!
//! One depth-first flood backs every labelling variant. It is parameterized
//! by a seed predicate (may this pixel belong to any component), an
//! acceptance predicate (do two adjacent pixels share a component) and a
//! boundary hook invoked for every rejected neighbor edge. The finalizers
//! (writing a label image, collecting member offsets, accumulating extremal
//! checks, recording adjacency) are built on top of the returned label
//! buffer and the hook.
//!
//! The structuring element's center is removed before flooding, so a point
//! is never compared to itself.

use gridmorph_core::image::{Image, Neighborhood, PixelValue};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::Result;

/// Raw result of a flood: per-pixel component indices (0 = no component)
/// and the component count. Indices are dense in `1..=count`, assigned in
/// buffer traversal order.
pub(crate) struct FloodResult {
    pub labels: Vec<usize>,
    pub count: usize,
}

pub(crate) fn flood_label<T, S, A, B>(
    image: &Image<T>,
    se: &StructuringElement,
    seed: S,
    accept: A,
    mut on_boundary: B,
) -> Result<FloodResult>
where
    T: PixelValue,
    S: Fn(T) -> bool,
    A: Fn(T, T) -> bool,
    B: FnMut(usize, T, usize, T),
{
    let propagation = se.remove_center();
    let mut hood = Neighborhood::new(image, &propagation)?;

    let mut labels = vec![0usize; image.len()];
    let mut stack: Vec<usize> = Vec::new();
    let mut count = 0usize;

    for start in 0..image.len() {
        if labels[start] != 0 || !seed(image.pixel(start)) {
            continue;
        }
        count += 1;
        labels[start] = count;
        stack.push(start);

        while let Some(center) = stack.pop() {
            let value = image.pixel(center);
            hood.center_at_offset(center)?;
            for neighbor in hood.iter() {
                if seed(neighbor.value) && accept(value, neighbor.value) {
                    if labels[neighbor.offset] == 0 {
                        labels[neighbor.offset] = count;
                        stack.push(neighbor.offset);
                    }
                } else {
                    on_boundary(count, value, neighbor.offset, neighbor.value);
                }
            }
        }
    }

    tracing::debug!(components = count, "flood labelling finished");
    Ok(FloodResult { labels, count })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmorph_core::image::Coordinate;
    use gridmorph_core::se::cross;

    #[test]
    fn test_flood_partitions_plateaus() {
        // Two plateaus of 1 separated by a 0 column.
        let input = Image::from_vec(
            &Coordinate::xy(3, 3),
            vec![1u8, 0, 1, 1, 0, 1, 1, 0, 1],
        )
        .unwrap();
        let result =
            flood_label(&input, &cross(1), |_| true, |a, b| a == b, |_, _, _, _| ()).unwrap();
        assert_eq!(result.count, 3);
        // Left column, middle column and right column each form a component.
        assert_eq!(result.labels[0], result.labels[3]);
        assert_eq!(result.labels[0], result.labels[6]);
        assert_eq!(result.labels[2], result.labels[8]);
        assert_ne!(result.labels[0], result.labels[1]);
        assert_ne!(result.labels[0], result.labels[2]);
    }

    #[test]
    fn test_flood_respects_seed_predicate() {
        let input = Image::from_vec(
            &Coordinate::xy(3, 1),
            vec![4u8, 0, 4],
        )
        .unwrap();
        let result =
            flood_label(&input, &cross(1), |v| v != 0, |_, _| true, |_, _, _, _| ()).unwrap();
        assert_eq!(result.count, 2);
        assert_eq!(result.labels[1], 0);
    }

    #[test]
    fn test_boundary_hook_sees_rejected_edges() {
        let input = Image::from_vec(
            &Coordinate::xy(2, 1),
            vec![3u8, 9],
        )
        .unwrap();
        let mut edges = Vec::new();
        flood_label(
            &input,
            &cross(1),
            |_| true,
            |a, b| a == b,
            |label, value, offset, neighbor| edges.push((label, value, offset, neighbor)),
        )
        .unwrap();
        assert_eq!(edges, vec![(1, 3, 1, 9), (2, 9, 0, 3)]);
    }
}
