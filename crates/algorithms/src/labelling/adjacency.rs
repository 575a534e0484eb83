//! Flat-zone labelling with adjacency-graph construction
//!
//! In addition to the label image, builds an undirected graph with one
//! vertex per labelled zone and an edge wherever two distinct zones touch
//! under the structuring element.

use std::collections::BTreeSet;

use gridmorph_core::dispatch::{first_suitable, Tried};
use gridmorph_core::image::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image, PixelValue,
    ScalarPixel,
};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::types::{ScalarKind, TypeDescriptor};
use gridmorph_core::{Algorithm, Error, Result};

use super::flood::flood_label;
use super::label::{write_labels, LabelParams};
use crate::support::{ensure_same_geometry, label_matrix, LabelArgs};

/// Undirected adjacency graph over labelled zones.
///
/// Vertices are the 1-based zone labels; edges are stored normalized with
/// the smaller label first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyGraph {
    vertices: usize,
    edges: BTreeSet<(usize, usize)>,
}

impl AdjacencyGraph {
    pub fn with_vertices(vertices: usize) -> Self {
        Self {
            vertices,
            edges: BTreeSet::new(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn add_edge(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let edge = (a.min(b), a.max(b));
        self.edges.insert(edge);
    }

    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.edges.contains(&(a.min(b), a.max(b)))
    }

    /// Labels adjacent to `vertex`, ascending.
    pub fn neighbors(&self, vertex: usize) -> Vec<usize> {
        self.edges
            .iter()
            .filter_map(|&(a, b)| {
                if a == vertex {
                    Some(b)
                } else if b == vertex {
                    Some(a)
                } else {
                    None
                }
            })
            .collect()
    }

    /// All edges, normalized and ascending.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied()
    }
}

/// Flat-zone labelling with adjacency graph
#[derive(Debug, Clone, Default)]
pub struct LabelWithAdjacency;

impl Algorithm for LabelWithAdjacency {
    type Input = Box<dyn DynImage>;
    type Output = (Box<dyn DynImage>, AdjacencyGraph);
    type Params = LabelParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "LabelWithAdjacency"
    }

    fn description(&self) -> &'static str {
        "Label flat zones and build the zone adjacency graph"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        let mut output = create_image(
            TypeDescriptor::scalar(params.label_kind),
            input.dimension(),
        )?;
        let (_count, graph) =
            label_with_adjacency(input.as_ref(), &params.element, output.as_mut())?;
        Ok((output, graph))
    }
}

/// Label the flat zones of a typed image and build their adjacency graph.
///
/// Returns the zone count and the graph; the label image is filled as in
/// [`super::label::label_plateaus_into`].
pub fn label_with_adjacency_into<T: PixelValue, L: ScalarPixel>(
    input: &Image<T>,
    element: &StructuringElement,
    output: &mut Image<L>,
) -> Result<(usize, AdjacencyGraph)> {
    ensure_same_geometry(input, output)?;

    // Boundary edges are recorded during the flood and resolved against the
    // final zone indices afterwards, since the far zone may not be labelled
    // yet when the edge is first seen.
    let mut boundary: Vec<(usize, usize)> = Vec::new();
    let result = flood_label(
        input,
        element,
        |_| true,
        |a, b| a == b,
        |zone, _value, offset, _neighbor| boundary.push((zone, offset)),
    )?;
    write_labels(&result, output)?;

    let mut graph = AdjacencyGraph::with_vertices(result.count);
    for (zone, offset) in boundary {
        let other = result.labels[offset];
        if other != 0 {
            graph.add_edge(zone, other);
        }
    }
    tracing::debug!(
        zones = result.count,
        edges = graph.edge_count(),
        "adjacency graph built"
    );
    Ok((result.count, graph))
}

/// Erased entry point of [`label_with_adjacency_into`].
pub fn label_with_adjacency(
    input: &dyn DynImage,
    element: &StructuringElement,
    output: &mut dyn DynImage,
) -> Result<(usize, AdjacencyGraph)> {
    set_same(input, output)?;
    let mut args = LabelArgs {
        input,
        se: element,
        output,
    };
    first_suitable(&mut args, label_matrix!(adjacency_candidate))
}

fn adjacency_candidate<T: ScalarPixel, L: ScalarPixel>(
    args: &mut LabelArgs,
) -> Tried<(usize, AdjacencyGraph)> {
    let Some(input) = downcast_image::<T>(args.input) else {
        return Tried::Pass;
    };
    let Some(output) = downcast_image_mut::<L>(&mut *args.output) else {
        return Tried::Pass;
    };
    Tried::Done(label_with_adjacency_into(input, args.se, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmorph_core::image::Coordinate;
    use gridmorph_core::se::cross;

    #[test]
    fn test_adjacency_of_three_stripes() {
        // Three vertical stripes; only consecutive stripes touch.
        let input = Image::from_vec(
            &Coordinate::xy(3, 2),
            vec![1u8, 2, 3, 1, 2, 3],
        )
        .unwrap();
        let mut output: Image<u32> = input.same_geometry().unwrap();
        let (count, graph) = label_with_adjacency_into(&input, &cross(1), &mut output).unwrap();

        assert_eq!(count, 3);
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.are_adjacent(1, 2));
        assert!(graph.are_adjacent(2, 3));
        assert!(!graph.are_adjacent(1, 3));
        assert_eq!(graph.neighbors(2), vec![1, 3]);
    }

    #[test]
    fn test_adjacency_isolated_zone_has_no_edges() {
        let input = Image::filled(&Coordinate::xy(3, 3), 7u8).unwrap();
        let mut output: Image<u32> = input.same_geometry().unwrap();
        let (count, graph) = label_with_adjacency_into(&input, &cross(1), &mut output).unwrap();
        assert_eq!(count, 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_adjacency_edges_are_undirected() {
        let input = Image::from_vec(
            &Coordinate::xy(2, 1),
            vec![4u8, 9],
        )
        .unwrap();
        let mut output: Image<u32> = input.same_geometry().unwrap();
        let (_, graph) = label_with_adjacency_into(&input, &cross(1), &mut output).unwrap();
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(1, 2)]);
        assert!(graph.are_adjacent(2, 1));
    }
}
