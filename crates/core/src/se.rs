//! Structuring elements
//!
//! A structuring element is an ordered sequence of relative offsets defining
//! adjacency for the neighborhood operators. Offsets are partitioned into
//! one or more sub-lists; a [`ListChooser`] selects the active sub-list from
//! the center coordinate. Cartesian grids use a single list; hexagonal
//! tilings alternate between two lists by row parity.
//!
//! Elements are immutable values: `remove_center` and `transpose` return new
//! elements and never mutate.

use std::ops::Range;

use crate::error::{Error, Result};
use crate::image::coords::Coordinate;

/// Selects the active sub-list for a given center.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChooser {
    /// One list, always active.
    Single,
    /// Two lists alternating by row parity: the active index is
    /// `(center_row & 1) XOR transposed`, row being coordinate index 1.
    RowParity { transposed: bool },
}

/// A set of relative neighbor offsets, optionally split into alternating
/// sub-lists.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuringElement {
    dimension: usize,
    offsets: Vec<Coordinate>,
    lists: Vec<Range<usize>>,
    chooser: ListChooser,
}

impl StructuringElement {
    /// Single-list element from explicit offsets.
    pub fn from_offsets(dimension: usize, offsets: Vec<Coordinate>) -> Result<Self> {
        for offset in &offsets {
            if offset.dimension() != dimension {
                return Err(Error::DimensionMismatch {
                    expected: dimension,
                    actual: offset.dimension(),
                });
            }
        }
        let lists = vec![0..offsets.len()];
        Ok(Self {
            dimension,
            offsets,
            lists,
            chooser: ListChooser::Single,
        })
    }

    /// Two-list element alternating by row parity (index 0 active on even
    /// rows, index 1 on odd rows).
    pub fn alternating(dimension: usize, even: Vec<Coordinate>, odd: Vec<Coordinate>) -> Result<Self> {
        if dimension < 2 {
            return Err(Error::BadParameters(
                "row-parity elements need at least two dimensions".to_string(),
            ));
        }
        for offset in even.iter().chain(odd.iter()) {
            if offset.dimension() != dimension {
                return Err(Error::DimensionMismatch {
                    expected: dimension,
                    actual: offset.dimension(),
                });
            }
        }
        let split = even.len();
        let mut offsets = even;
        offsets.extend(odd);
        let lists = vec![0..split, split..offsets.len()];
        Ok(Self {
            dimension,
            offsets,
            lists,
            chooser: ListChooser::RowParity { transposed: false },
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of offsets, all sub-lists included.
    pub fn size(&self) -> usize {
        self.offsets.len()
    }

    /// All offsets in list order.
    pub fn offsets(&self) -> &[Coordinate] {
        &self.offsets
    }

    pub fn list_count(&self) -> usize {
        self.lists.len()
    }

    pub fn list(&self, index: usize) -> &[Coordinate] {
        &self.offsets[self.lists[index].clone()]
    }

    /// Index range of a sub-list within [`StructuringElement::offsets`].
    pub fn list_range(&self, index: usize) -> Range<usize> {
        self.lists[index].clone()
    }

    pub fn is_single_list(&self) -> bool {
        self.chooser == ListChooser::Single
    }

    pub fn chooser(&self) -> ListChooser {
        self.chooser
    }

    /// Index of the sub-list active at `center`.
    ///
    /// The row-parity rule is exact: `(center_row & 1) XOR transposed`.
    pub fn active_list(&self, center: &Coordinate) -> usize {
        match self.chooser {
            ListChooser::Single => 0,
            ListChooser::RowParity { transposed } => {
                let parity = (center[1] & 1) as usize;
                parity ^ usize::from(transposed)
            }
        }
    }

    /// Whether any sub-list contains the zero offset.
    pub fn contains_center(&self) -> bool {
        self.offsets.iter().any(Coordinate::is_zero)
    }

    /// Copy of this element without the zero offset.
    ///
    /// Propagation and labelling algorithms use this so a point is never
    /// compared to itself.
    pub fn remove_center(&self) -> Self {
        let mut offsets = Vec::with_capacity(self.offsets.len());
        let mut lists = Vec::with_capacity(self.lists.len());
        for range in &self.lists {
            let start = offsets.len();
            offsets.extend(
                self.offsets[range.clone()]
                    .iter()
                    .filter(|offset| !offset.is_zero())
                    .cloned(),
            );
            lists.push(start..offsets.len());
        }
        Self {
            dimension: self.dimension,
            offsets,
            lists,
            chooser: self.chooser,
        }
    }

    /// Point reflection through the origin.
    ///
    /// Every offset is negated; a row-parity chooser additionally flips its
    /// transposed flag, because offsets with an odd row component land on the
    /// opposite parity. `se.transpose().transpose() == se` holds strictly.
    pub fn transpose(&self) -> Self {
        let offsets = self.offsets.iter().map(Coordinate::negated).collect();
        let chooser = match self.chooser {
            ListChooser::Single => ListChooser::Single,
            ListChooser::RowParity { transposed } => ListChooser::RowParity {
                transposed: !transposed,
            },
        };
        Self {
            dimension: self.dimension,
            offsets,
            lists: self.lists.clone(),
            chooser,
        }
    }

    /// Whether the two elements contain the same multiset of offsets,
    /// regardless of order and of sub-list partitioning. Strict equality
    /// (`==`) additionally requires identical order, lists and chooser.
    pub fn is_equal_unordered(&self, other: &Self) -> bool {
        if self.dimension != other.dimension || self.offsets.len() != other.offsets.len() {
            return false;
        }
        let mut a = self.offsets.clone();
        let mut b = other.offsets.clone();
        a.sort();
        b.sort();
        a == b
    }

    /// Largest reach of the element along one dimension.
    ///
    /// `forward` measures positive offsets, otherwise the magnitude of
    /// negative ones. Algorithms use this to size scratch borders.
    pub fn maximum_extension(&self, dimension: usize, forward: bool) -> usize {
        self.offsets
            .iter()
            .map(|offset| {
                let c = offset[dimension];
                if forward {
                    c.max(0)
                } else {
                    (-c).max(0)
                }
            })
            .max()
            .unwrap_or(0) as usize
    }

    /// Per-dimension minimum and maximum offsets.
    pub fn extensions(&self) -> (Coordinate, Coordinate) {
        let mut min = Coordinate::zeros(self.dimension);
        let mut max = Coordinate::zeros(self.dimension);
        for offset in &self.offsets {
            for d in 0..self.dimension {
                min[d] = min[d].min(offset[d]);
                max[d] = max[d].max(offset[d]);
            }
        }
        (min, max)
    }
}

impl Default for StructuringElement {
    fn default() -> Self {
        square(1)
    }
}

/// 2-D square element of side `2 * radius + 1`, center included.
pub fn square(radius: usize) -> StructuringElement {
    let r = radius as isize;
    let mut offsets = Vec::new();
    for y in -r..=r {
        for x in -r..=r {
            offsets.push(Coordinate::xy(x, y));
        }
    }
    StructuringElement {
        dimension: 2,
        lists: vec![0..offsets.len()],
        offsets,
        chooser: ListChooser::Single,
    }
}

/// 2-D cross (plus-shaped) element of the given radius, center included.
pub fn cross(radius: usize) -> StructuringElement {
    let r = radius as isize;
    let mut offsets = Vec::new();
    for d in -r..=r {
        offsets.push(Coordinate::xy(0, d)); // vertical arm
        if d != 0 {
            offsets.push(Coordinate::xy(d, 0)); // horizontal arm (skip center duplicate)
        }
    }
    StructuringElement {
        dimension: 2,
        lists: vec![0..offsets.len()],
        offsets,
        chooser: ListChooser::Single,
    }
}

/// 2-D disk element: offsets within Euclidean distance `radius` of the
/// center, center included.
pub fn disk(radius: usize) -> StructuringElement {
    let r = radius as isize;
    let mut offsets = Vec::new();
    for y in -r..=r {
        for x in -r..=r {
            let dist = ((x * x + y * y) as f64).sqrt();
            if dist <= radius as f64 {
                offsets.push(Coordinate::xy(x, y));
            }
        }
    }
    StructuringElement {
        dimension: 2,
        lists: vec![0..offsets.len()],
        offsets,
        chooser: ListChooser::Single,
    }
}

/// Hexagonal element on an offset-row tiling: six neighbors plus center,
/// alternating by row parity (odd rows shifted half a cell right).
pub fn hexagon() -> StructuringElement {
    let even = vec![
        Coordinate::xy(0, 0),
        Coordinate::xy(1, 0),
        Coordinate::xy(-1, 0),
        Coordinate::xy(0, -1),
        Coordinate::xy(-1, -1),
        Coordinate::xy(0, 1),
        Coordinate::xy(-1, 1),
    ];
    let odd = vec![
        Coordinate::xy(0, 0),
        Coordinate::xy(1, 0),
        Coordinate::xy(-1, 0),
        Coordinate::xy(1, -1),
        Coordinate::xy(0, -1),
        Coordinate::xy(1, 1),
        Coordinate::xy(0, 1),
    ];
    StructuringElement {
        dimension: 2,
        lists: vec![0..7, 7..14],
        offsets: even.into_iter().chain(odd).collect(),
        chooser: ListChooser::RowParity { transposed: false },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_offsets() {
        let se = square(1);
        assert_eq!(se.size(), 9);
        assert!(se.contains_center());
        assert!(se.offsets().contains(&Coordinate::xy(-1, -1)));
        assert!(se.offsets().contains(&Coordinate::xy(1, 1)));
    }

    #[test]
    fn test_cross_offsets() {
        let se = cross(1);
        assert_eq!(se.size(), 5);
        assert!(se.offsets().contains(&Coordinate::xy(0, 0)));
        assert!(se.offsets().contains(&Coordinate::xy(0, -1)));
        assert!(se.offsets().contains(&Coordinate::xy(1, 0)));
        // Corners must not be present.
        assert!(!se.offsets().contains(&Coordinate::xy(1, 1)));
    }

    #[test]
    fn test_disk_radius_one_is_cross() {
        // Diagonals are sqrt(2) > 1, so disk(1) holds center + 4 cardinals.
        let se = disk(1);
        assert_eq!(se.size(), 5);
        assert!(se.is_equal_unordered(&cross(1)));
    }

    #[test]
    fn test_remove_center() {
        let se = square(1);
        let no_center = se.remove_center();
        assert_eq!(no_center.size(), se.size() - 1);
        assert!(!no_center.contains_center());
        // Removing again changes nothing.
        assert_eq!(no_center.remove_center().size(), no_center.size());
    }

    #[test]
    fn test_transpose_involution() {
        let se = StructuringElement::from_offsets(
            2,
            vec![
                Coordinate::xy(0, 0),
                Coordinate::xy(1, 0),
                Coordinate::xy(2, -1),
            ],
        )
        .unwrap();
        let transposed = se.transpose();
        assert!(transposed.offsets().contains(&Coordinate::xy(-2, 1)));
        assert_eq!(transposed.transpose(), se);
    }

    #[test]
    fn test_transpose_involution_hexagon() {
        let se = hexagon();
        assert_eq!(se.transpose().transpose(), se);
    }

    #[test]
    fn test_hexagon_parity_rule() {
        let se = hexagon();
        assert_eq!(se.active_list(&Coordinate::xy(3, 0)), 0);
        assert_eq!(se.active_list(&Coordinate::xy(3, 1)), 1);
        assert_eq!(se.active_list(&Coordinate::xy(0, 4)), 0);

        // Transposition flips the chooser's notion of parity.
        let transposed = se.transpose();
        assert_eq!(transposed.active_list(&Coordinate::xy(3, 0)), 1);
        assert_eq!(transposed.active_list(&Coordinate::xy(3, 1)), 0);
    }

    #[test]
    fn test_hexagon_lists() {
        let se = hexagon();
        assert_eq!(se.list_count(), 2);
        assert_eq!(se.list(0).len(), 7);
        assert_eq!(se.list(1).len(), 7);
        // Each list holds six neighbors plus center.
        assert!(se.list(0).contains(&Coordinate::xy(-1, -1)));
        assert!(se.list(1).contains(&Coordinate::xy(1, -1)));
    }

    #[test]
    fn test_is_equal_unordered() {
        let a = StructuringElement::from_offsets(
            2,
            vec![Coordinate::xy(0, 0), Coordinate::xy(1, 0), Coordinate::xy(0, 1)],
        )
        .unwrap();
        let b = StructuringElement::from_offsets(
            2,
            vec![Coordinate::xy(0, 1), Coordinate::xy(0, 0), Coordinate::xy(1, 0)],
        )
        .unwrap();
        assert!(a.is_equal_unordered(&b));
        assert_ne!(a, b); // strict equality is order-sensitive

        let c = StructuringElement::from_offsets(
            2,
            vec![Coordinate::xy(0, 0), Coordinate::xy(1, 0), Coordinate::xy(1, 1)],
        )
        .unwrap();
        assert!(!a.is_equal_unordered(&c));
    }

    #[test]
    fn test_maximum_extension() {
        let se = StructuringElement::from_offsets(
            2,
            vec![
                Coordinate::xy(-2, 0),
                Coordinate::xy(1, 3),
                Coordinate::xy(0, -1),
            ],
        )
        .unwrap();
        assert_eq!(se.maximum_extension(0, true), 1);
        assert_eq!(se.maximum_extension(0, false), 2);
        assert_eq!(se.maximum_extension(1, true), 3);
        assert_eq!(se.maximum_extension(1, false), 1);

        let (min, max) = se.extensions();
        assert_eq!(min, Coordinate::xy(-2, -1));
        assert_eq!(max, Coordinate::xy(1, 3));
    }

    #[test]
    fn test_dimension_validation() {
        let bad = StructuringElement::from_offsets(2, vec![Coordinate::xyz(0, 0, 0)]);
        assert!(matches!(bad, Err(Error::DimensionMismatch { .. })));
    }
}
