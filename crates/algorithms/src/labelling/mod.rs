//! Connected-component labelling
//!
//! One generic flood core parameterized by seed and acceptance predicates,
//! with pluggable finalizers: label into an image, collect extremal plateaus
//! with their member offsets, or build the zone adjacency graph.

mod adjacency;
mod extrema;
mod flood;
mod label;

pub use adjacency::{
    label_with_adjacency, label_with_adjacency_into, AdjacencyGraph, LabelWithAdjacency,
};
pub use extrema::{
    label_maxima, label_maxima_into, label_minima, label_minima_into, LabelMaxima, LabelMinima,
};
pub use label::{
    label, label_into, label_plateaus, label_plateaus_into, Label, LabelParams, LabelPlateaus,
};

pub(crate) use extrema::extremal_plateaus;
