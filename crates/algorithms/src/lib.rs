//! # GridMorph Algorithms
//!
//! Neighborhood and flooding algorithms for GridMorph.
//!
//! ## Available Algorithm Categories
//!
//! - **morphology**: erosion, dilation, gradients, opening/closing,
//!   top-hats, geodesic reconstruction, h-extrema
//! - **labelling**: connected components, flat zones, regional extrema,
//!   adjacency graphs
//! - **distance**: BFS distance-to-background and quasi-distance
//!
//! Every public operation exists on two layers: a typed generic function
//! over [`gridmorph_core::image::Image`] and a type-erased entry point that
//! dispatches over a fixed matrix of concrete pixel types via
//! [`gridmorph_core::dispatch`].

pub mod distance;
pub mod labelling;
mod maybe_rayon;
pub mod morphology;
mod support;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::distance::{
        binary_distance_into, quasi_distance, quasi_distance_into, QuasiDistance,
        QuasiDistanceParams,
    };
    pub use crate::labelling::{
        label, label_into, label_maxima, label_maxima_into, label_minima, label_minima_into,
        label_plateaus, label_plateaus_into, label_with_adjacency, label_with_adjacency_into,
        AdjacencyGraph, Label, LabelParams,
    };
    pub use crate::morphology::{
        black_hat, closing, closing_by_reconstruction, dilate, erode, external_gradient,
        gradient, h_concave, h_convex, h_maxima, h_minima, internal_gradient, opening,
        opening_by_reconstruction, pseudo_dynamic_closing, pseudo_dynamic_opening, top_hat,
    };
    pub use gridmorph_core::prelude::*;
}
