//! Mathematical morphology operators
//!
//! Classical neighborhood operators over generic pixel types:
//! - **Erosion / dilation**: min/max filters over a structuring element
//! - **Gradients**: dilation minus erosion, plus the two half gradients
//! - **Opening / closing**: composed filters removing small bright or dark
//!   features
//! - **Top-hat / black-hat**: residues of opening and closing
//! - **Reconstruction**: geodesic flooding of a marker under a mask
//! - **H-extrema**: height-parameterized suppression of shallow extrema
//!
//! Every operator exists as a typed generic `*_into` function and as a
//! type-erased entry point dispatching over the concrete pixel matrix.

mod closing;
mod dilate;
mod erode;
mod gradient;
mod h_extrema;
mod opening;
mod reconstruction;
mod reduce;
mod tophat;

pub use closing::{closing, closing_into, Closing, ClosingParams};
pub use dilate::{dilate, dilate_into, Dilate, DilateParams};
pub use erode::{erode, erode_into, Erode, ErodeParams};
pub use gradient::{
    external_gradient, external_gradient_into, gradient, gradient_into, internal_gradient,
    internal_gradient_into, ExternalGradient, Gradient, GradientParams, InternalGradient,
};
pub use h_extrema::{
    h_concave, h_concave_into, h_convex, h_convex_into, h_maxima, h_maxima_into, h_minima,
    h_minima_into, pseudo_dynamic_closing, pseudo_dynamic_closing_into, pseudo_dynamic_opening,
    pseudo_dynamic_opening_into, HConcave, HConvex, HExtremaParams, HMaxima, HMinima,
    PseudoDynamicClosing, PseudoDynamicOpening,
};
pub use opening::{opening, opening_into, Opening, OpeningParams};
pub use reconstruction::{
    closing_by_reconstruction, closing_by_reconstruction_into, opening_by_reconstruction,
    opening_by_reconstruction_into, ClosingByReconstruction, OpeningByReconstruction,
    ReconstructionParams,
};
pub use tophat::{
    black_hat, black_hat_into, top_hat, top_hat_into, BlackHat, BlackHatParams, TopHat,
    TopHatParams,
};
