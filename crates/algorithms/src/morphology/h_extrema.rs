//! Height-parameterized extrema transforms
//!
//! Fixed compositions of bounded add/subtract with reconstruction:
//! - `h_minima(f, h)` = closing-by-reconstruction of `f + h` under `f`,
//!   suppressing minima shallower than `h`
//! - `h_maxima(f, h)` = opening-by-reconstruction of `f - h` under `f`
//! - `h_concave(f, h)` = `h_minima(f, h) - f`
//! - `h_convex(f, h)` = `f - h_maxima(f, h)`
//! - `pseudo_dynamic_opening(f, h)`: reconstruction of `f` from the summits
//!   whose dynamic reaches `h` (where `f - h_maxima(f, h) = h`), removing
//!   shallow maxima while restoring the surviving ones to full height
//! - `pseudo_dynamic_closing(f, h)`: the dual, over minima
//!
//! All additions and subtractions saturate at the pixel type's bounds.

use gridmorph_core::dispatch::{first_suitable, Tried};
use gridmorph_core::image::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image, ScalarPixel,
};
use gridmorph_core::se::StructuringElement;
use gridmorph_core::variant::{Variant, VariantValue};
use gridmorph_core::{Algorithm, Error, Result};

use num_traits::NumCast;

use super::reconstruction::{closing_by_reconstruction_into, opening_by_reconstruction_into};
use crate::support::{map2_into, map_into, numeric_matrix, UnaryLevelArgs};

/// Suppress minima shallower than `height`.
pub fn h_minima_into<T: ScalarPixel>(
    input: &Image<T>,
    height: T,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut marker = input.same_geometry::<T>()?;
    map_into(input, &mut marker, |v| v.add_bounded(height))?;
    closing_by_reconstruction_into(&marker, input, element, output)
}

/// Suppress maxima shallower than `height`.
pub fn h_maxima_into<T: ScalarPixel>(
    input: &Image<T>,
    height: T,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut marker = input.same_geometry::<T>()?;
    map_into(input, &mut marker, |v| v.sub_bounded(height))?;
    opening_by_reconstruction_into(&marker, input, element, output)
}

/// Depth of the minima removed by [`h_minima_into`].
pub fn h_concave_into<T: ScalarPixel>(
    input: &Image<T>,
    height: T,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut filled = input.same_geometry::<T>()?;
    h_minima_into(input, height, element, &mut filled)?;
    map2_into(&filled, input, output, |f, c| f.sub_bounded(c))
}

/// Height of the maxima removed by [`h_maxima_into`].
pub fn h_convex_into<T: ScalarPixel>(
    input: &Image<T>,
    height: T,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut opened = input.same_geometry::<T>()?;
    h_maxima_into(input, height, element, &mut opened)?;
    map2_into(input, &opened, output, |c, o| c.sub_bounded(o))
}

/// Remove maxima of dynamic below `height` while restoring the surviving
/// ones to their original height.
///
/// The marker keeps `f` only at summits the h-maxima transform lowered by
/// the full `height`; reconstructing it under `f` rebuilds exactly the
/// high-dynamic peaks.
pub fn pseudo_dynamic_opening_into<T: ScalarPixel>(
    input: &Image<T>,
    height: T,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut opened = input.same_geometry::<T>()?;
    h_maxima_into(input, height, element, &mut opened)?;
    let mut marker = input.same_geometry::<T>()?;
    map2_into(input, &opened, &mut marker, |c, o| {
        if c.sub_bounded(o) >= height {
            c
        } else {
            T::min_value()
        }
    })?;
    opening_by_reconstruction_into(&marker, input, element, output)
}

/// Dual of [`pseudo_dynamic_opening_into`] for minima.
pub fn pseudo_dynamic_closing_into<T: ScalarPixel>(
    input: &Image<T>,
    height: T,
    element: &StructuringElement,
    output: &mut Image<T>,
) -> Result<()> {
    let mut filled = input.same_geometry::<T>()?;
    h_minima_into(input, height, element, &mut filled)?;
    let mut marker = input.same_geometry::<T>()?;
    map2_into(&filled, input, &mut marker, |f, c| {
        if f.sub_bounded(c) >= height {
            c
        } else {
            T::max_value()
        }
    })?;
    closing_by_reconstruction_into(&marker, input, element, output)
}

macro_rules! erased_height_entry {
    ($(#[$doc:meta])* $name:ident, $candidate:ident, $typed:ident) => {
        $(#[$doc])*
        pub fn $name(
            input: &dyn DynImage,
            height: &Variant,
            element: &StructuringElement,
            output: &mut dyn DynImage,
        ) -> Result<()> {
            set_same(input, output)?;
            let mut args = UnaryLevelArgs {
                input,
                level: height,
                se: element,
                output,
            };
            first_suitable(&mut args, numeric_matrix!($candidate))
        }

        fn $candidate<T: ScalarPixel + NumCast>(args: &mut UnaryLevelArgs) -> Tried<()> {
            let Some(input) = downcast_image::<T>(args.input) else {
                return Tried::Pass;
            };
            let Some(output) = downcast_image_mut::<T>(&mut *args.output) else {
                return Tried::Pass;
            };
            let height = match args.level.as_number::<T>() {
                Ok(height) => height,
                Err(error) => return Tried::Done(Err(error)),
            };
            Tried::Done($typed(input, height, args.se, output))
        }
    };
}

erased_height_entry!(
    /// Suppress shallow minima of a type-erased image.
    h_minima,
    h_minima_candidate,
    h_minima_into
);
erased_height_entry!(
    /// Suppress shallow maxima of a type-erased image.
    h_maxima,
    h_maxima_candidate,
    h_maxima_into
);
erased_height_entry!(
    /// Depth of the removed minima of a type-erased image.
    h_concave,
    h_concave_candidate,
    h_concave_into
);
erased_height_entry!(
    /// Height of the removed maxima of a type-erased image.
    h_convex,
    h_convex_candidate,
    h_convex_into
);
erased_height_entry!(
    /// Pseudo-dynamic opening of a type-erased image.
    pseudo_dynamic_opening,
    pseudo_dynamic_opening_candidate,
    pseudo_dynamic_opening_into
);
erased_height_entry!(
    /// Pseudo-dynamic closing of a type-erased image.
    pseudo_dynamic_closing,
    pseudo_dynamic_closing_candidate,
    pseudo_dynamic_closing_into
);

/// Parameters for the height-parameterized transforms
#[derive(Debug, Clone)]
pub struct HExtremaParams {
    /// Structuring element defining adjacency of the flood
    pub element: StructuringElement,
    /// Extremum height threshold, coerced to the image's pixel type
    pub height: Variant,
}

impl Default for HExtremaParams {
    fn default() -> Self {
        Self {
            element: StructuringElement::default(),
            height: 1u8.into_variant(),
        }
    }
}

macro_rules! height_algorithm {
    ($struct_name:ident, $display:literal, $describe:literal, $entry:ident) => {
        #[derive(Debug, Clone, Default)]
        pub struct $struct_name;

        impl Algorithm for $struct_name {
            type Input = Box<dyn DynImage>;
            type Output = Box<dyn DynImage>;
            type Params = HExtremaParams;
            type Error = Error;

            fn name(&self) -> &'static str {
                $display
            }

            fn description(&self) -> &'static str {
                $describe
            }

            fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
                let mut output = create_image(input.dynamic_type(), input.dimension())?;
                $entry(input.as_ref(), &params.height, &params.element, output.as_mut())?;
                Ok(output)
            }
        }
    };
}

height_algorithm!(HMinima, "HMinima", "Suppress minima shallower than h", h_minima);
height_algorithm!(HMaxima, "HMaxima", "Suppress maxima shallower than h", h_maxima);
height_algorithm!(HConcave, "HConcave", "Depth of the minima removed by h-minima", h_concave);
height_algorithm!(HConvex, "HConvex", "Height of the maxima removed by h-maxima", h_convex);
height_algorithm!(
    PseudoDynamicOpening,
    "PseudoDynamicOpening",
    "Remove shallow maxima, restoring surviving heights",
    pseudo_dynamic_opening
);
height_algorithm!(
    PseudoDynamicClosing,
    "PseudoDynamicClosing",
    "Fill shallow minima, restoring surviving depths",
    pseudo_dynamic_closing
);
