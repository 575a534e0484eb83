//! Pixel element traits for generic image values
//!
//! [`PixelValue`] bounds the types storable in an image cell; [`ScalarPixel`]
//! adds the ordering and bounded arithmetic the neighborhood operators need.

use std::fmt::Debug;

use num_traits::NumCast;

use crate::error::{Error, Result};
use crate::types::{CompoundKind, TypeDescriptor};
use crate::variant::{ScalarComponent, Variant, VariantValue};

/// Trait for types that can be stored in an image cell.
///
/// Blanket-implemented for every `Copy` variant-convertible type: the
/// built-in scalars plus [`Pixel3`] and [`Pixel4`].
pub trait PixelValue:
    VariantValue + Copy + Clone + Debug + PartialEq + Default + Send + Sync + 'static
{
}

impl<T> PixelValue for T where
    T: VariantValue + Copy + Clone + Debug + PartialEq + Default + Send + Sync + 'static
{
}

/// Ordered pixel types with bounded arithmetic.
///
/// This is what the min/max neighborhood operators, the flooding queues and
/// the label/distance counters are generic over.
pub trait ScalarPixel: PixelValue + PartialOrd {
    /// Minimum value representable by this type (the "worst" sentinel of the
    /// ascending order).
    fn min_value() -> Self;

    /// Maximum value representable by this type.
    fn max_value() -> Self;

    /// Whether this type is a floating point type
    fn is_float() -> bool;

    /// Addition saturating at `max_value`
    fn add_bounded(self, other: Self) -> Self;

    /// Subtraction saturating at `min_value`
    fn sub_bounded(self, other: Self) -> Self;

    /// Convert a label/level counter, `None` when it does not fit.
    fn from_count(count: usize) -> Option<Self>;

    /// Convert self to f64
    fn to_f64(self) -> Option<f64>;
}

macro_rules! impl_scalar_pixel_int {
    ($t:ty) => {
        impl ScalarPixel for $t {
            fn min_value() -> Self {
                <$t>::MIN
            }

            fn max_value() -> Self {
                <$t>::MAX
            }

            fn is_float() -> bool {
                false
            }

            fn add_bounded(self, other: Self) -> Self {
                self.saturating_add(other)
            }

            fn sub_bounded(self, other: Self) -> Self {
                self.saturating_sub(other)
            }

            fn from_count(count: usize) -> Option<Self> {
                NumCast::from(count)
            }

            fn to_f64(self) -> Option<f64> {
                NumCast::from(self)
            }
        }
    };
}

macro_rules! impl_scalar_pixel_float {
    ($t:ty) => {
        impl ScalarPixel for $t {
            fn min_value() -> Self {
                <$t>::NEG_INFINITY
            }

            fn max_value() -> Self {
                <$t>::INFINITY
            }

            fn is_float() -> bool {
                true
            }

            fn add_bounded(self, other: Self) -> Self {
                self + other
            }

            fn sub_bounded(self, other: Self) -> Self {
                self - other
            }

            fn from_count(count: usize) -> Option<Self> {
                NumCast::from(count)
            }

            fn to_f64(self) -> Option<f64> {
                NumCast::from(self)
            }
        }
    };
}

impl_scalar_pixel_int!(u8);
impl_scalar_pixel_int!(i8);
impl_scalar_pixel_int!(u16);
impl_scalar_pixel_int!(i16);
impl_scalar_pixel_int!(u32);
impl_scalar_pixel_int!(i32);
impl_scalar_pixel_int!(u64);
impl_scalar_pixel_int!(i64);
impl_scalar_pixel_float!(f32);
impl_scalar_pixel_float!(f64);

// Binary images order false < true, so erosion is AND and dilation is OR.
impl ScalarPixel for bool {
    fn min_value() -> Self {
        false
    }

    fn max_value() -> Self {
        true
    }

    fn is_float() -> bool {
        false
    }

    fn add_bounded(self, other: Self) -> Self {
        self | other
    }

    fn sub_bounded(self, other: Self) -> Self {
        self & !other
    }

    fn from_count(count: usize) -> Option<Self> {
        match count {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }

    fn to_f64(self) -> Option<f64> {
        Some(if self { 1.0 } else { 0.0 })
    }
}

/// Three same-typed channels with a compile-time channel count.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pixel3<T>(pub [T; 3]);

/// Four same-typed channels with a compile-time channel count.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pixel4<T>(pub [T; 4]);

macro_rules! impl_pixel_variant {
    ($pixel:ident, $n:expr, $compound:ident) => {
        impl<T> $pixel<T> {
            pub fn new(channels: [T; $n]) -> Self {
                Self(channels)
            }

            pub fn channels(&self) -> &[T; $n] {
                &self.0
            }
        }

        impl<T> From<[T; $n]> for $pixel<T> {
            fn from(channels: [T; $n]) -> Self {
                Self(channels)
            }
        }

        impl<T: ScalarComponent> VariantValue for $pixel<T> {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::new(CompoundKind::$compound, T::kind())
            }

            fn into_variant(self) -> Variant {
                Variant::$compound(self.0.map(T::to_scalar))
            }

            fn from_variant(variant: &Variant) -> Result<Self> {
                let bad_cast = || Error::BadCast {
                    expected: Self::descriptor(),
                    found: variant.descriptor(),
                };
                match variant {
                    Variant::$compound(channels) => {
                        let first = T::from_scalar(&channels[0]).ok_or_else(bad_cast)?;
                        let mut out = [first; $n];
                        for (slot, scalar) in out.iter_mut().zip(channels.iter()).skip(1) {
                            *slot = T::from_scalar(scalar).ok_or_else(bad_cast)?;
                        }
                        Ok(Self(out))
                    }
                    _ => Err(bad_cast()),
                }
            }
        }
    };
}

impl_pixel_variant!(Pixel3, 3, Pixel3);
impl_pixel_variant!(Pixel4, 4, Pixel4);
