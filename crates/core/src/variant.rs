//! Runtime-tagged value container
//!
//! [`Variant`] is a closed tagged union carrying any value the type-erased
//! layer can exchange: scalars, fixed-channel pixels, coordinates and nested
//! containers. The tag always matches the stored representation, so
//! [`Variant::descriptor`] is total and [`Variant::get`] either returns the
//! exact stored type or fails with [`Error::BadCast`].

use std::collections::BTreeMap;

use num_traits::NumCast;

use crate::error::{Error, Result};
use crate::image::coords::Coordinate;
use crate::types::{CompoundKind, ScalarKind, TypeDescriptor};

/// A single tagged scalar value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
}

impl Scalar {
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::U8(_) => ScalarKind::U8,
            Scalar::I8(_) => ScalarKind::I8,
            Scalar::U16(_) => ScalarKind::U16,
            Scalar::I16(_) => ScalarKind::I16,
            Scalar::U32(_) => ScalarKind::U32,
            Scalar::I32(_) => ScalarKind::I32,
            Scalar::U64(_) => ScalarKind::U64,
            Scalar::I64(_) => ScalarKind::I64,
            Scalar::F32(_) => ScalarKind::F32,
            Scalar::F64(_) => ScalarKind::F64,
        }
    }

    /// Numeric value as `f64`; `None` for `Bool`.
    pub fn to_f64(&self) -> Option<f64> {
        match *self {
            Scalar::Bool(_) => None,
            Scalar::U8(v) => Some(v as f64),
            Scalar::I8(v) => Some(v as f64),
            Scalar::U16(v) => Some(v as f64),
            Scalar::I16(v) => Some(v as f64),
            Scalar::U32(v) => Some(v as f64),
            Scalar::I32(v) => Some(v as f64),
            Scalar::U64(v) => Some(v as f64),
            Scalar::I64(v) => Some(v as f64),
            Scalar::F32(v) => Some(v as f64),
            Scalar::F64(v) => Some(v),
        }
    }
}

/// Closed tagged union over every supported value representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Scalar(Scalar),
    /// Three same-kind channels. Constructors keep the channel kinds uniform.
    Pixel3([Scalar; 3]),
    /// Four same-kind channels.
    Pixel4([Scalar; 4]),
    /// Real and imaginary parts, same kind.
    Complex([Scalar; 2]),
    Coordinate(Coordinate),
    Vector(Vec<Variant>),
    Map(BTreeMap<String, Variant>),
    Str(String),
}

impl Variant {
    /// Descriptor of the stored representation.
    pub fn descriptor(&self) -> TypeDescriptor {
        match self {
            Variant::Scalar(s) => TypeDescriptor::scalar(s.kind()),
            Variant::Pixel3(ch) => TypeDescriptor::new(CompoundKind::Pixel3, ch[0].kind()),
            Variant::Pixel4(ch) => TypeDescriptor::new(CompoundKind::Pixel4, ch[0].kind()),
            Variant::Complex(ch) => TypeDescriptor::new(CompoundKind::Complex, ch[0].kind()),
            Variant::Coordinate(_) => TypeDescriptor::new(CompoundKind::Coordinate, ScalarKind::I64),
            Variant::Vector(items) => {
                let scalar = homogeneous_kind(items).unwrap_or(ScalarKind::Object);
                TypeDescriptor::new(CompoundKind::Vector, scalar)
            }
            Variant::Map(_) => TypeDescriptor::new(CompoundKind::Map, ScalarKind::Object),
            Variant::Str(_) => TypeDescriptor::scalar(ScalarKind::Str),
        }
    }

    /// Whether the stored tag is compatible with `T`.
    pub fn holds<T: VariantValue>(&self) -> bool {
        T::from_variant(self).is_ok()
    }

    /// Extract the stored value as `T`, failing with `BadCast` when the tag
    /// does not match.
    pub fn get<T: VariantValue>(&self) -> Result<T> {
        T::from_variant(self)
    }

    /// Convert a numeric scalar arm to any numeric pixel type.
    ///
    /// Unlike [`Variant::get`] this coerces across numeric kinds, so erased
    /// entry points taking a height or level parameter accept e.g. a `u32`
    /// variant against a `u8` image. Fails with `BadCast` for non-numeric
    /// arms and with `Overflow` when the value does not fit `T`.
    pub fn as_number<T: VariantValue + NumCast>(&self) -> Result<T> {
        match self {
            Variant::Scalar(s) => {
                let value = s.to_f64().ok_or(Error::BadCast {
                    expected: T::descriptor(),
                    found: self.descriptor(),
                })?;
                NumCast::from(value).ok_or(Error::Overflow("numeric parameter"))
            }
            other => Err(Error::BadCast {
                expected: T::descriptor(),
                found: other.descriptor(),
            }),
        }
    }
}

fn homogeneous_kind(items: &[Variant]) -> Option<ScalarKind> {
    let mut kinds = items.iter().map(|v| v.descriptor().scalar);
    let first = kinds.next()?;
    kinds.all(|k| k == first).then_some(first)
}

/// Per-type description and conversion to/from [`Variant`].
///
/// `describe` below and every typed pixel accessor on the erased image
/// handle resolve through this trait.
pub trait VariantValue: Sized {
    /// Constant descriptor of the concrete type.
    fn descriptor() -> TypeDescriptor;

    fn into_variant(self) -> Variant;

    fn from_variant(variant: &Variant) -> Result<Self>;
}

/// Constant descriptor of a value's concrete type.
pub fn describe<T: VariantValue>(_value: &T) -> TypeDescriptor {
    T::descriptor()
}

/// Scalar types usable as a pixel channel.
pub trait ScalarComponent: Copy {
    fn kind() -> ScalarKind;
    fn to_scalar(self) -> Scalar;
    fn from_scalar(scalar: &Scalar) -> Option<Self>;
}

macro_rules! impl_scalar_variant {
    ($t:ty, $arm:ident, $kind:ident) => {
        impl ScalarComponent for $t {
            fn kind() -> ScalarKind {
                ScalarKind::$kind
            }

            fn to_scalar(self) -> Scalar {
                Scalar::$arm(self)
            }

            fn from_scalar(scalar: &Scalar) -> Option<Self> {
                match scalar {
                    Scalar::$arm(v) => Some(*v),
                    _ => None,
                }
            }
        }

        impl VariantValue for $t {
            fn descriptor() -> TypeDescriptor {
                TypeDescriptor::scalar(ScalarKind::$kind)
            }

            fn into_variant(self) -> Variant {
                Variant::Scalar(Scalar::$arm(self))
            }

            fn from_variant(variant: &Variant) -> Result<Self> {
                match variant {
                    Variant::Scalar(Scalar::$arm(v)) => Ok(*v),
                    other => Err(Error::BadCast {
                        expected: Self::descriptor(),
                        found: other.descriptor(),
                    }),
                }
            }
        }

        impl From<$t> for Variant {
            fn from(value: $t) -> Variant {
                value.into_variant()
            }
        }
    };
}

impl_scalar_variant!(bool, Bool, Bool);
impl_scalar_variant!(u8, U8, U8);
impl_scalar_variant!(i8, I8, I8);
impl_scalar_variant!(u16, U16, U16);
impl_scalar_variant!(i16, I16, I16);
impl_scalar_variant!(u32, U32, U32);
impl_scalar_variant!(i32, I32, I32);
impl_scalar_variant!(u64, U64, U64);
impl_scalar_variant!(i64, I64, I64);
impl_scalar_variant!(f32, F32, F32);
impl_scalar_variant!(f64, F64, F64);

impl VariantValue for String {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::scalar(ScalarKind::Str)
    }

    fn into_variant(self) -> Variant {
        Variant::Str(self)
    }

    fn from_variant(variant: &Variant) -> Result<Self> {
        match variant {
            Variant::Str(s) => Ok(s.clone()),
            other => Err(Error::BadCast {
                expected: Self::descriptor(),
                found: other.descriptor(),
            }),
        }
    }
}

impl VariantValue for Coordinate {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::new(CompoundKind::Coordinate, ScalarKind::I64)
    }

    fn into_variant(self) -> Variant {
        Variant::Coordinate(self)
    }

    fn from_variant(variant: &Variant) -> Result<Self> {
        match variant {
            Variant::Coordinate(c) => Ok(c.clone()),
            other => Err(Error::BadCast {
                expected: Self::descriptor(),
                found: other.descriptor(),
            }),
        }
    }
}

impl<T: VariantValue> VariantValue for Vec<T> {
    fn descriptor() -> TypeDescriptor {
        let element = T::descriptor();
        let scalar = match element.compound {
            CompoundKind::Scalar => element.scalar,
            _ => ScalarKind::Object,
        };
        TypeDescriptor::new(CompoundKind::Vector, scalar)
    }

    fn into_variant(self) -> Variant {
        Variant::Vector(self.into_iter().map(T::into_variant).collect())
    }

    fn from_variant(variant: &Variant) -> Result<Self> {
        match variant {
            Variant::Vector(items) => items.iter().map(T::from_variant).collect(),
            other => Err(Error::BadCast {
                expected: Self::descriptor(),
                found: other.descriptor(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_round_trip() {
        let v = 42u8.into_variant();
        assert!(v.holds::<u8>());
        assert!(!v.holds::<u16>());
        assert_eq!(v.get::<u8>().unwrap(), 42);
        assert_eq!(v.descriptor(), TypeDescriptor::scalar(ScalarKind::U8));
    }

    #[test]
    fn test_bad_cast_reports_both_types() {
        let v = 1.5f32.into_variant();
        let err = v.get::<i32>().unwrap_err();
        assert_eq!(
            err,
            Error::BadCast {
                expected: TypeDescriptor::scalar(ScalarKind::I32),
                found: TypeDescriptor::scalar(ScalarKind::F32),
            }
        );
    }

    #[test]
    fn test_as_number_coerces() {
        let v = 7u32.into_variant();
        assert_eq!(v.as_number::<u8>().unwrap(), 7u8);
        assert_eq!(v.as_number::<f64>().unwrap(), 7.0);

        // Out of range for the target type.
        let big = 300u32.into_variant();
        assert_eq!(big.as_number::<u8>().unwrap_err(), Error::Overflow("numeric parameter"));

        // Non-numeric arms refuse.
        let s = String::from("x").into_variant();
        assert!(matches!(s.as_number::<u8>(), Err(Error::BadCast { .. })));
    }

    #[test]
    fn test_container_descriptor() {
        let v = vec![1u8, 2, 3].into_variant();
        assert_eq!(
            v.descriptor(),
            TypeDescriptor::new(CompoundKind::Vector, ScalarKind::U8)
        );
        assert_eq!(v.get::<Vec<u8>>().unwrap(), vec![1, 2, 3]);

        let mixed = Variant::Vector(vec![1u8.into_variant(), 2.0f32.into_variant()]);
        assert_eq!(mixed.descriptor().scalar, ScalarKind::Object);
    }

    #[test]
    fn test_describe_is_per_type() {
        assert_eq!(describe(&1u16), TypeDescriptor::scalar(ScalarKind::U16));
        assert_eq!(
            describe(&Coordinate::xy(1, 2)),
            TypeDescriptor::new(CompoundKind::Coordinate, ScalarKind::I64)
        );
    }
}
