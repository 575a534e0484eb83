//! Typed image storage and the type-erased image handle
//!
//! [`Image<T>`] owns a dense buffer of pixels in the linear order defined by
//! [`super::coords`], together with a size vector fixing one extent per
//! dimension. [`DynImage`] is the opaque handle the dispatch layer works
//! with: it exposes only geometry and type introspection plus variant-typed
//! pixel access, and concrete typed images are recovered from it by safe
//! downcast.

use std::any::Any;

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::image::coords::{
    from_coordinate_to_offset, from_offset_to_coordinate, pixel_count, Coordinate,
};
use crate::image::element::PixelValue;
use crate::types::{CompoundKind, ScalarKind, TypeDescriptor};
use crate::variant::Variant;

/// A dense N-dimensional image with a fixed pixel type.
///
/// An image is created unallocated (all-zero size) for a fixed
/// dimensionality and acquires storage through [`Image::allocate`]. The
/// buffer length always equals the product of the extents.
///
/// # Example
///
/// ```
/// use gridmorph_core::image::{Coordinate, Image};
///
/// let mut im: Image<u8> = Image::new(2);
/// im.allocate(&Coordinate::xy(4, 3))?;
/// im.set(&Coordinate::xy(1, 2), 42)?;
/// assert_eq!(im.get(&Coordinate::xy(1, 2))?, 42);
/// # Ok::<(), gridmorph_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T: PixelValue> {
    size: Coordinate,
    data: Vec<T>,
}

impl<T: PixelValue> Image<T> {
    /// Create an unallocated image of the given dimensionality.
    pub fn new(dimension: usize) -> Self {
        Self {
            size: Coordinate::zeros(dimension),
            data: Vec::new(),
        }
    }

    /// Create and allocate in one step, zero-filled.
    pub fn alloc(size: &Coordinate) -> Result<Self> {
        let mut image = Self::new(size.dimension());
        image.allocate(size)?;
        Ok(image)
    }

    /// Create and allocate, filled with `value`.
    pub fn filled(size: &Coordinate, value: T) -> Result<Self> {
        let mut image = Self::alloc(size)?;
        image.fill(value);
        Ok(image)
    }

    /// Create an image from an existing buffer in linear order.
    pub fn from_vec(size: &Coordinate, data: Vec<T>) -> Result<Self> {
        let total = pixel_count(size)
            .ok_or_else(|| Error::BadParameters(format!("invalid size vector {}", size)))?;
        if data.len() != total {
            return Err(Error::BadParameters(format!(
                "buffer of {} pixels does not match size {} ({} pixels)",
                data.len(),
                size,
                total
            )));
        }
        Ok(Self {
            size: size.clone(),
            data,
        })
    }

    /// Allocate backing storage, zero-filled.
    ///
    /// Fails with `AlreadyAllocated` on a second call, `DimensionMismatch`
    /// when the rank differs from the image's, `BadParameters` for
    /// non-positive extents and `Overflow` when the pixel count exceeds the
    /// addressable offset range.
    pub fn allocate(&mut self, size: &Coordinate) -> Result<()> {
        if self.is_allocated() {
            return Err(Error::AlreadyAllocated);
        }
        if size.dimension() != self.size.dimension() {
            return Err(Error::DimensionMismatch {
                expected: self.size.dimension(),
                actual: size.dimension(),
            });
        }
        if size.as_slice().iter().any(|&extent| extent <= 0) {
            return Err(Error::BadParameters(format!(
                "every extent must be positive, got {}",
                size
            )));
        }
        let total = pixel_count(size).ok_or(Error::Overflow("pixel count"))?;
        self.data = vec![T::default(); total];
        self.size = size.clone();
        Ok(())
    }

    /// Per-dimension extent. All-zero denotes "unallocated".
    pub fn size(&self) -> &Coordinate {
        &self.size
    }

    pub fn dimension(&self) -> usize {
        self.size.dimension()
    }

    pub fn is_allocated(&self) -> bool {
        !self.data.is_empty()
    }

    /// Total number of pixels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixel at a linear offset. Panics on an out-of-range offset, which is
    /// a programmer error; use [`Image::get`] for checked access.
    #[inline]
    pub fn pixel(&self, offset: usize) -> T {
        self.data[offset]
    }

    /// Mutable pixel reference at a linear offset.
    #[inline]
    pub fn pixel_mut(&mut self, offset: usize) -> &mut T {
        &mut self.data[offset]
    }

    /// Pixel at a linear offset without bounds checking.
    ///
    /// # Safety
    /// Caller must ensure `offset < self.len()`
    #[inline]
    pub unsafe fn pixel_unchecked(&self, offset: usize) -> T {
        unsafe { *self.data.get_unchecked(offset) }
    }

    /// Checked pixel read at a coordinate
    pub fn get(&self, coordinate: &Coordinate) -> Result<T> {
        if !self.is_allocated() {
            return Err(Error::NotAllocated);
        }
        let offset = from_coordinate_to_offset(&self.size, coordinate)?;
        Ok(self.data[offset])
    }

    /// Checked pixel write at a coordinate
    pub fn set(&mut self, coordinate: &Coordinate, value: T) -> Result<()> {
        if !self.is_allocated() {
            return Err(Error::NotAllocated);
        }
        let offset = from_coordinate_to_offset(&self.size, coordinate)?;
        self.data[offset] = value;
        Ok(())
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Linear offset of a coordinate in this image.
    pub fn offset_of(&self, coordinate: &Coordinate) -> Result<usize> {
        from_coordinate_to_offset(&self.size, coordinate)
    }

    /// Coordinate of a linear offset in this image.
    pub fn coordinate_of(&self, offset: usize) -> Result<Coordinate> {
        from_offset_to_coordinate(&self.size, offset)
    }

    /// Allocated image of the same geometry with a (possibly different)
    /// pixel type, zero-filled.
    pub fn same_geometry<U: PixelValue>(&self) -> Result<Image<U>> {
        if !self.is_allocated() {
            return Err(Error::NotAllocated);
        }
        Image::alloc(&self.size)
    }

    /// Build a 2-D image from an `ndarray` array.
    ///
    /// The extent order is reversed: array shape `(rows, cols)` becomes
    /// image size `(cols, rows)`, so the linear buffer order is preserved
    /// and round trips are exact. This is the dimension-order reversal that
    /// array-library interop requires.
    pub fn from_array2(array: Array2<T>) -> Self {
        let (rows, cols) = array.dim();
        Self {
            size: Coordinate::xy(cols as isize, rows as isize),
            data: array.iter().copied().collect(),
        }
    }

    /// View this 2-D image as an `ndarray` array, shape `(rows, cols)`.
    pub fn to_array2(&self) -> Result<Array2<T>> {
        if self.dimension() != 2 {
            return Err(Error::DimensionMismatch {
                expected: 2,
                actual: self.dimension(),
            });
        }
        if !self.is_allocated() {
            return Err(Error::NotAllocated);
        }
        let (cols, rows) = (self.size[0] as usize, self.size[1] as usize);
        Array2::from_shape_vec((rows, cols), self.data.clone())
            .map_err(|e| Error::BadParameters(e.to_string()))
    }
}

/// Opaque, type-erased image handle.
///
/// Exposes only geometric and type-introspection operations; pixel access
/// goes through [`Variant`] values. Dimensionality is implicit in the size
/// vector and exposed via [`DynImage::dimension`]. Typed algorithm
/// implementations recover the concrete [`Image<T>`] with
/// [`downcast_image`] / [`downcast_image_mut`].
pub trait DynImage: Any {
    /// Runtime descriptor of the pixel type
    fn dynamic_type(&self) -> TypeDescriptor;

    fn dimension(&self) -> usize;

    fn size(&self) -> &Coordinate;

    fn is_allocated(&self) -> bool;

    /// Allocate backing storage; see [`Image::allocate`] for the failure
    /// modes.
    fn allocate(&mut self, size: &Coordinate) -> Result<()>;

    /// Checked variant-typed pixel read at a linear offset
    fn pixel_variant(&self, offset: usize) -> Result<Variant>;

    /// Checked variant-typed pixel write at a linear offset
    fn set_pixel_variant(&mut self, offset: usize, value: &Variant) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: PixelValue> DynImage for Image<T> {
    fn dynamic_type(&self) -> TypeDescriptor {
        T::descriptor()
    }

    fn dimension(&self) -> usize {
        Image::dimension(self)
    }

    fn size(&self) -> &Coordinate {
        Image::size(self)
    }

    fn is_allocated(&self) -> bool {
        Image::is_allocated(self)
    }

    fn allocate(&mut self, size: &Coordinate) -> Result<()> {
        Image::allocate(self, size)
    }

    fn pixel_variant(&self, offset: usize) -> Result<Variant> {
        if offset >= self.len() {
            return Err(Error::BadParameters(format!(
                "offset {} out of range for {} pixels",
                offset,
                self.len()
            )));
        }
        Ok(self.data[offset].into_variant())
    }

    fn set_pixel_variant(&mut self, offset: usize, value: &Variant) -> Result<()> {
        if offset >= self.len() {
            return Err(Error::BadParameters(format!(
                "offset {} out of range for {} pixels",
                offset,
                self.len()
            )));
        }
        self.data[offset] = value.get::<T>()?;
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Safe downcast of an erased handle to a concrete typed image.
///
/// `None` is the dispatcher's ordinary "try the next candidate" signal, not
/// an error.
pub fn downcast_image<T: PixelValue>(image: &dyn DynImage) -> Option<&Image<T>> {
    image.as_any().downcast_ref::<Image<T>>()
}

/// Mutable counterpart of [`downcast_image`].
pub fn downcast_image_mut<T: PixelValue>(image: &mut dyn DynImage) -> Option<&mut Image<T>> {
    image.as_any_mut().downcast_mut::<Image<T>>()
}

/// Create an unallocated erased image for a supported descriptor.
///
/// Covers the scalar matrix the algorithm layer is instantiated for;
/// anything else is `NotImplemented`.
pub fn create_image(descriptor: TypeDescriptor, dimension: usize) -> Result<Box<dyn DynImage>> {
    if descriptor.compound != CompoundKind::Scalar {
        return Err(Error::NotImplemented);
    }
    let image: Box<dyn DynImage> = match descriptor.scalar {
        ScalarKind::Bool => Box::new(Image::<bool>::new(dimension)),
        ScalarKind::U8 => Box::new(Image::<u8>::new(dimension)),
        ScalarKind::I8 => Box::new(Image::<i8>::new(dimension)),
        ScalarKind::U16 => Box::new(Image::<u16>::new(dimension)),
        ScalarKind::I16 => Box::new(Image::<i16>::new(dimension)),
        ScalarKind::U32 => Box::new(Image::<u32>::new(dimension)),
        ScalarKind::I32 => Box::new(Image::<i32>::new(dimension)),
        ScalarKind::U64 => Box::new(Image::<u64>::new(dimension)),
        ScalarKind::I64 => Box::new(Image::<i64>::new(dimension)),
        ScalarKind::F32 => Box::new(Image::<f32>::new(dimension)),
        ScalarKind::F64 => Box::new(Image::<f64>::new(dimension)),
        ScalarKind::Object | ScalarKind::Str => return Err(Error::NotImplemented),
    };
    Ok(image)
}

/// Give `target` the same geometry as `reference`.
///
/// Allocates an unallocated target; an allocated target must already match,
/// otherwise `BadSize`. Every composite entry point calls this before
/// dispatching, so inner steps can rely on identical linear offsets across
/// cooperating images.
pub fn set_same(reference: &dyn DynImage, target: &mut dyn DynImage) -> Result<()> {
    if !reference.is_allocated() {
        return Err(Error::NotAllocated);
    }
    if reference.dimension() != target.dimension() {
        return Err(Error::DimensionMismatch {
            expected: reference.dimension(),
            actual: target.dimension(),
        });
    }
    if !target.is_allocated() {
        target.allocate(reference.size())
    } else if target.size() != reference.size() {
        Err(Error::BadSize {
            expected: reference.size().clone(),
            actual: target.size().clone(),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_allocation_lifecycle() {
        let mut im: Image<u8> = Image::new(2);
        assert!(!im.is_allocated());
        assert!(im.size().is_zero());

        im.allocate(&Coordinate::xy(4, 3)).unwrap();
        assert!(im.is_allocated());
        assert_eq!(im.len(), 12);

        assert_eq!(
            im.allocate(&Coordinate::xy(4, 3)),
            Err(Error::AlreadyAllocated)
        );
    }

    #[test]
    fn test_allocate_rejects_bad_sizes() {
        let mut im: Image<u8> = Image::new(2);
        assert!(matches!(
            im.allocate(&Coordinate::xy(0, 3)),
            Err(Error::BadParameters(_))
        ));
        assert!(matches!(
            im.allocate(&Coordinate::xyz(2, 2, 2)),
            Err(Error::DimensionMismatch { .. })
        ));
        assert_eq!(
            im.allocate(&Coordinate::xy(isize::MAX, isize::MAX)),
            Err(Error::Overflow("pixel count"))
        );
    }

    #[test]
    fn test_get_set() {
        let mut im: Image<i32> = Image::alloc(&Coordinate::xy(5, 5)).unwrap();
        im.set(&Coordinate::xy(2, 3), -7).unwrap();
        assert_eq!(im.get(&Coordinate::xy(2, 3)).unwrap(), -7);
        assert_eq!(im.pixel(im.offset_of(&Coordinate::xy(2, 3)).unwrap()), -7);
        assert!(matches!(
            im.get(&Coordinate::xy(5, 0)),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_dyn_image_introspection() {
        let im: Image<f32> = Image::alloc(&Coordinate::xy(2, 2)).unwrap();
        let handle: &dyn DynImage = &im;
        assert_eq!(handle.dynamic_type(), TypeDescriptor::scalar(ScalarKind::F32));
        assert_eq!(handle.dimension(), 2);
        assert!(downcast_image::<f32>(handle).is_some());
        assert!(downcast_image::<u8>(handle).is_none());
    }

    #[test]
    fn test_variant_pixel_access() {
        let mut im: Image<u8> = Image::alloc(&Coordinate::xy(2, 2)).unwrap();
        let handle: &mut dyn DynImage = &mut im;
        handle.set_pixel_variant(3, &7u8.into()).unwrap();
        assert_eq!(handle.pixel_variant(3).unwrap(), 7u8.into());
        // Wrong variant type is a BadCast, not a coercion.
        assert!(matches!(
            handle.set_pixel_variant(0, &7u16.into()),
            Err(Error::BadCast { .. })
        ));
    }

    #[test]
    fn test_create_image_factory() {
        let mut boxed = create_image(TypeDescriptor::scalar(ScalarKind::U16), 3).unwrap();
        assert_eq!(boxed.dimension(), 3);
        boxed.allocate(&Coordinate::xyz(2, 2, 2)).unwrap();
        assert!(downcast_image::<u16>(boxed.as_ref()).is_some());

        assert!(matches!(
            create_image(TypeDescriptor::scalar(ScalarKind::Str), 2),
            Err(Error::NotImplemented)
        ));
    }

    #[test]
    fn test_set_same() {
        let reference: Image<u8> = Image::alloc(&Coordinate::xy(3, 4)).unwrap();
        let mut target: Image<u8> = Image::new(2);
        set_same(&reference, &mut target).unwrap();
        assert_eq!(target.size(), &Coordinate::xy(3, 4));

        let mut wrong: Image<u8> = Image::alloc(&Coordinate::xy(4, 4)).unwrap();
        assert!(matches!(
            set_same(&reference, &mut wrong),
            Err(Error::BadSize { .. })
        ));
    }

    #[test]
    fn test_array2_round_trip_reverses_extents() {
        let array = array![[1u8, 2, 3], [4, 5, 6]]; // 2 rows, 3 cols
        let im = Image::from_array2(array.clone());
        assert_eq!(im.size(), &Coordinate::xy(3, 2));
        // Buffer order is preserved: (x, y) = (2, 1) is row 1, col 2.
        assert_eq!(im.get(&Coordinate::xy(2, 1)).unwrap(), 6);
        assert_eq!(im.to_array2().unwrap(), array);
    }
}
