//! Image storage, pixel element traits and neighborhood views

pub mod coords;
mod element;
mod grid;
mod neighborhood;

pub use coords::{
    from_coordinate_to_offset, from_offset_to_coordinate, pixel_count, Coordinate,
};
pub use element::{Pixel3, Pixel4, PixelValue, ScalarPixel};
pub use grid::{
    create_image, downcast_image, downcast_image_mut, set_same, DynImage, Image,
};
pub use neighborhood::{Neighbor, Neighborhood, Neighbors};
