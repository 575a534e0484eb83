//! Morphology walkthrough on a synthetic image
//!
//! Builds a small grayscale scene, runs the main operators through the
//! type-erased entry points and prints the results as ASCII grids.
//!
//! Run with: `cargo run --example morphology_demo`

use std::fmt::Display;

use gridmorph_algorithms::distance::quasi_distance;
use gridmorph_algorithms::labelling::label_with_adjacency;
use gridmorph_algorithms::morphology::{erode, gradient, opening_by_reconstruction};
use gridmorph_core::image::{Coordinate, Image, PixelValue};
use gridmorph_core::se::cross;
use gridmorph_core::Result;

fn print_grid<T: PixelValue + Display>(title: &str, image: &Image<T>) {
    println!("{title}:");
    let size = image.size();
    for y in 0..size[1] {
        for x in 0..size[0] {
            match image.get(&Coordinate::xy(x, y)) {
                Ok(v) => print!("{v:4}"),
                Err(_) => print!("   ?"),
            }
        }
        println!();
    }
    println!();
}

fn scene() -> Image<u8> {
    // Two bright blobs of different size on a dark background.
    let mut image = Image::filled(&Coordinate::xy(12, 8), 0u8).unwrap();
    for y in 1..5 {
        for x in 1..5 {
            image.set(&Coordinate::xy(x, y), 80).unwrap();
        }
    }
    image.set(&Coordinate::xy(2, 2), 120).unwrap();
    for y in 3..7 {
        for x in 7..11 {
            image.set(&Coordinate::xy(x, y), 50).unwrap();
        }
    }
    image
}

fn main() -> Result<()> {
    let input = scene();
    let se = cross(1);
    print_grid("input", &input);

    let mut eroded: Image<u8> = Image::new(2);
    erode(&input, &se, &mut eroded)?;
    print_grid("erosion", &eroded);

    let mut edges: Image<u8> = Image::new(2);
    gradient(&input, &se, &mut edges)?;
    print_grid("gradient", &edges);

    // Reconstruct only the blob marked at one summit.
    let mut marker = input.same_geometry::<u8>()?;
    marker.set(&Coordinate::xy(2, 2), 100)?;
    let mut rebuilt: Image<u8> = Image::new(2);
    opening_by_reconstruction(&marker, &input, &se, &mut rebuilt)?;
    print_grid("opening by reconstruction", &rebuilt);

    let mut labels: Image<u16> = Image::new(2);
    let (zones, graph) = label_with_adjacency(&input, &se, &mut labels)?;
    print_grid("flat zones", &labels);
    println!("{zones} zones, {} adjacency edges", graph.edge_count());
    for (a, b) in graph.edges() {
        println!("  zone {a} touches zone {b}");
    }
    println!();

    let mut distance: Image<u32> = Image::new(2);
    let mut residual: Image<u8> = Image::new(2);
    quasi_distance(&input, &se, &mut distance, &mut residual)?;
    print_grid("quasi-distance levels", &distance);
    print_grid("quasi-distance residual", &residual);

    Ok(())
}
