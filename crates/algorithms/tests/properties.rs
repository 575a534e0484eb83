//! End-to-end properties of the operator suite, exercised through both the
//! typed and the type-erased layers.

use gridmorph_algorithms::distance::quasi_distance_into;
use gridmorph_algorithms::labelling::{label_into, label_plateaus_into};
use gridmorph_algorithms::morphology::{
    dilate_into, erode, erode_into, opening_by_reconstruction_into,
};
use gridmorph_core::image::{Coordinate, Image};
use gridmorph_core::se::{cross, StructuringElement};
use gridmorph_core::Error;

fn textured_image(width: isize, height: isize) -> Image<u8> {
    let mut data = Vec::new();
    for y in 0..height {
        for x in 0..width {
            data.push(((x * 7 + y * 13) % 23) as u8);
        }
    }
    Image::from_vec(&Coordinate::xy(width, height), data).unwrap()
}

fn complement(image: &Image<bool>) -> Image<bool> {
    let data = image.as_slice().iter().map(|&v| !v).collect();
    Image::from_vec(image.size(), data).unwrap()
}

#[test]
fn erosion_dilation_duality_under_complement() {
    // Asymmetric element, so the transposition in the duality matters.
    let se = StructuringElement::from_offsets(
        2,
        vec![
            Coordinate::xy(0, 0),
            Coordinate::xy(1, 0),
            Coordinate::xy(0, 1),
            Coordinate::xy(2, 1),
        ],
    )
    .unwrap();

    let mut data = Vec::new();
    for i in 0..81usize {
        data.push(i % 3 == 0 || i % 7 == 2);
    }
    let image = Image::from_vec(&Coordinate::xy(9, 9), data).unwrap();

    let mut dilated = image.same_geometry::<bool>().unwrap();
    dilate_into(&image, &se, &mut dilated).unwrap();

    let mut eroded = image.same_geometry::<bool>().unwrap();
    erode_into(&complement(&image), &se.transpose(), &mut eroded).unwrap();

    assert_eq!(dilated, complement(&eroded));
}

#[test]
fn reconstruction_is_idempotent_and_mask_bounded() {
    let mask = textured_image(11, 9);
    let mut marker = mask.same_geometry::<u8>().unwrap();
    // Sparse marker spikes, clipped under the mask by the algorithm.
    marker.set(&Coordinate::xy(2, 3), 20).unwrap();
    marker.set(&Coordinate::xy(8, 5), 11).unwrap();
    marker.set(&Coordinate::xy(5, 1), 4).unwrap();

    let mut once = mask.same_geometry::<u8>().unwrap();
    opening_by_reconstruction_into(&marker, &mask, &cross(1), &mut once).unwrap();

    for offset in 0..mask.len() {
        assert!(once.pixel(offset) <= mask.pixel(offset), "exceeds mask at {}", offset);
    }

    let mut twice = mask.same_geometry::<u8>().unwrap();
    opening_by_reconstruction_into(&once, &mask, &cross(1), &mut twice).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn labelling_partitions_foreground() {
    // Blobby image: foreground where the texture crosses a threshold.
    let base = textured_image(13, 11);
    let data = base.as_slice().iter().map(|&v| u8::from(v > 11)).collect();
    let image = Image::from_vec(base.size(), data).unwrap();

    let mut labels: Image<u32> = image.same_geometry().unwrap();
    let count = label_into(&image, &cross(1), &mut labels).unwrap();
    assert!(count > 0);

    // Every foreground pixel is labelled, background is not.
    for offset in 0..image.len() {
        if image.pixel(offset) != 0 {
            assert_ne!(labels.pixel(offset), 0, "unlabelled foreground at {}", offset);
            assert!(labels.pixel(offset) as usize <= count);
        } else {
            assert_eq!(labels.pixel(offset), 0, "labelled background at {}", offset);
        }
    }

    // Accepted neighbor steps never cross a label boundary.
    let size = image.size();
    let (width, height) = (size[0], size[1]);
    for y in 0..height {
        for x in 0..width {
            let here = labels.get(&Coordinate::xy(x, y)).unwrap();
            if here == 0 {
                continue;
            }
            for (dx, dy) in [(1, 0), (0, 1)] {
                let (nx, ny) = (x + dx, y + dy);
                if nx >= width || ny >= height {
                    continue;
                }
                let there = labels.get(&Coordinate::xy(nx, ny)).unwrap();
                if there != 0 {
                    assert_eq!(here, there, "labels split a connected pair at ({}, {})", x, y);
                }
            }
        }
    }
}

#[test]
fn plateau_labels_are_a_partition_of_all_pixels() {
    let image = textured_image(8, 8);
    let mut labels: Image<u32> = image.same_geometry().unwrap();
    let count = label_plateaus_into(&image, &cross(1), &mut labels).unwrap();

    for offset in 0..image.len() {
        let label = labels.pixel(offset);
        assert!(label >= 1 && label as usize <= count);
    }
}

#[test]
fn quasi_distance_bfs_levels() {
    // 5x5 foreground block in a 7x7 image: ring at 1, center at 3.
    let mut image: Image<u8> = Image::alloc(&Coordinate::xy(7, 7)).unwrap();
    for y in 1..6 {
        for x in 1..6 {
            image.set(&Coordinate::xy(x, y), 255).unwrap();
        }
    }

    let mut distance: Image<u32> = image.same_geometry().unwrap();
    let mut residual = image.same_geometry::<u8>().unwrap();
    quasi_distance_into(&image, &cross(1), &mut distance, &mut residual).unwrap();

    let expected_level = |x: isize, y: isize| -> u32 {
        if !(1..6).contains(&x) || !(1..6).contains(&y) {
            return 0;
        }
        let to_edge = (x - 1).min(5 - x).min(y - 1).min(5 - y);
        (to_edge + 1) as u32
    };
    for y in 0..7 {
        for x in 0..7 {
            assert_eq!(
                distance.get(&Coordinate::xy(x, y)).unwrap(),
                expected_level(x, y),
                "wrong level at ({}, {})",
                x,
                y
            );
        }
    }
    assert_eq!(distance.get(&Coordinate::xy(3, 3)).unwrap(), 3);
}

#[test]
fn erased_entry_points_reject_unsupported_types() {
    let input: Image<i64> = Image::alloc(&Coordinate::xy(4, 4)).unwrap();
    let mut output: Image<i64> = Image::new(2);
    assert_eq!(
        erode(&input, &StructuringElement::default(), &mut output),
        Err(Error::NotImplemented)
    );
}

#[test]
fn erased_entry_points_enforce_geometry() {
    let input: Image<u8> = Image::alloc(&Coordinate::xy(4, 4)).unwrap();
    let mut output: Image<u8> = Image::alloc(&Coordinate::xy(5, 4)).unwrap();
    assert!(matches!(
        erode(&input, &StructuringElement::default(), &mut output),
        Err(Error::BadSize { .. })
    ));
}
