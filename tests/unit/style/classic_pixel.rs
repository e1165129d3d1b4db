use std::collections::HashSet;

use super::*;
use crate::foundation::frame::Channels;

fn rainbow(w: u32, h: u32) -> Frame {
    let mut data = Vec::with_capacity((w * h * 3) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[
                (x * 9 % 256) as u8,
                (y * 11 % 256) as u8,
                ((x * y) % 256) as u8,
            ]);
        }
    }
    Frame::new(w, h, Channels::Rgb, data).unwrap()
}

#[test]
fn reduced_image_has_at_most_sixteen_colors() {
    let small = reduce(&rainbow(90, 60), &StyleSpec::classic_pixel()).unwrap();
    assert_eq!(small.dimensions(), (30, 20));
    let colors: HashSet<&[u8]> = small.data().chunks_exact(3).collect();
    assert!(colors.len() <= 16, "{} colors", colors.len());
    assert!(colors.len() > 1);
}

#[test]
fn upsampled_output_reuses_reduced_colors() {
    let src = rainbow(60, 45);
    let spec = StyleSpec::classic_pixel();
    let small = reduce(&src, &spec).unwrap();
    let out = apply(&src, &spec).unwrap();
    assert_eq!(out.dimensions(), (60, 45));

    let small_colors: HashSet<&[u8]> = small.data().chunks_exact(3).collect();
    let out_colors: HashSet<&[u8]> = out.data().chunks_exact(3).collect();
    assert!(out_colors.is_subset(&small_colors));
}

#[test]
fn flat_gray_stays_uniform() {
    let src = Frame::from_pixel(100, 100, &[128, 128, 128]).unwrap();
    let spec = StyleSpec {
        pixel_size: 5,
        ..StyleSpec::classic_pixel()
    };
    let out = apply(&src, &spec).unwrap();
    assert_eq!(out.dimensions(), (100, 100));
    let first = out.pixel(0, 0).to_vec();
    assert!(out.data().chunks_exact(3).all(|px| px == first.as_slice()));
}
