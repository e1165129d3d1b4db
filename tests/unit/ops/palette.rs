use std::collections::HashSet;

use super::*;
use crate::foundation::frame::Channels;

fn noisy_frame(w: u32, h: u32) -> Frame {
    let mut data = Vec::with_capacity((w * h * 3) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[
                (x * 7 + y * 3) as u8,
                (x * 13 ^ y * 5) as u8,
                (x * y) as u8,
            ]);
        }
    }
    Frame::new(w, h, Channels::Rgb, data).unwrap()
}

fn distinct(frame: &Frame) -> usize {
    let c = frame.channels().count();
    frame
        .data()
        .chunks_exact(c)
        .map(|px| [px[0], px[1], px[2]])
        .collect::<HashSet<_>>()
        .len()
}

#[test]
fn palette_has_requested_size_for_rich_images() {
    let frame = noisy_frame(32, 32);
    assert!(distinct(&frame) > 16);
    let palette = median_cut_palette(&frame, 16).unwrap();
    assert_eq!(palette.len(), 16);
}

#[test]
fn quantized_frame_uses_at_most_palette_colors() {
    let frame = noisy_frame(40, 24);
    let out = quantize(&frame, 16).unwrap();
    assert_eq!(out.dimensions(), frame.dimensions());
    assert!(distinct(&out) <= 16);
}

#[test]
fn flat_image_collapses_to_one_color() {
    let frame = Frame::from_pixel(10, 10, &[128, 128, 128]).unwrap();
    let palette = median_cut_palette(&frame, 16).unwrap();
    assert_eq!(palette, vec![[128, 128, 128]]);
    assert_eq!(quantize(&frame, 16).unwrap(), frame);
}

#[test]
fn two_color_image_keeps_both_colors() {
    let mut data = vec![0u8; 4 * 3];
    data[6..].copy_from_slice(&[255, 255, 255, 255, 255, 255]);
    let frame = Frame::new(2, 2, Channels::Rgb, data).unwrap();
    let out = quantize(&frame, 16).unwrap();
    assert_eq!(out, frame);
}

#[test]
fn alpha_is_copied_through_remap() {
    let frame = Frame::from_pixel(3, 3, &[10, 20, 30, 99]).unwrap();
    let out = remap(&frame, &[[0, 0, 0]]).unwrap();
    assert!(out.data().chunks_exact(4).all(|px| px == [0, 0, 0, 99]));
}

#[test]
fn invalid_palette_sizes_are_rejected() {
    let frame = Frame::from_pixel(2, 2, &[1, 2, 3]).unwrap();
    assert!(median_cut_palette(&frame, 0).is_err());
    assert!(remap(&frame, &[]).is_err());
}
