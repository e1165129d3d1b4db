use super::*;

#[test]
fn grayscale_uses_perceptual_weights() {
    let frame = Frame::new(3, 1, crate::Channels::Rgb, vec![255, 0, 0, 0, 255, 0, 0, 0, 255])
        .unwrap();
    let gray = grayscale(&frame).unwrap();
    assert_eq!(gray.data(), &[76, 150, 29]);
}

#[test]
fn grayscale_ignores_alpha() {
    let frame = Frame::from_pixel(2, 2, &[128, 128, 128, 0]).unwrap();
    let gray = grayscale(&frame).unwrap();
    assert!(gray.data().iter().all(|&v| v == 128));
}

#[test]
fn autocontrast_stretches_to_full_range() {
    let plane = Plane::new(4, 1, vec![100, 110, 120, 130]).unwrap();
    let out = autocontrast_plane(&plane, 0.0).unwrap();
    assert_eq!(out.data(), &[0, 85, 170, 255]);
}

#[test]
fn autocontrast_clips_outliers_before_stretching() {
    // 1 dark and 1 bright outlier out of 20 samples: a 5% cutoff removes exactly one at each end.
    let mut data = vec![0u8];
    data.extend(std::iter::repeat_n(100u8, 9));
    data.extend(std::iter::repeat_n(150u8, 9));
    data.push(255);
    let plane = Plane::new(20, 1, data).unwrap();

    let out = autocontrast_plane(&plane, 5.0).unwrap();
    assert_eq!(out.data()[1], 0);
    assert_eq!(out.data()[18], 255);
    assert_eq!(out.data()[0], 0);
    assert_eq!(out.data()[19], 255);
}

#[test]
fn autocontrast_leaves_flat_images_alone() {
    let frame = Frame::from_pixel(5, 5, &[128, 128, 128]).unwrap();
    let out = autocontrast(&frame, 10.0).unwrap();
    assert_eq!(out, frame);
}

#[test]
fn autocontrast_rejects_bad_cutoff() {
    let plane = Plane::filled(2, 2, 7).unwrap();
    assert!(autocontrast_plane(&plane, 50.0).is_err());
    assert!(autocontrast_plane(&plane, f32::NAN).is_err());
}

#[test]
fn threshold_splits_at_level() {
    let plane = Plane::new(3, 1, vec![127, 128, 200]).unwrap();
    assert_eq!(threshold(&plane, 128).data(), &[0, 255, 255]);
}

#[test]
fn dither_output_is_binary() {
    let data: Vec<u8> = (0..64u32).map(|v| (v * 4) as u8).collect();
    let plane = Plane::new(8, 8, data).unwrap();
    let out = dither_floyd_steinberg(&plane);
    assert!(out.data().iter().all(|&v| v == 0 || v == 255));
}

#[test]
fn dither_preserves_mean_intensity_of_midgray() {
    let plane = Plane::filled(16, 16, 128).unwrap();
    let out = dither_floyd_steinberg(&plane);
    let white = out.data().iter().filter(|&&v| v == 255).count();
    // Roughly half the samples end up white.
    assert!((96..=160).contains(&white), "white={white}");
}

#[test]
fn dither_diffuses_error_to_the_right() {
    // First pixel 100 -> 0 leaves error 100; right neighbour gets +43 and crosses the threshold.
    let plane = Plane::new(2, 1, vec![100, 100]).unwrap();
    assert_eq!(dither_floyd_steinberg(&plane).data(), &[0, 255]);
}

fn reference_diffusion(plane: &Plane) -> Vec<u8> {
    let (w, h) = (plane.width() as i64, plane.height() as i64);
    let mut acc: Vec<f64> = plane.data().iter().map(|&v| f64::from(v)).collect();
    let mut out = vec![0u8; acc.len()];
    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) as usize;
            let old = acc[idx].clamp(0.0, 255.0);
            let new = if old >= 128.0 { 255.0 } else { 0.0 };
            out[idx] = new as u8;
            let err = old - new;
            for (bx, by, num) in [(x + 1, y, 7.0), (x - 1, y + 1, 3.0), (x, y + 1, 5.0), (x + 1, y + 1, 1.0)] {
                if bx >= 0 && bx < w && by < h {
                    acc[(by * w + bx) as usize] += err * num / 16.0;
                }
            }
        }
    }
    out
}

#[test]
fn dither_matches_unrounded_diffusion() {
    for v in [9u8, 20, 40, 200] {
        let plane = Plane::filled(16, 16, v).unwrap();
        assert_eq!(dither_floyd_steinberg(&plane).data(), reference_diffusion(&plane), "v={v}");
    }
    let ramp: Vec<u8> = (0..96u32).map(|i| (i * 37 % 256) as u8).collect();
    let plane = Plane::new(12, 8, ramp).unwrap();
    assert_eq!(dither_floyd_steinberg(&plane).data(), reference_diffusion(&plane));
}

#[test]
fn dither_keeps_small_errors_in_dark_regions() {
    // Per-pixel errors below 16 still have to reach the neighbours.
    let plane = Plane::filled(64, 64, 9).unwrap();
    let white = dither_floyd_steinberg(&plane)
        .data()
        .iter()
        .filter(|&&v| v == 255)
        .count();
    assert!(white >= 115, "white={white}");
}
