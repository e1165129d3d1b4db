//! Grayscale conversion, percentile autocontrast and binarization.

use crate::foundation::error::{RetroError, RetroResult};
use crate::foundation::frame::{Frame, Plane};

/// Luminance of the colour channels using ITU-R 601 weights in 16.16 fixed point.
///
/// Alpha, if present, is ignored.
pub fn grayscale(frame: &Frame) -> RetroResult<Plane> {
    let c = frame.channels().count();
    let data = frame
        .data()
        .chunks_exact(c)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect();
    Plane::new(frame.width(), frame.height(), data)
}

fn luma(r: u8, g: u8, b: u8) -> u8 {
    let acc = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471 + 0x8000;
    (acc >> 16).min(255) as u8
}

/// Build the 256-entry lookup table that stretches `samples` to the full [0, 255] range after
/// discarding `cutoff_pct` percent of the samples at each end of the histogram.
///
/// Returns the identity table when the surviving range is empty or a single value.
pub fn autocontrast_lut<'a>(
    samples: impl IntoIterator<Item = &'a u8>,
    cutoff_pct: f32,
) -> RetroResult<[u8; 256]> {
    if !cutoff_pct.is_finite() || !(0.0..50.0).contains(&cutoff_pct) {
        return Err(RetroError::validation(
            "autocontrast cutoff must be in [0, 50)",
        ));
    }

    let mut hist = [0u64; 256];
    let mut n = 0u64;
    for &s in samples {
        hist[s as usize] += 1;
        n += 1;
    }

    let cut = ((n as f64) * f64::from(cutoff_pct) / 100.0).floor() as u64;
    trim_histogram(&mut hist, cut, 0..256);
    trim_histogram(&mut hist, cut, (0..256).rev());

    let lo = hist.iter().position(|&c| c != 0);
    let hi = hist.iter().rposition(|&c| c != 0);
    let mut lut = [0u8; 256];
    match (lo, hi) {
        (Some(lo), Some(hi)) if hi > lo => {
            let scale = 255.0 / (hi - lo) as f64;
            let offset = -(lo as f64) * scale;
            for (ix, v) in lut.iter_mut().enumerate() {
                *v = ((ix as f64) * scale + offset).clamp(0.0, 255.0) as u8;
            }
        }
        _ => {
            for (ix, v) in lut.iter_mut().enumerate() {
                *v = ix as u8;
            }
        }
    }
    Ok(lut)
}

fn trim_histogram(hist: &mut [u64; 256], mut cut: u64, order: impl Iterator<Item = usize>) {
    for i in order {
        if cut == 0 {
            break;
        }
        let take = cut.min(hist[i]);
        hist[i] -= take;
        cut -= take;
    }
}

/// Percentile autocontrast of a single plane.
pub fn autocontrast_plane(plane: &Plane, cutoff_pct: f32) -> RetroResult<Plane> {
    let lut = autocontrast_lut(plane.data(), cutoff_pct)?;
    let mut out = plane.clone();
    for v in out.data_mut() {
        *v = lut[*v as usize];
    }
    Ok(out)
}

/// Percentile autocontrast applied independently to each colour channel. Alpha is copied.
pub fn autocontrast(frame: &Frame, cutoff_pct: f32) -> RetroResult<Frame> {
    let c = frame.channels().count();
    let mut out = frame.clone();
    for channel in 0..3 {
        let samples = frame.data().iter().skip(channel).step_by(c);
        let lut = autocontrast_lut(samples, cutoff_pct)?;
        for px in out.data_mut().chunks_exact_mut(c) {
            px[channel] = lut[px[channel] as usize];
        }
    }
    Ok(out)
}

/// Hard threshold: samples `>= level` become 255, the rest 0.
pub fn threshold(plane: &Plane, level: u8) -> Plane {
    let mut out = plane.clone();
    for v in out.data_mut() {
        *v = if *v >= level { 255 } else { 0 };
    }
    out
}

/// Binarize to {0, 255} with Floyd–Steinberg error diffusion in raster order.
///
/// Quantization error goes 7/16 right, 3/16 below-left, 5/16 below and 1/16 below-right, and is
/// accumulated unrounded into a neighbour before that neighbour is itself quantized.
pub fn dither_floyd_steinberg(plane: &Plane) -> Plane {
    let w = plane.width() as i64;
    let h = plane.height() as i64;
    let mut acc: Vec<f32> = plane.data().iter().map(|&v| f32::from(v)).collect();
    let mut out = plane.clone();
    let dst = out.data_mut();

    for y in 0..h {
        for x in 0..w {
            let idx = (y * w + x) as usize;
            let old = acc[idx].clamp(0.0, 255.0);
            let new = if old >= 128.0 { 255.0 } else { 0.0 };
            dst[idx] = new as u8;
            let err = old - new;

            let mut spread = |bx: i64, by: i64, weight: f32| {
                if bx >= 0 && bx < w && by < h {
                    acc[(by * w + bx) as usize] += err * weight;
                }
            };
            spread(x + 1, y, 7.0 / 16.0);
            spread(x - 1, y + 1, 3.0 / 16.0);
            spread(x, y + 1, 5.0 / 16.0);
            spread(x + 1, y + 1, 1.0 / 16.0);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/ops/tone.rs"]
mod tests;
