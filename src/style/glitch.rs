//! Glitch: chromatic misregistration plus block corruption.

use rand::Rng;

use crate::foundation::error::RetroResult;
use crate::foundation::frame::{Frame, Plane};
use crate::ops::pixelate::{grow, shrink};
use crate::style::spec::StyleSpec;

const SHIFT_FRACTION: f64 = 0.02;
const PASSES_PER_NOISE_UNIT: f32 = 10.0;
const MAX_BLOCK: u32 = 6;
const MAX_JITTER: i64 = 3;

/// Channel offset in small-image columns; derived from the full-resolution width.
pub(crate) fn shift_for_width(width: u32) -> usize {
    (f64::from(width) * SHIFT_FRACTION).floor() as usize
}

/// Red moves left by `shift` columns, blue moves right; vacated columns are zero.
pub(crate) fn misregister(small: &Frame, shift: usize) -> RetroResult<Frame> {
    let r = shift_plane(&small.channel_plane(0)?, -(shift as i64))?;
    let g = small.channel_plane(1)?;
    let b = shift_plane(&small.channel_plane(2)?, shift as i64)?;
    Frame::from_rgb_planes(&r, &g, &b)
}

fn shift_plane(plane: &Plane, dx: i64) -> RetroResult<Plane> {
    let w = plane.width() as i64;
    let mut out = vec![0u8; plane.data().len()];
    for (src_row, dst_row) in plane
        .data()
        .chunks_exact(w as usize)
        .zip(out.chunks_exact_mut(w as usize))
    {
        for x in 0..w {
            let sx = x - dx;
            if (0..w).contains(&sx) {
                dst_row[x as usize] = src_row[sx as usize];
            }
        }
    }
    Plane::new(plane.width(), plane.height(), out)
}

/// Copy random small blocks sideways on the same rows, `passes` times.
///
/// Each pass sees the result of the previous ones. Samples read from outside the image are black
/// and writes outside the image are dropped.
pub(crate) fn corrupt_blocks<R: Rng + ?Sized>(frame: &mut Frame, passes: u32, rng: &mut R) {
    let (w, h) = frame.dimensions();
    if w < 3 || h < 3 {
        return;
    }
    let c = frame.channels().count();
    let stride = w as usize * c;

    for _ in 0..passes {
        let bx = rng.gen_range(0..=w - 3);
        let by = rng.gen_range(0..=h - 3);
        let bw = rng.gen_range(1..=MAX_BLOCK);
        let bh = rng.gen_range(1..=MAX_BLOCK);

        let mut block = vec![0u8; (bw * bh) as usize * c];
        {
            let data = frame.data();
            for row in 0..bh {
                let y = by + row;
                if y >= h {
                    continue;
                }
                for col in 0..bw {
                    let x = bx + col;
                    if x >= w {
                        continue;
                    }
                    let src = y as usize * stride + x as usize * c;
                    let dst = (row * bw + col) as usize * c;
                    block[dst..dst + c].copy_from_slice(&data[src..src + c]);
                }
            }
        }

        let dx = rng.gen_range(-MAX_JITTER..=MAX_JITTER);
        let data = frame.data_mut();
        for row in 0..bh {
            let y = by + row;
            if y >= h {
                continue;
            }
            for col in 0..bw {
                let x = i64::from(bx + col) + dx;
                if x < 0 || x >= i64::from(w) {
                    continue;
                }
                let dst = y as usize * stride + x as usize * c;
                let src = (row * bw + col) as usize * c;
                data[dst..dst + c].copy_from_slice(&block[src..src + c]);
            }
        }
    }
}

// At most one pass per small-image pixel.
pub(crate) fn corruption_passes(noise_level: f32, (w, h): (u32, u32)) -> u32 {
    let cap = u64::from(w) * u64::from(h);
    let passes = f64::from(PASSES_PER_NOISE_UNIT * noise_level).round();
    passes.min(cap.min(u64::from(u32::MAX)) as f64) as u32
}

pub(crate) fn apply<R: Rng + ?Sized>(
    frame: &Frame,
    spec: &StyleSpec,
    rng: &mut R,
) -> RetroResult<Frame> {
    spec.validate()?;
    let small = shrink(frame, spec.pixel_size)?;
    let mut out = misregister(&small, shift_for_width(frame.width()))?;
    if spec.noise_level > 0.0 {
        let passes = corruption_passes(spec.noise_level, out.dimensions());
        corrupt_blocks(&mut out, passes, rng);
    }
    grow(&out, frame.width(), frame.height())
}

#[cfg(test)]
#[path = "../../tests/unit/style/glitch.rs"]
mod tests;
