//! Median-cut palette reduction.
//!
//! The palette is built from the colour histogram of the frame: the box with the widest channel
//! range is repeatedly split at its (count-weighted) median until `max_colors` boxes exist or no box
//! holds more than one distinct colour. Each box contributes its weighted mean colour.

use std::collections::HashMap;

use crate::foundation::error::{RetroError, RetroResult};
use crate::foundation::frame::Frame;

struct ColorBox {
    colors: Vec<([u8; 3], u64)>,
}

impl ColorBox {
    fn range(&self) -> (usize, u8) {
        let mut lo = [u8::MAX; 3];
        let mut hi = [u8::MIN; 3];
        for (c, _) in &self.colors {
            for i in 0..3 {
                lo[i] = lo[i].min(c[i]);
                hi[i] = hi[i].max(c[i]);
            }
        }
        (0..3)
            .map(|i| (i, hi[i] - lo[i]))
            .max_by_key(|&(i, r)| (r, std::cmp::Reverse(i)))
            .unwrap_or((0, 0))
    }

    fn split(mut self) -> (ColorBox, ColorBox) {
        let (axis, _) = self.range();
        self.colors.sort_unstable_by_key(|(c, _)| (c[axis], *c));
        let total: u64 = self.colors.iter().map(|(_, n)| n).sum();
        let mut acc = 0u64;
        let mut at = self.colors.len() / 2;
        for (i, (_, n)) in self.colors.iter().enumerate() {
            acc += n;
            if acc * 2 >= total {
                at = i + 1;
                break;
            }
        }
        // Cut only between different values on the axis so sibling boxes never overlap.
        let at = (1..self.colors.len())
            .filter(|&i| self.colors[i - 1].0[axis] != self.colors[i].0[axis])
            .min_by_key(|&i| i.abs_diff(at))
            .unwrap_or(self.colors.len() / 2)
            .max(1);
        let right = self.colors.split_off(at);
        (self, ColorBox { colors: right })
    }

    fn mean(&self) -> [u8; 3] {
        let mut sum = [0u64; 3];
        let mut n = 0u64;
        for (c, count) in &self.colors {
            for i in 0..3 {
                sum[i] += u64::from(c[i]) * count;
            }
            n += count;
        }
        let n = n.max(1);
        [
            ((sum[0] + n / 2) / n) as u8,
            ((sum[1] + n / 2) / n) as u8,
            ((sum[2] + n / 2) / n) as u8,
        ]
    }
}

/// Build a palette of at most `max_colors` entries for the colour channels of `frame`.
pub fn median_cut_palette(frame: &Frame, max_colors: usize) -> RetroResult<Vec<[u8; 3]>> {
    if max_colors == 0 || max_colors > 256 {
        return Err(RetroError::validation(
            "palette size must be between 1 and 256",
        ));
    }

    let c = frame.channels().count();
    let mut hist: HashMap<[u8; 3], u64> = HashMap::new();
    for px in frame.data().chunks_exact(c) {
        *hist.entry([px[0], px[1], px[2]]).or_default() += 1;
    }

    let mut boxes = vec![ColorBox {
        colors: hist.into_iter().collect(),
    }];
    while boxes.len() < max_colors {
        let Some(pick) = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.colors.len() > 1 && b.range().1 > 0)
            .max_by_key(|(i, b)| (b.range().1, b.colors.len(), std::cmp::Reverse(*i)))
            .map(|(i, _)| i)
        else {
            break;
        };
        let (a, b) = boxes.swap_remove(pick).split();
        boxes.push(a);
        boxes.push(b);
    }

    let mut palette: Vec<[u8; 3]> = boxes.iter().map(ColorBox::mean).collect();
    palette.sort_unstable();
    palette.dedup();
    Ok(palette)
}

/// Map every pixel to the nearest entry (squared RGB distance) of `palette`. Alpha is copied.
pub fn remap(frame: &Frame, palette: &[[u8; 3]]) -> RetroResult<Frame> {
    if palette.is_empty() {
        return Err(RetroError::validation("palette must be non-empty"));
    }
    let c = frame.channels().count();
    let mut cache: HashMap<[u8; 3], [u8; 3]> = HashMap::new();
    let mut out = frame.clone();
    for px in out.data_mut().chunks_exact_mut(c) {
        let key = [px[0], px[1], px[2]];
        let mapped = *cache.entry(key).or_insert_with(|| nearest(key, palette));
        px[..3].copy_from_slice(&mapped);
    }
    Ok(out)
}

fn nearest(color: [u8; 3], palette: &[[u8; 3]]) -> [u8; 3] {
    let dist = |p: &[u8; 3]| -> u32 {
        (0..3)
            .map(|i| {
                let d = i32::from(color[i]) - i32::from(p[i]);
                (d * d) as u32
            })
            .sum()
    };
    palette
        .iter()
        .copied()
        .min_by_key(|p| dist(p))
        .unwrap_or(color)
}

/// Reduce `frame` to at most `max_colors` colours and re-expand to full RGB samples.
pub fn quantize(frame: &Frame, max_colors: usize) -> RetroResult<Frame> {
    let palette = median_cut_palette(frame, max_colors)?;
    remap(frame, &palette)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/palette.rs"]
mod tests;
