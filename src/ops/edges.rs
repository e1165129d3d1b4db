//! Canny edge detection on a luminance plane.
//!
//! - Sobel 3×3 gradients with border clamping (replicate).
//! - L1 magnitude `|gx| + |gy|`.
//! - Non-maximum suppression along the gradient direction quantized to 0°, 45°, 90° and 135°.
//! - Hysteresis: pixels above `high` seed edges, which then grow through 8-connected pixels above
//!   `low`.
//!
//! The result is a binary plane, 255 on edges and 0 elsewhere.

use crate::foundation::error::{RetroError, RetroResult};
use crate::foundation::frame::Plane;

const TAN_22_5_DEG: f32 = 0.414_213_57;

type Kernel3 = [[i32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1, 0, 1], [-2, 0, 2], [-1, 0, 1]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1, -2, -1], [0, 0, 0], [1, 2, 1]];

struct Gradients {
    gx: Vec<i32>,
    gy: Vec<i32>,
    mag: Vec<f32>,
}

fn sobel(gray: &Plane) -> Gradients {
    let w = gray.width() as usize;
    let h = gray.height() as usize;
    let src = gray.data();
    let mut gx = vec![0i32; w * h];
    let mut gy = vec![0i32; w * h];
    let mut mag = vec![0f32; w * h];

    for y in 0..h {
        let ys = [y.saturating_sub(1), y, (y + 1).min(h - 1)];
        for x in 0..w {
            let xs = [x.saturating_sub(1), x, (x + 1).min(w - 1)];
            let mut sx = 0i32;
            let mut sy = 0i32;
            for (ky, &yy) in ys.iter().enumerate() {
                let row = &src[yy * w..yy * w + w];
                for (kx, &xx) in xs.iter().enumerate() {
                    let v = i32::from(row[xx]);
                    sx += v * SOBEL_KERNEL_X[ky][kx];
                    sy += v * SOBEL_KERNEL_Y[ky][kx];
                }
            }
            let idx = y * w + x;
            gx[idx] = sx;
            gy[idx] = sy;
            mag[idx] = (sx.abs() + sy.abs()) as f32;
        }
    }

    Gradients { gx, gy, mag }
}

fn suppress_non_maxima(g: &Gradients, w: usize, h: usize) -> Vec<f32> {
    let at = |x: isize, y: isize| -> f32 {
        if x < 0 || y < 0 || x >= w as isize || y >= h as isize {
            0.0
        } else {
            g.mag[y as usize * w + x as usize]
        }
    };

    let mut out = vec![0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let m = g.mag[idx];
            if m == 0.0 {
                continue;
            }
            let (xi, yi) = (x as isize, y as isize);
            let gx = g.gx[idx] as f32;
            let gy = g.gy[idx] as f32;
            let (ax, ay) = (gx.abs(), gy.abs());
            let same_sign = (gx >= 0.0) == (gy >= 0.0);

            let (n1, n2) = if ay <= ax * TAN_22_5_DEG {
                (at(xi - 1, yi), at(xi + 1, yi))
            } else if ax <= ay * TAN_22_5_DEG {
                (at(xi, yi - 1), at(xi, yi + 1))
            } else if same_sign {
                (at(xi - 1, yi - 1), at(xi + 1, yi + 1))
            } else {
                (at(xi + 1, yi - 1), at(xi - 1, yi + 1))
            };

            if m > n1 && m >= n2 {
                out[idx] = m;
            }
        }
    }
    out
}

/// Run the Canny detector with hysteresis thresholds `low` and `high`.
///
/// Thresholds apply to the L1 gradient magnitude; a reversed pair is swapped.
pub fn canny(gray: &Plane, low: f32, high: f32) -> RetroResult<Plane> {
    if !low.is_finite() || !high.is_finite() || low < 0.0 || high < 0.0 {
        return Err(RetroError::validation(
            "edge thresholds must be finite and >= 0",
        ));
    }
    let (low, high) = if low > high { (high, low) } else { (low, high) };

    let w = gray.width() as usize;
    let h = gray.height() as usize;
    let grad = sobel(gray);
    let thin = suppress_non_maxima(&grad, w, h);

    let mut edges = vec![0u8; w * h];
    let mut stack = Vec::new();
    for (idx, &m) in thin.iter().enumerate() {
        if m > high {
            edges[idx] = 255;
            stack.push(idx);
        }
    }

    while let Some(idx) = stack.pop() {
        let (x, y) = ((idx % w) as isize, (idx / w) as isize);
        for dy in -1..=1isize {
            for dx in -1..=1isize {
                let (nx, ny) = (x + dx, y + dy);
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let n = ny as usize * w + nx as usize;
                if edges[n] == 0 && thin[n] > low {
                    edges[n] = 255;
                    stack.push(n);
                }
            }
        }
    }

    Plane::new(gray.width(), gray.height(), edges)
}

#[cfg(test)]
#[path = "../../tests/unit/ops/edges.rs"]
mod tests;
