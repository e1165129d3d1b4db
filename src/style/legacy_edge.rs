//! Legacy-Edge: Canny edge map with additive distortion, at full resolution.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::foundation::error::RetroResult;
use crate::foundation::frame::{Frame, Plane};
use crate::ops::edges::canny;
use crate::ops::noise::add_signed_noise;
use crate::ops::tone::grayscale;

/// Caller-supplied Legacy-Edge parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeParams {
    /// Lower hysteresis threshold.
    pub low: f32,
    /// Upper hysteresis threshold.
    pub high: f32,
    /// Noise range; each sample moves by an integer in `[-strength, strength)`.
    pub strength: i32,
}

impl Default for EdgeParams {
    fn default() -> Self {
        Self {
            low: 100.0,
            high: 200.0,
            strength: 20,
        }
    }
}

impl EdgeParams {
    /// Parameters from a `[low, high]` threshold pair and a distortion strength.
    pub fn new(thresholds: [f32; 2], strength: i32) -> Self {
        Self {
            low: thresholds[0],
            high: thresholds[1],
            strength,
        }
    }
}

pub(crate) fn apply<R: Rng + ?Sized>(
    frame: &Frame,
    params: &EdgeParams,
    rng: &mut R,
) -> RetroResult<Frame> {
    let (rgb, alpha) = frame.split_alpha();
    let mut edges = canny(&grayscale(&rgb)?, params.low, params.high)?;
    if let Some(alpha) = &alpha {
        mask_transparent(&mut edges, alpha);
    }
    add_signed_noise(&mut edges, params.strength, rng)?;

    let out = Frame::from_gray(&edges);
    match alpha {
        Some(alpha) => out.with_alpha(&alpha),
        None => Ok(out),
    }
}

fn mask_transparent(edges: &mut Plane, alpha: &Plane) {
    for (e, &a) in edges.data_mut().iter_mut().zip(alpha.data()) {
        if a == 0 {
            *e = 0;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/legacy_edge.rs"]
mod tests;
