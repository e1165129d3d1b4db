//! Faith: monochrome horror look.

use rand::Rng;

use crate::foundation::error::RetroResult;
use crate::foundation::frame::Frame;
use crate::ops::noise::add_uniform_noise;
use crate::ops::pixelate::{grow, shrink};
use crate::ops::tone::{autocontrast_plane, dither_floyd_steinberg, grayscale, threshold};
use crate::style::spec::StyleSpec;

const CUTOFF_PCT: f32 = 10.0;
const THRESHOLD: u8 = 128;

/// Black/white blocks at the reduced resolution, before upsampling and noise.
pub(crate) fn blocks(frame: &Frame, spec: &StyleSpec) -> RetroResult<Frame> {
    spec.validate()?;
    let small = shrink(frame, spec.pixel_size)?;
    let gray = autocontrast_plane(&grayscale(&small)?, CUTOFF_PCT)?;
    let bits = if spec.dithering {
        dither_floyd_steinberg(&gray)
    } else {
        threshold(&gray, THRESHOLD)
    };
    Ok(Frame::from_gray(&bits))
}

pub(crate) fn apply<R: Rng + ?Sized>(
    frame: &Frame,
    spec: &StyleSpec,
    rng: &mut R,
) -> RetroResult<Frame> {
    let small = blocks(frame, spec)?;
    let mut out = grow(&small, frame.width(), frame.height())?;
    if spec.noise_level > 0.0 {
        add_uniform_noise(&mut out, spec.noise_level, rng)?;
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/style/faith.rs"]
mod tests;
