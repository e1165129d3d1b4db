//! Classic-Pixel: clean limited-palette look.

use crate::foundation::error::RetroResult;
use crate::foundation::frame::Frame;
use crate::ops::palette::quantize;
use crate::ops::pixelate::{grow, shrink};
use crate::ops::tone::autocontrast;
use crate::style::spec::StyleSpec;

const CUTOFF_PCT: f32 = 5.0;
const PALETTE_SIZE: usize = 16;

/// Quantized image at the reduced resolution.
pub(crate) fn reduce(frame: &Frame, spec: &StyleSpec) -> RetroResult<Frame> {
    spec.validate()?;
    let small = shrink(frame, spec.pixel_size)?;
    let stretched = autocontrast(&small, CUTOFF_PCT)?;
    quantize(&stretched, PALETTE_SIZE)
}

pub(crate) fn apply(frame: &Frame, spec: &StyleSpec) -> RetroResult<Frame> {
    let small = reduce(frame, spec)?;
    grow(&small, frame.width(), frame.height())
}

#[cfg(test)]
#[path = "../../tests/unit/style/classic_pixel.rs"]
mod tests;
