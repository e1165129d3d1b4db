//! Nearest-neighbour pixelation.
//!
//! Styles call [`shrink`] once, run their tone/quantization passes on the small image so each
//! sample becomes one visible block, then [`grow`] back to the source size at the end.

use image::imageops::{self, FilterType};
use image::{ImageBuffer, Pixel, Rgb, Rgba};

use crate::foundation::error::{RetroError, RetroResult};
use crate::foundation::frame::{Channels, Frame};

/// Downsample by an integer factor: the result is `(W / factor, H / factor)`, remainder pixels at
/// the right and bottom edges are dropped.
pub fn shrink(frame: &Frame, factor: u32) -> RetroResult<Frame> {
    let (w, h) = shrunk_dims(frame.width(), frame.height(), factor)?;
    resize_nearest(frame, w, h)
}

/// Nearest-neighbour resample to exactly `width x height`.
pub fn grow(frame: &Frame, width: u32, height: u32) -> RetroResult<Frame> {
    resize_nearest(frame, width, height)
}

fn shrunk_dims(width: u32, height: u32, factor: u32) -> RetroResult<(u32, u32)> {
    if factor == 0 {
        return Err(RetroError::validation("pixel_size must be >= 1"));
    }
    let (w, h) = (width / factor, height / factor);
    if w == 0 || h == 0 {
        return Err(RetroError::geometry(format!(
            "pixel_size {factor} collapses a {width}x{height} image to {w}x{h}"
        )));
    }
    Ok((w, h))
}

fn resize_nearest(frame: &Frame, width: u32, height: u32) -> RetroResult<Frame> {
    if width == 0 || height == 0 {
        return Err(RetroError::geometry(format!(
            "cannot resample to {width}x{height}"
        )));
    }
    if frame.dimensions() == (width, height) {
        return Ok(frame.clone());
    }
    let (w, h) = frame.dimensions();
    let data = match frame.channels() {
        Channels::Rgb => resize_buffer::<Rgb<u8>>(frame.data(), w, h, width, height)?,
        Channels::Rgba => resize_buffer::<Rgba<u8>>(frame.data(), w, h, width, height)?,
    };
    Frame::new(width, height, frame.channels(), data)
}

fn resize_buffer<P>(src: &[u8], w: u32, h: u32, width: u32, height: u32) -> RetroResult<Vec<u8>>
where
    P: Pixel<Subpixel = u8> + 'static,
{
    let img = ImageBuffer::<P, &[u8]>::from_raw(w, h, src)
        .ok_or_else(|| RetroError::channel_shape(format!("buffer does not hold {w}x{h} pixels")))?;
    Ok(imageops::resize(&img, width, height, FilterType::Nearest).into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/ops/pixelate.rs"]
mod tests;
