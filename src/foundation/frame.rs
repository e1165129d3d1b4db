use crate::foundation::error::{RetroError, RetroResult};

/// Channel layout of a [`Frame`].
///
/// Channels 0..2 are always colour (R, G, B); [`Channels::Rgba`] adds straight alpha as channel 3.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channels {
    /// Three colour channels.
    Rgb,
    /// Three colour channels followed by alpha.
    Rgba,
}

impl Channels {
    /// Map a raw channel count to a layout, rejecting anything but 3 or 4.
    pub fn from_count(count: usize) -> RetroResult<Self> {
        match count {
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            n => Err(RetroError::channel_shape(format!(
                "expected 3 or 4 channels, got {n}"
            ))),
        }
    }

    /// Number of samples per pixel.
    pub fn count(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// `true` for [`Channels::Rgba`].
    pub fn has_alpha(self) -> bool {
        matches!(self, Self::Rgba)
    }
}

/// Row-major 8-bit pixel grid with 3 or 4 interleaved channels.
///
/// The buffer length always equals `width * height * channels`; constructors reject anything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

/// Row-major single-channel 8-bit grid (luminance, edge maps, alpha).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plane {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

pub(crate) fn buffer_len(width: u32, height: u32, channels: usize) -> RetroResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| RetroError::validation("pixel buffer size overflow"))
}

fn check_dims(width: u32, height: u32) -> RetroResult<()> {
    if width == 0 || height == 0 {
        return Err(RetroError::geometry(format!(
            "image dimensions must be non-zero, got {width}x{height}"
        )));
    }
    Ok(())
}

impl Frame {
    /// Wrap an interleaved buffer, validating its length against the dimensions.
    pub fn new(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> RetroResult<Self> {
        check_dims(width, height)?;
        let expected = buffer_len(width, height, channels.count())?;
        if data.len() != expected {
            return Err(RetroError::channel_shape(format!(
                "buffer has {} bytes, expected {expected} for {width}x{height}x{}",
                data.len(),
                channels.count()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Like [`Frame::new`] but takes a raw channel count, as produced by decoders.
    pub fn from_raw(
        width: u32,
        height: u32,
        channel_count: usize,
        data: Vec<u8>,
    ) -> RetroResult<Self> {
        Self::new(width, height, Channels::from_count(channel_count)?, data)
    }

    /// Frame where every pixel equals `pixel`; the slice length selects the layout.
    pub fn from_pixel(width: u32, height: u32, pixel: &[u8]) -> RetroResult<Self> {
        let channels = Channels::from_count(pixel.len())?;
        check_dims(width, height)?;
        let n = buffer_len(width, height, 1)?;
        Self::new(width, height, channels, pixel.repeat(n))
    }

    /// Opaque RGB frame built from a luminance plane by replicating it into every colour channel.
    pub fn from_gray(plane: &Plane) -> Self {
        let mut data = Vec::with_capacity(plane.data.len() * 3);
        for &v in &plane.data {
            data.extend_from_slice(&[v, v, v]);
        }
        Self {
            width: plane.width,
            height: plane.height,
            channels: Channels::Rgb,
            data,
        }
    }

    /// Interleave three equally sized planes into an RGB frame.
    pub fn from_rgb_planes(r: &Plane, g: &Plane, b: &Plane) -> RetroResult<Self> {
        if r.dimensions() != g.dimensions() || r.dimensions() != b.dimensions() {
            return Err(RetroError::channel_shape(
                "rgb planes must share the same dimensions",
            ));
        }
        let mut data = Vec::with_capacity(r.data.len() * 3);
        for ((&rv, &gv), &bv) in r.data.iter().zip(&g.data).zip(&b.data) {
            data.extend_from_slice(&[rv, gv, bv]);
        }
        Ok(Self {
            width: r.width,
            height: r.height,
            channels: Channels::Rgb,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Channel layout.
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Interleaved samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consume the frame, returning its sample buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Samples of the pixel at `(x, y)`.
    ///
    /// Panics when the coordinate is out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels.count();
        let idx = (y as usize * self.width as usize + x as usize) * c;
        &self.data[idx..idx + c]
    }

    /// Copy one channel out into a plane.
    pub fn channel_plane(&self, channel: usize) -> RetroResult<Plane> {
        let c = self.channels.count();
        if channel >= c {
            return Err(RetroError::validation(format!(
                "channel {channel} out of range for a {c}-channel frame"
            )));
        }
        let data = self.data.chunks_exact(c).map(|px| px[channel]).collect();
        Ok(Plane {
            width: self.width,
            height: self.height,
            data,
        })
    }

    /// Separate colour from alpha: returns an RGB frame plus the alpha plane when present.
    pub fn split_alpha(&self) -> (Frame, Option<Plane>) {
        if !self.channels.has_alpha() {
            return (self.clone(), None);
        }
        let n = self.data.len() / 4;
        let mut rgb = Vec::with_capacity(n * 3);
        let mut alpha = Vec::with_capacity(n);
        for px in self.data.chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
            alpha.push(px[3]);
        }
        (
            Frame {
                width: self.width,
                height: self.height,
                channels: Channels::Rgb,
                data: rgb,
            },
            Some(Plane {
                width: self.width,
                height: self.height,
                data: alpha,
            }),
        )
    }

    /// Splice `alpha` back onto the colour channels, producing an RGBA frame.
    pub fn with_alpha(&self, alpha: &Plane) -> RetroResult<Frame> {
        if self.dimensions() != alpha.dimensions() {
            return Err(RetroError::channel_shape(format!(
                "alpha plane is {}x{}, frame is {}x{}",
                alpha.width, alpha.height, self.width, self.height
            )));
        }
        let c = self.channels.count();
        let mut data = Vec::with_capacity(alpha.data.len() * 4);
        for (px, &a) in self.data.chunks_exact(c).zip(&alpha.data) {
            data.extend_from_slice(&px[..3]);
            data.push(a);
        }
        Ok(Frame {
            width: self.width,
            height: self.height,
            channels: Channels::Rgba,
            data,
        })
    }
}

impl Plane {
    /// Wrap a single-channel buffer, validating its length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> RetroResult<Self> {
        check_dims(width, height)?;
        let expected = buffer_len(width, height, 1)?;
        if data.len() != expected {
            return Err(RetroError::channel_shape(format!(
                "plane has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Plane where every sample equals `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> RetroResult<Self> {
        check_dims(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; buffer_len(width, height, 1)?],
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Samples in row-major order.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Sample at `(x, y)`. Panics when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Consume the plane, returning its sample buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/frame.rs"]
mod tests;
