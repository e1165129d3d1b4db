//! Frame files on disk: decoding, encoding and directory listing.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{RetroError, RetroResult};
use crate::foundation::frame::{Channels, Frame};
use crate::media::ffmpeg::ensure_parent_dir;

const FRAME_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Decode an encoded image, keeping RGBA when the source has alpha and RGB otherwise.
pub fn decode_frame(bytes: &[u8]) -> RetroResult<Frame> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    from_dynamic(dyn_img)
}

/// Encode `frame` as PNG.
pub fn encode_png(frame: &Frame) -> RetroResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut buf),
        frame.data(),
        frame.width(),
        frame.height(),
        color_type(frame.channels()),
        image::ImageFormat::Png,
    )
    .context("encode png")?;
    Ok(buf)
}

/// Read and decode one frame file.
pub fn read_frame(path: &Path) -> RetroResult<Frame> {
    let dyn_img = image::open(path).with_context(|| format!("read image '{}'", path.display()))?;
    from_dynamic(dyn_img)
}

/// Write `frame` to `path`, picking the format from the extension (PNG when unknown).
///
/// Formats without alpha support (JPEG) receive the colour channels only.
pub fn write_frame(path: &Path, frame: &Frame) -> RetroResult<()> {
    let format = image::ImageFormat::from_path(path).unwrap_or(image::ImageFormat::Png);
    let flattened;
    let frame = if frame.channels().has_alpha() && format == image::ImageFormat::Jpeg {
        flattened = frame.split_alpha().0;
        &flattened
    } else {
        frame
    };

    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        frame.data(),
        frame.width(),
        frame.height(),
        color_type(frame.channels()),
        format,
    )
    .with_context(|| format!("write image '{}'", path.display()))?;
    Ok(())
}

/// Frame files (`png`, `jpg`, `jpeg`, any case) directly inside `dir`, sorted by file name.
pub fn list_frame_files(dir: &Path) -> RetroResult<Vec<PathBuf>> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("read directory '{}'", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("read directory '{}'", dir.display()))?
            .path();
        if path.is_file() && is_frame_file(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| FRAME_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

fn from_dynamic(dyn_img: image::DynamicImage) -> RetroResult<Frame> {
    let (width, height) = (dyn_img.width(), dyn_img.height());
    if width == 0 || height == 0 {
        return Err(RetroError::geometry("decoded image has zero size"));
    }
    if dyn_img.color().has_alpha() {
        Frame::new(width, height, Channels::Rgba, dyn_img.to_rgba8().into_raw())
    } else {
        Frame::new(width, height, Channels::Rgb, dyn_img.to_rgb8().into_raw())
    }
}

fn color_type(channels: Channels) -> image::ColorType {
    match channels {
        Channels::Rgb => image::ColorType::Rgb8,
        Channels::Rgba => image::ColorType::Rgba8,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/frames.rs"]
mod tests;
