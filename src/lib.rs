//! Retroframe turns video frames into retro pixel-art styles.
//!
//! The core is a small, pure style engine: a [`StyleEngine`] resolves a style name (or a custom
//! [`StyleSpec`]) to one of four algorithms and applies it to a [`Frame`], passing any alpha channel
//! through untouched.
//!
//! # Styles
//!
//! - **Faith**: monochrome blocks, autocontrast, Floyd–Steinberg dithering or a hard threshold,
//!   uniform noise.
//! - **Classic-Pixel**: blocks reduced to a 16-colour median-cut palette.
//! - **Glitch**: red/blue channel misregistration plus random block corruption.
//! - **Legacy-Edge**: full-resolution Canny edge map with additive distortion.
//!
//! # Around the engine
//!
//! 1. **Extract**: `ffmpeg` decodes a video into numbered PNG frames ([`extract_frames`])
//! 2. **Matte** (optional): a [`Matte`] removes backgrounds ([`remove_background_dir`])
//! 3. **Stylize**: frames are processed sequentially or on a rayon pool ([`stylize_dir`])
//! 4. **Reassemble**: `ffmpeg` encodes the stylized frames into an MP4 ([`reassemble_video`])
//!
//! [`ConvertJob`] runs the whole chain using the directory layout from an [`AppConfig`].
//!
//! Randomness is always injected (`&mut impl rand::Rng`), so seeded runs are reproducible.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod config;
mod foundation;
mod io;
mod media;
mod ops;
mod pipeline;
mod style;

pub use config::app::AppConfig;
pub use foundation::error::{RetroError, RetroResult};
pub use foundation::frame::{Channels, Frame, Plane};
pub use io::frames::{decode_frame, encode_png, list_frame_files, read_frame, write_frame};
pub use media::ffmpeg::{
    FRAME_PATTERN, ensure_parent_dir, extract_frames, is_ffmpeg_on_path, reassemble_video,
};
pub use media::matte::{CommandMatte, Matte, PassThroughMatte, remove_background_dir};
pub use ops::edges::canny;
pub use ops::noise::{add_signed_noise, add_uniform_noise};
pub use ops::palette::{median_cut_palette, quantize, remap};
pub use ops::pixelate::{grow, shrink};
pub use ops::tone::{
    autocontrast, autocontrast_lut, autocontrast_plane, dither_floyd_steinberg, grayscale,
    threshold,
};
pub use pipeline::batch::{
    BatchOptions, BatchStats, FrameErrorPolicy, StyleRequest, Threading, frame_rng, stylize_dir,
    stylize_file,
};
pub use pipeline::convert::{ConvertJob, ExportOptions, JobLayout, JobReport};
pub use style::engine::{Resolution, Style, StyleEngine, StyleFallback};
pub use style::legacy_edge::EdgeParams;
pub use style::registry::StyleRegistry;
pub use style::spec::{
    CLASSIC_PIXEL_STYLE, CUSTOM_STYLE, ColorMode, FAITH_STYLE, GLITCH_STYLE, LEGACY_EDGE_STYLE,
    StyleSpec,
};
