use serde::{Deserialize, Serialize};

use crate::foundation::error::{RetroError, RetroResult};

/// Registry name of the monochrome horror style.
pub const FAITH_STYLE: &str = "faith";
/// Registry name of the limited-palette style.
pub const CLASSIC_PIXEL_STYLE: &str = "classic_pixel";
/// Registry name of the channel-shift style.
pub const GLITCH_STYLE: &str = "glitch";
/// Pseudo-style whose parameters are supplied by the caller.
pub const CUSTOM_STYLE: &str = "custom";
/// Edge-detection style, routed outside the registry.
pub const LEGACY_EDGE_STYLE: &str = "legacy_edge";

/// Colour treatment requested by a [`StyleSpec`]; selects the algorithm for custom styles.
///
/// Unrecognized strings are kept as [`ColorMode::Other`] so they survive (de)serialization and
/// reach the dispatcher's fallback.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColorMode {
    /// Black and white (Faith).
    Monochrome,
    /// 16-colour palette (Classic-Pixel).
    LimitedPalette,
    /// Red/blue channel shift (Glitch).
    RgbShift,
    /// Any other value.
    Other(String),
}

impl From<String> for ColorMode {
    fn from(s: String) -> Self {
        match s.as_str() {
            "monochrome" => Self::Monochrome,
            "limited_palette" => Self::LimitedPalette,
            "rgb_shift" => Self::RgbShift,
            _ => Self::Other(s),
        }
    }
}

impl From<ColorMode> for String {
    fn from(mode: ColorMode) -> Self {
        mode.as_str().to_string()
    }
}

impl ColorMode {
    /// Configuration spelling of the mode.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Monochrome => "monochrome",
            Self::LimitedPalette => "limited_palette",
            Self::RgbShift => "rgb_shift",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_contrast() -> f32 {
    1.0
}

/// Parameters of one named style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleSpec {
    /// Downsampling factor; one output block covers `pixel_size x pixel_size` source pixels.
    pub pixel_size: u32,
    /// Informational; the styles that stretch contrast use fixed percentile cutoffs.
    #[serde(default = "default_contrast")]
    pub contrast: f32,
    /// Noise amount (Faith) or corruption amount (Glitch), `>= 0`.
    #[serde(default)]
    pub noise_level: f32,
    /// Floyd–Steinberg dithering instead of a hard threshold (Faith).
    #[serde(default)]
    pub dithering: bool,
    /// Algorithm family for custom styles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<ColorMode>,
    /// Display text.
    #[serde(default)]
    pub description: String,
}

impl StyleSpec {
    /// Built-in Faith parameters.
    pub fn faith() -> Self {
        Self {
            pixel_size: 4,
            contrast: 1.5,
            noise_level: 0.2,
            dithering: true,
            color_mode: Some(ColorMode::Monochrome),
            description: "Low-res pixelated horror style with high contrast".to_string(),
        }
    }

    /// Built-in Classic-Pixel parameters.
    pub fn classic_pixel() -> Self {
        Self {
            pixel_size: 3,
            contrast: 1.2,
            noise_level: 0.0,
            dithering: false,
            color_mode: Some(ColorMode::LimitedPalette),
            description: "Clean pixel art with limited palette".to_string(),
        }
    }

    /// Built-in Glitch parameters.
    pub fn glitch() -> Self {
        Self {
            pixel_size: 2,
            contrast: 1.0,
            noise_level: 0.5,
            dithering: false,
            color_mode: Some(ColorMode::RgbShift),
            description: "Distorted pixel art with digital artifacts".to_string(),
        }
    }

    /// Check numeric ranges.
    pub fn validate(&self) -> RetroResult<()> {
        if self.pixel_size == 0 {
            return Err(RetroError::validation("pixel_size must be >= 1"));
        }
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(RetroError::validation(
                "noise_level must be finite and >= 0",
            ));
        }
        if !self.contrast.is_finite() {
            return Err(RetroError::validation("contrast must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/spec.rs"]
mod tests;
