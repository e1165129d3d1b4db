use rand::Rng;

use crate::foundation::error::RetroResult;
use crate::foundation::frame::Frame;
use crate::style::legacy_edge::EdgeParams;
use crate::style::registry::StyleRegistry;
use crate::style::spec::{
    CLASSIC_PIXEL_STYLE, CUSTOM_STYLE, ColorMode, FAITH_STYLE, GLITCH_STYLE, LEGACY_EDGE_STYLE,
    StyleSpec,
};
use crate::style::{classic_pixel, faith, glitch, legacy_edge};

/// One concrete algorithm together with its parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Style {
    /// Monochrome blocks with optional dithering and noise.
    Faith(StyleSpec),
    /// 16-colour palette blocks.
    ClassicPixel(StyleSpec),
    /// Channel misregistration with block corruption.
    Glitch(StyleSpec),
    /// Full-resolution edge map.
    LegacyEdge(EdgeParams),
}

impl Style {
    /// Algorithm name as used in logs and the registry.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Faith(_) => FAITH_STYLE,
            Self::ClassicPixel(_) => CLASSIC_PIXEL_STYLE,
            Self::Glitch(_) => GLITCH_STYLE,
            Self::LegacyEdge(_) => LEGACY_EDGE_STYLE,
        }
    }

    /// Run the algorithm. Alpha, when present, is passed through unchanged.
    pub fn apply<R: Rng + ?Sized>(&self, frame: &Frame, rng: &mut R) -> RetroResult<Frame> {
        match self {
            Self::Faith(spec) => on_color(frame, |rgb| faith::apply(rgb, spec, rng)),
            Self::ClassicPixel(spec) => on_color(frame, |rgb| classic_pixel::apply(rgb, spec)),
            Self::Glitch(spec) => on_color(frame, |rgb| glitch::apply(rgb, spec, rng)),
            Self::LegacyEdge(params) => legacy_edge::apply(frame, params, rng),
        }
    }
}

fn on_color(
    frame: &Frame,
    op: impl FnOnce(&Frame) -> RetroResult<Frame>,
) -> RetroResult<Frame> {
    let (rgb, alpha) = frame.split_alpha();
    let out = op(&rgb)?;
    match alpha {
        Some(alpha) => out.with_alpha(&alpha),
        None => Ok(out),
    }
}

/// Why a request did not resolve to the style it named.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StyleFallback {
    /// The name is neither registered nor `custom`.
    UnknownStyle(String),
    /// `custom` was requested without parameters.
    MissingCustomParams,
    /// The spec's colour mode selects no algorithm.
    UnrecognizedColorMode(Option<String>),
}

impl std::fmt::Display for StyleFallback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownStyle(name) => write!(f, "unknown style '{name}'"),
            Self::MissingCustomParams => f.write_str("custom style requested without parameters"),
            Self::UnrecognizedColorMode(Some(mode)) => {
                write!(f, "unrecognized color mode '{mode}'")
            }
            Self::UnrecognizedColorMode(None) => f.write_str("no color mode to select a style"),
        }
    }
}

/// Outcome of [`StyleEngine::resolve`].
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    /// Algorithm to run.
    pub style: Style,
    /// Fallbacks taken on the way, in order.
    pub fallbacks: Vec<StyleFallback>,
}

/// Style dispatcher over a [`StyleRegistry`].
#[derive(Clone, Debug, Default)]
pub struct StyleEngine {
    registry: StyleRegistry,
}

impl StyleEngine {
    /// Engine over `registry`.
    pub fn new(registry: StyleRegistry) -> Self {
        Self { registry }
    }

    /// Registry the engine resolves names against.
    pub fn registry(&self) -> &StyleRegistry {
        &self.registry
    }

    /// Map a style name and optional custom parameters to one algorithm.
    ///
    /// Never fails: unknown names, missing custom parameters and unrecognized colour modes all
    /// degrade to a usable style and are reported in [`Resolution::fallbacks`].
    pub fn resolve(&self, name: Option<&str>, custom: Option<&StyleSpec>) -> Resolution {
        let mut fallbacks = Vec::new();
        let default_name = self.registry.default_style();
        let requested = name.unwrap_or(default_name);

        let (name, spec) = if requested == CUSTOM_STYLE {
            match custom {
                Some(spec) => (CUSTOM_STYLE, spec.clone()),
                None => {
                    fallbacks.push(StyleFallback::MissingCustomParams);
                    (default_name, self.default_spec())
                }
            }
        } else {
            match self.registry.lookup(requested) {
                Some(spec) => (requested, spec.clone()),
                None => {
                    fallbacks.push(StyleFallback::UnknownStyle(requested.to_string()));
                    (default_name, self.default_spec())
                }
            }
        };

        let mode = spec.color_mode.clone();
        let style = match (name, mode.as_ref()) {
            (FAITH_STYLE, _) | (_, Some(ColorMode::Monochrome)) => Style::Faith(spec),
            (CLASSIC_PIXEL_STYLE, _) | (_, Some(ColorMode::LimitedPalette)) => {
                Style::ClassicPixel(spec)
            }
            (GLITCH_STYLE, _) | (_, Some(ColorMode::RgbShift)) => Style::Glitch(spec),
            (_, mode) => {
                fallbacks.push(StyleFallback::UnrecognizedColorMode(
                    mode.map(|m| m.to_string()),
                ));
                Style::Faith(self.faith_spec())
            }
        };

        Resolution { style, fallbacks }
    }

    /// Stylize `frame` with the named (or custom) style, falling back with a warning when the
    /// request cannot be honoured as given.
    pub fn process<R: Rng + ?Sized>(
        &self,
        frame: &Frame,
        name: Option<&str>,
        custom: Option<&StyleSpec>,
        rng: &mut R,
    ) -> RetroResult<Frame> {
        let resolution = self.resolve(name, custom);
        for fallback in &resolution.fallbacks {
            tracing::warn!(
                %fallback,
                style = resolution.style.name(),
                "style request fell back"
            );
        }
        resolution.style.apply(frame, rng)
    }

    /// Stylize `frame` with the Legacy-Edge algorithm.
    pub fn process_legacy_edge<R: Rng + ?Sized>(
        &self,
        frame: &Frame,
        params: &EdgeParams,
        rng: &mut R,
    ) -> RetroResult<Frame> {
        Style::LegacyEdge(*params).apply(frame, rng)
    }

    fn default_spec(&self) -> StyleSpec {
        self.registry
            .default_spec()
            .cloned()
            .unwrap_or_else(StyleSpec::faith)
    }

    fn faith_spec(&self) -> StyleSpec {
        self.registry
            .lookup(FAITH_STYLE)
            .cloned()
            .unwrap_or_else(StyleSpec::faith)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/engine.rs"]
mod tests;
