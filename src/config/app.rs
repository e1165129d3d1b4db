use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::error::{RetroError, RetroResult};
use crate::style::legacy_edge::EdgeParams;
use crate::style::registry::{StyleRegistry, builtin_styles};
use crate::style::spec::{FAITH_STYLE, StyleSpec};

/// Application settings, usually read from `config.json`.
///
/// Every field has a default, so a partial (or empty) JSON object is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Frame rate used for extraction and reassembly.
    pub fps: u32,
    /// Legacy-Edge Canny thresholds `[low, high]`.
    pub edge_threshold: [f32; 2],
    /// Legacy-Edge noise range.
    pub distortion_strength: i32,
    /// Root for extracted and background-removed frames.
    pub output_dir: PathBuf,
    /// Root for stylized frames.
    pub processed_dir: PathBuf,
    /// Directory receiving the final videos.
    pub final_video_dir: PathBuf,
    /// Job name used when none is given.
    pub sub_directory: String,
    /// Style used when a request names none.
    pub default_style: String,
    /// Named styles.
    pub styles: BTreeMap<String, StyleSpec>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            fps: 12,
            edge_threshold: [100.0, 200.0],
            distortion_strength: 20,
            output_dir: PathBuf::from("output"),
            processed_dir: PathBuf::from("processed"),
            final_video_dir: PathBuf::from("final"),
            sub_directory: "frames".to_string(),
            default_style: FAITH_STYLE.to_string(),
            styles: builtin_styles(),
        }
    }
}

impl AppConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> RetroResult<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            RetroError::config(format!("failed to read config '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&data)
            .map_err(|e| RetroError::config(format!("'{}': {e}", path.display())))
    }

    /// Parse and validate config JSON.
    pub fn from_json_str(json: &str) -> RetroResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| RetroError::serde(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json_string(&self) -> RetroResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| RetroError::serde(e.to_string()))
    }

    /// Check value ranges and cross-field references.
    pub fn validate(&self) -> RetroResult<()> {
        if self.fps == 0 {
            return Err(RetroError::config("fps must be > 0"));
        }
        let [low, high] = self.edge_threshold;
        if !low.is_finite() || !high.is_finite() || low < 0.0 || high < 0.0 {
            return Err(RetroError::config(
                "edge_threshold values must be finite and >= 0",
            ));
        }
        if self.distortion_strength < 0 {
            return Err(RetroError::config("distortion_strength must be >= 0"));
        }
        if self.sub_directory.trim().is_empty() {
            return Err(RetroError::config("sub_directory must not be empty"));
        }
        self.registry().map(|_| ())
    }

    /// Style registry described by `styles` and `default_style`.
    pub fn registry(&self) -> RetroResult<StyleRegistry> {
        StyleRegistry::new(self.styles.clone(), self.default_style.clone())
    }

    /// Legacy-Edge parameters from `edge_threshold` and `distortion_strength`.
    pub fn edge_params(&self) -> EdgeParams {
        EdgeParams::new(self.edge_threshold, self.distortion_strength)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/app.rs"]
mod tests;
