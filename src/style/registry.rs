use std::collections::BTreeMap;

use crate::foundation::error::{RetroError, RetroResult};
use crate::style::spec::{
    CLASSIC_PIXEL_STYLE, CUSTOM_STYLE, FAITH_STYLE, GLITCH_STYLE, StyleSpec,
};

const NO_DESCRIPTION: &str = "No description available";
const NOT_FOUND: &str = "Style not found";

/// Read-only map of style name to [`StyleSpec`] with one default entry.
///
/// Names are case-sensitive. Missing names are not an error here; the dispatcher decides how to
/// fall back.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleRegistry {
    styles: BTreeMap<String, StyleSpec>,
    default_style: String,
}

impl StyleRegistry {
    /// Build a registry, checking that `default_style` exists and every spec is valid.
    pub fn new(
        styles: BTreeMap<String, StyleSpec>,
        default_style: impl Into<String>,
    ) -> RetroResult<Self> {
        let default_style = default_style.into();
        if !styles.contains_key(&default_style) {
            return Err(RetroError::config(format!(
                "default_style '{default_style}' is not a registered style"
            )));
        }
        if styles.contains_key(CUSTOM_STYLE) {
            return Err(RetroError::config(format!(
                "'{CUSTOM_STYLE}' is reserved and cannot be registered"
            )));
        }
        for (name, spec) in &styles {
            spec.validate()
                .map_err(|e| RetroError::config(format!("style '{name}': {e}")))?;
        }
        Ok(Self {
            styles,
            default_style,
        })
    }

    /// The three built-in styles, defaulting to `faith`.
    pub fn builtin() -> Self {
        Self {
            styles: builtin_styles(),
            default_style: FAITH_STYLE.to_string(),
        }
    }

    /// Spec registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<&StyleSpec> {
        self.styles.get(name)
    }

    /// Name of the default style.
    pub fn default_style(&self) -> &str {
        &self.default_style
    }

    pub(crate) fn default_spec(&self) -> Option<&StyleSpec> {
        self.styles.get(&self.default_style)
    }

    /// Registered names in sorted order.
    pub fn all_names(&self) -> Vec<&str> {
        self.styles.keys().map(String::as_str).collect()
    }

    /// Description of `name` for display.
    pub fn describe(&self, name: &str) -> &str {
        match self.styles.get(name) {
            Some(spec) if spec.description.is_empty() => NO_DESCRIPTION,
            Some(spec) => &spec.description,
            None => NOT_FOUND,
        }
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

pub(crate) fn builtin_styles() -> BTreeMap<String, StyleSpec> {
    BTreeMap::from([
        (FAITH_STYLE.to_string(), StyleSpec::faith()),
        (CLASSIC_PIXEL_STYLE.to_string(), StyleSpec::classic_pixel()),
        (GLITCH_STYLE.to_string(), StyleSpec::glitch()),
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/style/registry.rs"]
mod tests;
