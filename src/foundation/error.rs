/// Convenience result type used across retroframe.
pub type RetroResult<T> = Result<T, RetroError>;

/// Error taxonomy shared by the style engine and the frame plumbing around it.
#[derive(thiserror::Error, Debug)]
pub enum RetroError {
    /// Invalid caller-provided parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// A resampling step would produce a zero-sized image.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Pixel buffer that is not 3- or 4-channel, or whose length does not match its size.
    #[error("channel shape error: {0}")]
    ChannelShape(String),

    /// Invalid configuration file contents.
    #[error("config error: {0}")]
    Config(String),

    /// Failures of external media tools (`ffmpeg`, matting command).
    #[error("media error: {0}")]
    Media(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RetroError {
    /// Build a [`RetroError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RetroError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`RetroError::ChannelShape`] value.
    pub fn channel_shape(msg: impl Into<String>) -> Self {
        Self::ChannelShape(msg.into())
    }

    /// Build a [`RetroError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`RetroError::Media`] value.
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }

    /// Build a [`RetroError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
