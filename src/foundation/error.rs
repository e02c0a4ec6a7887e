/// Convenience result type used across the studio.
pub type StudioResult<T> = Result<T, StudioError>;

/// Top-level error taxonomy used by studio APIs.
///
/// Most pipeline boundaries (rasterization, palette resolution, capture prerequisites) do not
/// surface these errors to callers; they log and degrade to `None`. Loading, configuration and
/// rendering entry points return them directly.
#[derive(thiserror::Error, Debug)]
pub enum StudioError {
    /// Invalid caller-provided data (sizes, options, keys).
    #[error("validation error: {0}")]
    Validation(String),

    /// Vector markup or image data that could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Model import failures.
    #[error("load error: {0}")]
    Load(String),

    /// Errors while rendering a scene or composing an image.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StudioError {
    /// Build a [`StudioError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StudioError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`StudioError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`StudioError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StudioError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
