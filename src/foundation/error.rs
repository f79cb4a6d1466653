/// Crate-wide result alias.
pub type MosaicResult<T> = Result<T, MosaicError>;

/// Errors produced while planning, rendering, or encoding a mosaic.
#[derive(thiserror::Error, Debug)]
pub enum MosaicError {
    /// Invalid configuration or argument.
    #[error("validation error: {0}")]
    Validation(String),

    /// The grid could not be filled exactly.
    #[error("layout error: {0}")]
    Layout(String),

    /// The output sink failed to open, accept a frame, or finalize.
    #[error("encode error: {0}")]
    Encode(String),

    /// Config (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, with its source chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MosaicError {
    /// Build a [`MosaicError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MosaicError::Layout`].
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`MosaicError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`MosaicError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}
