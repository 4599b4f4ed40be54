//! Errors raised at the edges of the canvas core.
//!
//! The document transitions themselves never fail: unknown ids are no-ops and
//! bad geometry is coerced. These errors only cover decoding host input and
//! encoding export payloads.

/// Errors produced by configuration, command decoding and export.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// A configuration document could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// A configuration value parsed but is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A host command or script step could not be decoded.
    #[error("command decode failed: {0}")]
    CommandDecode(String),

    /// A surface id that the product does not offer.
    #[error("unknown surface: {0}")]
    UnknownSurface(String),

    /// A tool id that the studio does not offer.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The design could not be serialized.
    #[error("serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
