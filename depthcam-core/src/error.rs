//! Error types for mesh import and camera configuration.
//!
//! Rendering itself never fails: degenerate input is skipped silently and
//! reported only through the returned bounding box.

use thiserror::Error;

/// Errors that can occur outside the rendering hot path.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading a mesh or config file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// STL data could not be parsed.
    #[error("invalid STL: {0}")]
    Stl(String),

    /// Config file is not valid TOML for a camera config.
    #[error("failed to parse camera config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config parsed but holds values the renderer cannot use.
    #[error("invalid camera config: {0}")]
    InvalidConfig(String),
}

/// Result type for fallible depthcam operations.
pub type Result<T> = std::result::Result<T, Error>;
