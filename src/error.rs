//! Error types for startup and presentation failures.
//!
//! Once the animation loop is running almost nothing can fail: tinting and
//! position updates are total. Everything here is raised either while the
//! session is being assembled (logo, window, topology) or when a frame cannot
//! be presented.

use thiserror::Error;

/// Result type alias for bonk operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Reading a file from disk failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The logo could not be decoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Creating or updating the output window failed.
    #[error("window error: {0}")]
    Window(String),

    /// A platform display query failed.
    #[error("platform error: {0}")]
    Platform(String),

    /// The topology provider reported no monitors at all.
    #[error("no monitors available")]
    NoMonitors,

    /// A `--monitor` argument could not be parsed.
    #[error("invalid region {0:?}: expected `x,y,WxH` or `WxH`")]
    InvalidRegion(String),

    /// A `--size` argument could not be parsed.
    #[error("invalid size {0:?}: expected `WxH`")]
    InvalidSize(String),
}
