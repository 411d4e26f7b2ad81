// One error type for the whole crate.
// Every variant states *where* things went wrong.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Window init error: {0}")]
    WindowInit(String), // Creating the window failed
    #[error("Window update error: {0}")]
    WindowUpdate(String), // Updating the window buffer failed
    #[error("Camera init error: {0}")]
    CameraInit(String), // Opening/starting the camera failed
    #[error("Camera frame error: {0}")]
    CameraFrame(String), // Grabbing/decoding a frame failed

    #[error("Failed to read theme file: {0}")]
    ThemeRead(#[from] std::io::Error),
    #[error("Failed to parse theme: {0}")]
    ThemeParse(#[from] serde_json::Error),

    /// A buffer's length no longer matches the field dimensions (stale after a resize).
    #[error("Buffer size mismatch: expected {expected} cells, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
