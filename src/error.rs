// Crate error type. Every variant states *where* things went wrong.
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
    CameraFrame(String), // Grabbing/decoding a camera frame failed
    #[error("Source open error: {0}")]
    SourceOpen(String), // Input file/directory could not be opened
    #[error("Source frame error: {0}")]
    SourceFrame(String), // Decoding a frame from a file source failed
    #[error("Sink open error: {0}")]
    SinkOpen(String), // Output destination could not be prepared
    #[error("Sink write error: {0}")]
    SinkWrite(String), // Encoding/writing one output frame failed
    #[error("Tracker init error: {0}")]
    TrackerInit(String), // Tracker capability could not be constructed
    #[error("Config error: {0}")]
    Config(String), // Command-line values rejected
}
