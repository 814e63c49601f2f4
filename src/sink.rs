// Frame sinks: where rendered frames end up besides the window.

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use log::info;

use crate::error::Error;
use crate::types::FrameBuffer;

pub trait FrameSink {
    fn write(&mut self, frame: &FrameBuffer) -> Result<(), Error>;
}

/// Writes `frame_000000.<ext>`, `frame_000001.<ext>`, ... into a directory.
pub struct ImageSequenceSink {
    dir: PathBuf,
    format: ImageFormat,
    ext: &'static str,
    written: u64,
}

impl ImageSequenceSink {
    /// `encoding` is a file extension such as `png`, `jpg` or `bmp`.
    pub fn create(dir: &Path, encoding: &str) -> Result<Self, Error> {
        let format = ImageFormat::from_extension(encoding)
            .filter(|f| f.writing_enabled())
            .ok_or_else(|| Error::SinkOpen(format!("unsupported output format '{encoding}'")))?;
        let ext = format
            .extensions_str()
            .first()
            .copied()
            .ok_or_else(|| Error::SinkOpen(format!("no extension for {format:?}")))?;

        fs::create_dir_all(dir)
            .map_err(|e| Error::SinkOpen(format!("{}: {e}", dir.display())))?;
        info!("writing {ext} frames to {}", dir.display());
        Ok(Self { dir: dir.to_path_buf(), format, ext, written: 0 })
    }

    pub fn frames_written(&self) -> u64 {
        self.written
    }
}

impl FrameSink for ImageSequenceSink {
    fn write(&mut self, frame: &FrameBuffer) -> Result<(), Error> {
        let path = self.dir.join(format!("frame_{:06}.{}", self.written, self.ext));
        frame
            .to_rgb_image()
            .save_with_format(&path, self.format)
            .map_err(|e| Error::SinkWrite(format!("{}: {e}", path.display())))?;
        self.written += 1;
        Ok(())
    }
}
