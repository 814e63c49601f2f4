// Frame sources. Every source hands out frames already resized to the fixed
// output size, so all rectangle math downstream happens in one coordinate space.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, Frames, ImageFormat};
use log::info;

use crate::error::Error;
use crate::types::{FrameBuffer, Size};

pub trait FrameSource {
    /// Next frame, or `Ok(None)` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, Error>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, Error> {
        (**self).next_frame()
    }
}

/// Wraps any source and resizes every frame to `size`.
pub struct Resized<S> {
    inner: S,
    size: Size,
}

impl<S: FrameSource> Resized<S> {
    pub fn new(inner: S, size: Size) -> Self {
        Self { inner, size }
    }
}

impl<S: FrameSource> FrameSource for Resized<S> {
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, Error> {
        let (w, h) = (self.size.width as usize, self.size.height as usize);
        Ok(self.inner.next_frame()?.map(|f| f.resized(w, h)))
    }
}

/// Still images in a directory, played back in file-name order.
pub struct DirectorySource {
    files: Vec<PathBuf>,
    next: usize,
}

impl DirectorySource {
    pub fn open(dir: &Path) -> Result<Self, Error> {
        let entries = fs::read_dir(dir)
            .map_err(|e| Error::SourceOpen(format!("{}: {e}", dir.display())))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| Error::SourceOpen(format!("{}: {e}", dir.display())))?
                .path();
            if path.is_file() && ImageFormat::from_path(&path).is_ok() {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(Error::SourceOpen(format!("{}: no image files", dir.display())));
        }
        files.sort();
        info!("reading {} frames from {}", files.len(), dir.display());
        Ok(Self { files, next: 0 })
    }
}

impl FrameSource for DirectorySource {
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, Error> {
        let Some(path) = self.files.get(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        let img = image::open(path)
            .map_err(|e| Error::SourceFrame(format!("{}: {e}", path.display())))?;
        Ok(Some(FrameBuffer::from_rgb_image(&img.to_rgb8())))
    }
}

/// Frames of an animated GIF.
pub struct GifSource {
    frames: Frames<'static>,
}

impl GifSource {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)
            .map_err(|e| Error::SourceOpen(format!("{}: {e}", path.display())))?;
        let decoder = GifDecoder::new(BufReader::new(file))
            .map_err(|e| Error::SourceOpen(format!("{}: {e}", path.display())))?;
        info!("reading animation {}", path.display());
        Ok(Self { frames: decoder.into_frames() })
    }
}

impl FrameSource for GifSource {
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>, Error> {
        match self.frames.next() {
            None => Ok(None),
            Some(Err(e)) => Err(Error::SourceFrame(format!("GIF frame: {e}"))),
            Some(Ok(frame)) => {
                let rgb = DynamicImage::ImageRgba8(frame.into_buffer()).to_rgb8();
                Ok(Some(FrameBuffer::from_rgb_image(&rgb)))
            }
        }
    }
}

/// Pick a file source for `path`: a directory of stills or a `.gif`.
pub fn open_path(path: &Path) -> Result<Box<dyn FrameSource>, Error> {
    if path.is_dir() {
        return Ok(Box::new(DirectorySource::open(path)?));
    }
    match ImageFormat::from_path(path) {
        Ok(ImageFormat::Gif) => Ok(Box::new(GifSource::open(path)?)),
        _ => Err(Error::SourceOpen(format!(
            "{}: expected a frame directory or a .gif",
            path.display()
        ))),
    }
}
