// Command-line surface and the validated runtime configuration built from it.

use std::path::PathBuf;

use clap::Parser;

use crate::error::Error;
use crate::session::SessionConfig;
use crate::tracker::TemplateTrackerConfig;
use crate::types::{Point, Size};

#[derive(Parser, Debug, Clone)]
#[command(name = "roi-tracker", about = "Draw a box around something in a live video and follow it")]
pub struct Args {
    /// Camera index (used when no --input is given)
    #[arg(long, value_name = "INDEX", conflicts_with = "input")]
    pub camera: Option<u32>,
    /// Directory of still frames, or an animated .gif
    #[arg(long, value_name = "PATH")]
    pub input: Option<PathBuf>,
    /// Directory that receives the rendered frames
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,
    /// Output encoding (image file extension)
    #[arg(long, default_value = "png")]
    pub format: String,
    #[arg(long, default_value_t = 1024)]
    pub width: i32,
    #[arg(long, default_value_t = 800)]
    pub height: i32,
    #[arg(long, default_value_t = 320)]
    pub preview_width: i32,
    #[arg(long, default_value_t = 460)]
    pub preview_height: i32,
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub preview_x: i32,
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub preview_y: i32,
    /// How far (px) the target may move between frames
    #[arg(long, default_value_t = 32)]
    pub search_radius: i32,
    /// Give up on a target after this many consecutive lost frames (default: never)
    #[arg(long)]
    pub max_lost_frames: Option<u32>,
    /// Window refresh rate; also bounds how long each iteration waits for input
    #[arg(long, default_value_t = 50)]
    pub fps: usize,
    /// Hide the status line
    #[arg(long)]
    pub no_hud: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Camera(u32),
    Path(PathBuf),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input: InputSource,
    pub output: Option<PathBuf>,
    pub format: String,
    pub session: SessionConfig,
    pub tracker: TemplateTrackerConfig,
    pub fps: usize,
    pub hud: bool,
}

impl TryFrom<Args> for Config {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self, Error> {
        let positive = |name: &str, v: i32| {
            if v > 0 { Ok(v) } else { Err(Error::Config(format!("--{name} must be > 0 (got {v})"))) }
        };
        let frame = Size::new(positive("width", args.width)?, positive("height", args.height)?);
        let preview_size = Size::new(
            positive("preview-width", args.preview_width)?,
            positive("preview-height", args.preview_height)?,
        );
        let search_radius = positive("search-radius", args.search_radius)?;
        if args.fps == 0 {
            return Err(Error::Config("--fps must be > 0".into()));
        }
        if args.max_lost_frames == Some(0) {
            return Err(Error::Config("--max-lost-frames must be > 0".into()));
        }

        let input = match args.input {
            Some(path) => InputSource::Path(path),
            None => InputSource::Camera(args.camera.unwrap_or(0)),
        };

        Ok(Config {
            input,
            output: args.output,
            format: args.format,
            session: SessionConfig {
                frame,
                preview_size,
                preview_offset: Point::new(args.preview_x, args.preview_y),
                max_lost_frames: args.max_lost_frames,
            },
            tracker: TemplateTrackerConfig { search_radius, ..Default::default() },
            fps: args.fps,
            hud: !args.no_hud,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config, Error> {
        let args = Args::try_parse_from(std::iter::once("roi-tracker").chain(argv.iter().copied()))
            .map_err(|e| Error::Config(e.to_string()))?;
        Config::try_from(args)
    }

    #[test]
    fn defaults_give_1024x800_camera_session() {
        let cfg = parse(&[]).unwrap();
        assert_eq!(cfg.input, InputSource::Camera(0));
        assert_eq!(cfg.session, SessionConfig::default());
        assert_eq!(cfg.format, "png");
        assert!(cfg.hud);
        assert!(cfg.output.is_none());
    }

    #[test]
    fn input_path_and_overrides() {
        let cfg = parse(&[
            "--input", "clip.gif", "--output", "out", "--format", "jpg",
            "--width", "640", "--height", "480", "--max-lost-frames", "15", "--no-hud",
        ])
        .unwrap();
        assert_eq!(cfg.input, InputSource::Path(PathBuf::from("clip.gif")));
        assert_eq!(cfg.session.frame, Size::new(640, 480));
        assert_eq!(cfg.session.max_lost_frames, Some(15));
        assert!(!cfg.hud);
    }

    #[test]
    fn camera_and_input_conflict() {
        assert!(parse(&["--camera", "1", "--input", "x"]).is_err());
    }

    #[test]
    fn sizes_must_be_positive() {
        assert!(matches!(parse(&["--width", "0"]), Err(Error::Config(_))));
        assert!(matches!(parse(&["--preview-height", "-4"]), Err(Error::Config(_))));
        assert!(matches!(parse(&["--fps", "0"]), Err(Error::Config(_))));
        assert!(matches!(parse(&["--max-lost-frames", "0"]), Err(Error::Config(_))));
    }
}
