// What you SEE:
// • The video (camera or file) plays in a window at a fixed size.
// • Hold Left Mouse and drag: a white box follows the drag.
// • Release: the boxed object is tracked (red box) and a magnified copy
//   sits in the top-left corner.
// • Drag again at any time to pick a new target. ESC or Q quits.

use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use log::{error, info, warn};

use roi_tracker::camera::CameraCapture;
use roi_tracker::config::{Args, Config, InputSource};
use roi_tracker::draw::{compose, draw_crosshair, draw_text_5x7, Drawer};
use roi_tracker::sink::{FrameSink, ImageSequenceSink};
use roi_tracker::source::{self, FrameSource, Resized};
use roi_tracker::{Error, TemplateTracker, TrackingSession};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Config::try_from(Args::parse()).and_then(run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config) -> Result<(), Error> {
    let frame = config.session.frame;

    /* --- Setup: anything failing here ends the process before the loop --- */
    let raw: Box<dyn FrameSource> = match &config.input {
        InputSource::Camera(index) => {
            Box::new(CameraCapture::new(*index, frame.width as u32, frame.height as u32)?)
        }
        InputSource::Path(path) => source::open_path(path)?,
    };
    let mut frames = Resized::new(raw, frame);

    let mut sink = match &config.output {
        Some(dir) => Some(ImageSequenceSink::create(dir, &config.format)?),
        None => None,
    };

    let tracker = TemplateTracker::new(config.tracker)?;
    let mut session = TrackingSession::new(tracker, config.session);

    let mut drawer = Drawer::new(
        "ROI Tracker",
        frame.width as usize,
        frame.height as usize,
        config.fps,
    )?;
    info!("output {}x{}; drag with the left button to select a target", frame.width, frame.height);

    /* --- FPS for HUD + log --- */
    let mut last_fps_time = Instant::now();
    let mut frames_this_second: u32 = 0;
    let mut hud_fps_text = String::from("FPS: 0.0");

    /* ------------------------------ Main loop ------------------------------ */
    while !drawer.quit_requested() {
        // 1) Fresh frame, owned by this iteration only.
        let live = match frames.next_frame() {
            Ok(Some(f)) => f,
            Ok(None) => {
                info!("end of stream");
                break;
            }
            Err(e) => {
                warn!("frame acquisition failed, stopping: {e}");
                break;
            }
        };

        // 2) Pointer input collected since the last present.
        for event in drawer.poll_pointer() {
            session.on_pointer(event);
        }

        // 3) Preview / init / update, then burn overlays into a copy.
        let overlays = session.step(&live);
        let mut screen = compose(&live, &overlays);

        // 4) Persist the tracked frame (no cursor or HUD in the file).
        if let Some(sink) = sink.as_mut() {
            if let Err(e) = sink.write(&screen) {
                warn!("{e}");
            }
        }

        // 5) Window-only decorations.
        if let Some(p) = drawer.pointer_pos() {
            draw_crosshair(&mut screen, p.x, p.y, 12, 0x00_FF_CC_33);
        }
        if config.hud {
            let hud = format!("{} | {}", session.state().label(), hud_fps_text);
            draw_text_5x7(&mut screen, 8, (frame.height - 16).max(0), &hud, 0x00_FF_FF_FF);
        }

        // 6) Present; this also waits out the rest of the frame budget.
        if let Err(e) = drawer.present(&screen) {
            warn!("{e}");
        }

        // 7) FPS counter (log + HUD once per second)
        frames_this_second += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let secs = now.duration_since(last_fps_time).as_secs_f32();
            let fps = frames_this_second as f32 / secs;
            info!("FPS: {fps:.1}");
            hud_fps_text = format!("FPS: {fps:.1}");
            frames_this_second = 0;
            last_fps_time = now;
        }
    }

    if let Some(sink) = &sink {
        info!("wrote {} frames", sink.frames_written());
    }
    Ok(())
}
