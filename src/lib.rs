pub mod capture;
pub mod core;
pub mod shared;

use std::path::Path;

use crate::capture::{ButtonSource, CaptureService, FrameSource, MonotonicClock, RawDumpSource, SdCardFs, BITMAP_DIR};
use crate::core::logging::init_logging;
use crate::core::settings::{load_settings, AppSettings};
use crate::shared::errors::AppError;

/// Runs the capture service until the button source closes.
///
/// A failed commit ends the process with exit status 1.
pub fn run() {
    let logging = init_logging();
    let settings = load_settings();

    if let Err(e) = serve(&settings) {
        tracing::error!(target: "system", "Capture service stopped: {}", e);
        eprintln!("holdshot: {}", e);
        // Flush the log files before exiting
        drop(logging);
        std::process::exit(1);
    }

    tracing::info!(target: "system", "Capture service exited");
}

fn serve(settings: &AppSettings) -> Result<(), AppError> {
    let fs = SdCardFs::new(settings.storage_root())?;
    tracing::info!(target: "system", "Captures go to {:?}", fs.resolve(Path::new(BITMAP_DIR)));

    match &settings.frame_dump {
        Some(path) => {
            tracing::info!(target: "system", "Capturing from frame dump {:?}", path);
            serve_with(RawDumpSource::new(path), fs, settings)
        }
        None => serve_screen(fs, settings),
    }
}

#[cfg(feature = "desktop")]
fn serve_screen(fs: SdCardFs, settings: &AppSettings) -> Result<(), AppError> {
    tracing::info!(target: "system", "Capturing from the primary monitor");
    serve_with(capture::stream::ScreenSource::new(), fs, settings)
}

#[cfg(not(feature = "desktop"))]
fn serve_screen(_fs: SdCardFs, _settings: &AppSettings) -> Result<(), AppError> {
    Err(AppError::NoFrameSource(shared::paths::get_settings_path()))
}

fn serve_with<S: FrameSource>(source: S, fs: SdCardFs, settings: &AppSettings) -> Result<(), AppError> {
    let mut button = button_source(settings)?;
    let mut service = CaptureService::new(source, fs, MonotonicClock::new());
    service.run(&mut button)?;
    Ok(())
}

#[cfg(all(feature = "desktop", target_os = "linux"))]
fn button_source(settings: &AppSettings) -> Result<impl ButtonSource, AppError> {
    let hotkey = crate::core::settings::parse_hotkey(&settings.hotkey)?;
    Ok(capture::button::HotkeyButton::register(hotkey)?)
}

/// Each line on stdin is one button edge, alternating press and release.
/// End of input closes the source.
#[cfg(not(all(feature = "desktop", target_os = "linux")))]
fn button_source(_settings: &AppSettings) -> Result<impl ButtonSource, AppError> {
    let (tx, rx) = crossbeam_channel::unbounded();

    std::thread::spawn(move || {
        capture::button::forward_line_edges(std::io::stdin().lock(), &tx);
    });

    tracing::info!(target: "system", "Reading capture button edges from stdin");
    Ok(capture::ChannelButton::new(rx))
}
