//! Live session entry point.
//!
//! Invoked with no arguments it runs the interactive capture loop.
//! Invoked as `contourcast preview <model.stl>` it becomes the isolated
//! preview renderer; the capture loop spawns it that way on every
//! snapshot.

use contourcast::capture::device::Webcam;
use contourcast::capture::display::OverlayWindow;
use contourcast::capture::session::ExeLauncher;
use contourcast::capture::{Orchestrator, SessionConfig};
use contourcast::preview::viewer::run_preview;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

const CAMERA_INDEX: u32 = 0;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None => run_live(),
        Some("preview") => {
            let Some(path) = args.next() else {
                eprintln!("usage: contourcast preview <model.stl>");
                return ExitCode::from(2);
            };
            run_preview_mode(PathBuf::from(path))
        }
        Some(other) => {
            eprintln!("unknown mode {other:?}; usage: contourcast [preview <model.stl>]");
            ExitCode::from(2)
        }
    }
}

fn run_live() -> ExitCode {
    let device = match Webcam::open(CAMERA_INDEX) {
        Ok(device) => device,
        Err(e) => {
            error!(error = %e, "startup failed");
            return ExitCode::FAILURE;
        }
    };
    let display = match OverlayWindow::new(640, 480) {
        Ok(display) => display,
        Err(e) => {
            error!(error = %e, "startup failed");
            return ExitCode::FAILURE;
        }
    };

    let mut orchestrator =
        Orchestrator::new(device, display, ExeLauncher, SessionConfig::default());
    match orchestrator.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "session failed");
            ExitCode::FAILURE
        }
    }
}

fn run_preview_mode(path: PathBuf) -> ExitCode {
    match run_preview(&path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "preview failed");
            ExitCode::FAILURE
        }
    }
}
