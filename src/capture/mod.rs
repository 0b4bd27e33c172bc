//! Live capture session: grab frames, trace outlines, overlay them, and
//! turn snapshots into a rebuilt model plus a fresh preview process.
//!
//! The orchestrator is generic over its three collaborators so the whole
//! loop runs under test with scripted devices and no hardware.

pub mod device;
pub mod display;
pub mod overlay;
pub mod session;

use crate::build::{build_model, BuildConfig};
use crate::contour::{extract_outlines, ContourConfig};
use crate::errors::{BuildError, DisplayError};
use device::CaptureDevice;
use display::{Command, OverlayDisplay};
use session::{PreviewLauncher, PreviewSupervisor};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub contour: ContourConfig,
    pub build: BuildConfig,
}

/// What a single loop iteration did, mostly for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Shown,
    Snapshot,
    SnapshotRejected,
    Quit,
}

pub struct Orchestrator<D, O, L>
where
    D: CaptureDevice,
    O: OverlayDisplay,
    L: PreviewLauncher,
{
    device: D,
    display: O,
    supervisor: PreviewSupervisor<L>,
    config: SessionConfig,
}

impl<D, O, L> Orchestrator<D, O, L>
where
    D: CaptureDevice,
    O: OverlayDisplay,
    L: PreviewLauncher,
{
    pub fn new(device: D, display: O, launcher: L, config: SessionConfig) -> Self {
        Orchestrator {
            device,
            display,
            supervisor: PreviewSupervisor::new(launcher),
            config,
        }
    }

    /// Run until the operator quits or a frame read fails.
    pub fn run(&mut self) -> Result<(), DisplayError> {
        info!("capture session started");
        loop {
            if self.tick()? == Tick::Quit {
                break;
            }
        }
        self.supervisor.shutdown();
        info!("capture session ended");
        Ok(())
    }

    /// One loop iteration: read, trace, overlay, handle at most one
    /// command. Keypresses arriving while a snapshot is in flight were
    /// never seen by the window and are simply dropped. A failed frame
    /// read ends the session gracefully; it is not retried.
    pub fn tick(&mut self) -> Result<Tick, DisplayError> {
        let mut frame = match self.device.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "frame read failed, ending session");
                return Ok(Tick::Quit);
            }
        };

        let outlines = extract_outlines(&frame, &self.config.contour);
        overlay::draw_outlines(&mut frame, &outlines);

        match self.display.show(&frame)? {
            Some(Command::Quit) => Ok(Tick::Quit),
            Some(Command::Snapshot) => {
                if self.snapshot(&outlines) {
                    Ok(Tick::Snapshot)
                } else {
                    Ok(Tick::SnapshotRejected)
                }
            }
            None => Ok(Tick::Shown),
        }
    }

    /// Build and export the snapshot, then restart the preview on the
    /// new file. The old preview dies before the file is rewritten so a
    /// reader never sees a half-written model; a failed build returns
    /// before the teardown and leaves the running preview alone.
    fn snapshot(&mut self, outlines: &[crate::contour::Outline]) -> bool {
        let mesh = match build_model(outlines, &self.config.build) {
            Ok(mesh) => mesh,
            Err(BuildError::NoShapes) => {
                warn!("snapshot ignored: no shapes in view");
                return false;
            }
            Err(e) => {
                error!(error = %e, "snapshot rejected");
                return false;
            }
        };

        self.supervisor.shutdown();

        #[cfg(feature = "stl-io")]
        if let Err(e) = crate::build::export_model(&mesh, &self.config.build.model_path) {
            error!(error = %e, "model export failed");
            return false;
        }
        info!(
            solids = outlines.len(),
            triangles = mesh.triangles().len(),
            path = %self.config.build.model_path.display(),
            "snapshot exported"
        );

        if let Err(e) = self.supervisor.restart(&self.config.build.model_path) {
            error!(error = %e, "preview launch failed");
        }
        true
    }
}
