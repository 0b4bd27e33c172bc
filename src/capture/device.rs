//! Frame sources. The capture loop talks to [`CaptureDevice`] only, so
//! tests can feed scripted frames without hardware.

use crate::errors::FrameReadError;
use crate::Frame;

/// A live source of RGB frames.
pub trait CaptureDevice {
    /// Block until the next frame is available.
    fn read_frame(&mut self) -> Result<Frame, FrameReadError>;
}

#[cfg(feature = "camera")]
pub use webcam::Webcam;

#[cfg(feature = "camera")]
mod webcam {
    use super::*;
    use crate::errors::DeviceError;
    use nokhwa::pixel_format::RgbFormat;
    use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
    use nokhwa::Camera;
    use tracing::info;

    /// Default system webcam via nokhwa's native backend.
    pub struct Webcam {
        camera: Camera,
    }

    impl Webcam {
        pub fn open(index: u32) -> Result<Webcam, DeviceError> {
            let requested =
                RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
            let mut camera = Camera::new(CameraIndex::Index(index), requested).map_err(|e| {
                DeviceError::OpenFailed {
                    index,
                    reason: e.to_string(),
                }
            })?;
            camera.open_stream().map_err(|e| DeviceError::OpenFailed {
                index,
                reason: e.to_string(),
            })?;
            let fmt = camera.camera_format();
            info!(index, width = fmt.width(), height = fmt.height(), "camera opened");
            Ok(Webcam { camera })
        }
    }

    impl CaptureDevice for Webcam {
        fn read_frame(&mut self) -> Result<Frame, FrameReadError> {
            let buffer = self.camera.frame().map_err(|e| FrameReadError {
                reason: e.to_string(),
            })?;
            buffer
                .decode_image::<RgbFormat>()
                .map_err(|e| FrameReadError {
                    reason: e.to_string(),
                })
        }
    }
}
