/// Camera capture module
///
/// This module handles:
/// - Acquiring and releasing the capture device (device.rs)
/// - The live preview / countdown / captured lifecycle (controller.rs)
/// - Encoding the frozen frame as an embeddable PNG
///
/// The device sits behind the `CaptureDevice` trait so the controller's
/// acquisition lifecycle can be tested without hardware.

pub mod controller;
pub mod device;

pub use controller::{CameraController, CameraPhase, Tick};
pub use device::{CameraError, CaptureDevice, Frame, SystemCamera};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// A frozen still, encoded and ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    /// Native width of the video frame
    pub width: u32,
    /// Native height of the video frame
    pub height: u32,
    /// PNG-encoded image data
    pub png: Vec<u8>,
}

impl CapturedPhoto {
    /// The embeddable form the backend stores: a base64 data URL.
    pub fn to_data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// An RGBA frame for the live preview widget.
#[derive(Debug, Clone)]
pub struct PreviewFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_prefix_and_padding() {
        let photo = CapturedPhoto {
            width: 1,
            height: 1,
            png: vec![0x89, b'P', b'N', b'G'],
        };
        let url = photo.to_data_url();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(url, "data:image/png;base64,iVBORw==");
    }
}
