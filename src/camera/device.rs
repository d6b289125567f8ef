/// Capture device access
///
/// `SystemCamera` wraps the platform webcam. Acquisition opens the
/// device stream; release closes it so the hardware lock is never
/// held longer than the capture flow needs it.
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;

/// What can go wrong while talking to the camera.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    /// The device was denied, missing or failed to open
    #[error("Error accessing camera: {0}")]
    Access(String),
    /// The stream produced no usable frame
    #[error("Camera frame error: {0}")]
    Frame(String),
    /// The captured frame could not be encoded as an image
    #[error("Could not encode the captured photo: {0}")]
    Encode(String),
}

/// One RGB frame at the video's native resolution.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGB8 pixels, row major
    pub rgb: Vec<u8>,
}

/// A live video capture device.
///
/// Implementations own at most one device lock. `acquire` on an
/// already-acquired device is a no-op, never a second lock.
pub trait CaptureDevice {
    /// Open the device stream. Idempotent while acquired.
    fn acquire(&mut self) -> Result<(), CameraError>;

    /// Grab the current frame. Fails when the device is not acquired.
    fn grab_frame(&mut self) -> Result<Frame, CameraError>;

    /// Close the device stream and drop the hardware lock.
    /// Safe to call when not acquired.
    fn release(&mut self);

    /// Whether the device stream is currently open.
    fn is_acquired(&self) -> bool;
}

/// The default webcam, video only.
#[derive(Default)]
pub struct SystemCamera {
    camera: Option<Camera>,
}

impl SystemCamera {
    pub fn new() -> Self {
        SystemCamera { camera: None }
    }
}

impl CaptureDevice for SystemCamera {
    fn acquire(&mut self) -> Result<(), CameraError> {
        if self.camera.is_some() {
            return Ok(());
        }

        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution);
        let mut camera = Camera::new(CameraIndex::Index(0), requested)
            .map_err(|e| CameraError::Access(e.to_string()))?;
        camera
            .open_stream()
            .map_err(|e| CameraError::Access(e.to_string()))?;

        let resolution = camera.resolution();
        println!("📷 Camera stream opened: {}x{}", resolution.width(), resolution.height());

        self.camera = Some(camera);
        Ok(())
    }

    fn grab_frame(&mut self) -> Result<Frame, CameraError> {
        let camera = self
            .camera
            .as_mut()
            .ok_or_else(|| CameraError::Access("camera is not acquired".to_string()))?;

        let buffer = camera.frame().map_err(|e| CameraError::Frame(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| CameraError::Frame(e.to_string()))?;

        let (width, height) = decoded.dimensions();
        Ok(Frame {
            width,
            height,
            rgb: decoded.into_raw(),
        })
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                eprintln!("⚠️  Error stopping camera stream: {}", e);
            } else {
                println!("📷 Camera stream stopped");
            }
        }
    }

    fn is_acquired(&self) -> bool {
        self.camera.is_some()
    }
}
