/// Camera lifecycle controller
///
/// Owns the capture device and walks it through the photo step:
///
///   Idle -> Live -> CountingDown(3, 2, 1) -> Captured
///                ^                              |
///                +---------- retake ------------+
///
/// The device stream is a scoped resource. Capture releases it as part
/// of freezing the frame, retake re-acquires it, and `shutdown` is the
/// unconditional release used when the wizard leaves the photo flow.
/// No path leaves the stream open without a matching stop.
use std::io::Cursor;

use image::{ImageFormat, RgbImage};

use super::device::{CameraError, CaptureDevice, Frame};
use super::{CapturedPhoto, PreviewFrame};

/// Ticks the countdown starts from.
const COUNTDOWN_START: u8 = 3;

/// Where the photo step currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPhase {
    /// No device acquired
    Idle,
    /// Device acquired, live preview running
    Live,
    /// Countdown armed; the value is the digit currently shown
    CountingDown(u8),
    /// A still has been frozen and the device released
    Captured,
}

/// What a countdown tick produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// Still counting; the digit to show
    Counting(u8),
    /// The countdown finished and this still was frozen
    Captured(CapturedPhoto),
    /// The timer fired outside a countdown; nothing to do
    Idle,
}

/// Drives one capture device through the photo step.
pub struct CameraController<D> {
    device: D,
    phase: CameraPhase,
}

impl<D: CaptureDevice> CameraController<D> {
    pub fn new(device: D) -> Self {
        CameraController {
            device,
            phase: CameraPhase::Idle,
        }
    }

    pub fn phase(&self) -> CameraPhase {
        self.phase
    }

    /// Acquire the device and start the live preview.
    ///
    /// A no-op while the preview is already running. On failure the
    /// phase is unchanged and the caller reports the error; the wizard
    /// stays on the photo step and the visitor may try again.
    pub fn start(&mut self) -> Result<(), CameraError> {
        match self.phase {
            CameraPhase::Live | CameraPhase::CountingDown(_) => Ok(()),
            CameraPhase::Idle | CameraPhase::Captured => {
                self.device.acquire()?;
                self.phase = CameraPhase::Live;
                Ok(())
            }
        }
    }

    /// Arm the 3-2-1 countdown. Ignored unless the preview is live;
    /// once armed it cannot be cancelled, only reach zero.
    pub fn begin_countdown(&mut self) {
        if self.phase == CameraPhase::Live {
            self.phase = CameraPhase::CountingDown(COUNTDOWN_START);
        }
    }

    /// Advance the countdown by one second.
    ///
    /// On the final tick the current frame is frozen at native
    /// resolution, encoded as PNG, and the device stream is stopped
    /// before the still is handed back. A grab or encode failure
    /// drops back to the live preview with the device still open.
    pub fn tick(&mut self) -> Result<Tick, CameraError> {
        match self.phase {
            CameraPhase::CountingDown(n) if n > 1 => {
                self.phase = CameraPhase::CountingDown(n - 1);
                Ok(Tick::Counting(n - 1))
            }
            CameraPhase::CountingDown(_) => match self.capture_still() {
                Ok(photo) => {
                    self.device.release();
                    self.phase = CameraPhase::Captured;
                    println!("📸 Captured photo: {}x{}", photo.width, photo.height);
                    Ok(Tick::Captured(photo))
                }
                Err(e) => {
                    self.phase = CameraPhase::Live;
                    Err(e)
                }
            },
            _ => Ok(Tick::Idle),
        }
    }

    /// Discard the still and go back to the live preview.
    ///
    /// The device was released at capture time, so this re-acquires
    /// it; there is never a moment with two locks. On failure the
    /// phase stays `Captured` and the caller reports the error.
    pub fn retake(&mut self) -> Result<(), CameraError> {
        if self.phase != CameraPhase::Captured {
            return Ok(());
        }
        self.device.acquire()?;
        self.phase = CameraPhase::Live;
        Ok(())
    }

    /// Release the device unconditionally. Used when the wizard
    /// leaves the photo flow or resets. Safe in every phase.
    pub fn shutdown(&mut self) {
        self.device.release();
        self.phase = CameraPhase::Idle;
    }

    /// Grab an RGBA frame for the preview widget while the stream is
    /// live. Preview glitches are not worth interrupting the visitor,
    /// so failures come back as None.
    pub fn preview_frame(&mut self) -> Option<PreviewFrame> {
        match self.phase {
            CameraPhase::Live | CameraPhase::CountingDown(_) => {
                let frame = self.device.grab_frame().ok()?;
                Some(expand_rgba(frame))
            }
            _ => None,
        }
    }

    fn capture_still(&mut self) -> Result<CapturedPhoto, CameraError> {
        let frame = self.device.grab_frame()?;
        encode_png(frame)
    }
}

fn expand_rgba(frame: Frame) -> PreviewFrame {
    let mut rgba = Vec::with_capacity(frame.rgb.len() / 3 * 4);
    for pixel in frame.rgb.chunks_exact(3) {
        rgba.extend_from_slice(pixel);
        rgba.push(0xFF);
    }
    PreviewFrame {
        width: frame.width,
        height: frame.height,
        rgba,
    }
}

fn encode_png(frame: Frame) -> Result<CapturedPhoto, CameraError> {
    let width = frame.width;
    let height = frame.height;
    let buffer: RgbImage = RgbImage::from_raw(width, height, frame.rgb)
        .ok_or_else(|| CameraError::Encode("frame buffer does not match its dimensions".to_string()))?;

    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(buffer)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| CameraError::Encode(e.to_string()))?;

    Ok(CapturedPhoto { width, height, png })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A scripted device that counts lifecycle calls.
    struct FakeDevice {
        acquired: bool,
        acquires: usize,
        releases: usize,
        fail_acquire: bool,
        fail_grab: bool,
    }

    impl FakeDevice {
        fn new() -> Self {
            FakeDevice {
                acquired: false,
                acquires: 0,
                releases: 0,
                fail_acquire: false,
                fail_grab: false,
            }
        }
    }

    impl CaptureDevice for FakeDevice {
        fn acquire(&mut self) -> Result<(), CameraError> {
            if self.fail_acquire {
                return Err(CameraError::Access("denied".to_string()));
            }
            if !self.acquired {
                self.acquired = true;
                self.acquires += 1;
            }
            Ok(())
        }

        fn grab_frame(&mut self) -> Result<Frame, CameraError> {
            if !self.acquired {
                return Err(CameraError::Access("camera is not acquired".to_string()));
            }
            if self.fail_grab {
                return Err(CameraError::Frame("timeout".to_string()));
            }
            Ok(Frame {
                width: 2,
                height: 2,
                rgb: vec![10; 12],
            })
        }

        fn release(&mut self) {
            if self.acquired {
                self.acquired = false;
                self.releases += 1;
            }
        }

        fn is_acquired(&self) -> bool {
            self.acquired
        }
    }

    fn live_controller() -> CameraController<FakeDevice> {
        let mut controller = CameraController::new(FakeDevice::new());
        controller.start().unwrap();
        controller
    }

    #[test]
    fn test_start_acquires_exactly_once() {
        let mut controller = live_controller();
        assert_eq!(controller.phase(), CameraPhase::Live);

        // Entering the step again must not take a second lock.
        controller.start().unwrap();
        assert_eq!(controller.device.acquires, 1);
    }

    #[test]
    fn test_start_failure_stays_idle() {
        let mut device = FakeDevice::new();
        device.fail_acquire = true;
        let mut controller = CameraController::new(device);

        assert!(controller.start().is_err());
        assert_eq!(controller.phase(), CameraPhase::Idle);
        assert!(!controller.device.is_acquired());
    }

    #[test]
    fn test_countdown_runs_three_two_one_then_captures() {
        let mut controller = live_controller();
        controller.begin_countdown();
        assert_eq!(controller.phase(), CameraPhase::CountingDown(3));

        assert_eq!(controller.tick().unwrap(), Tick::Counting(2));
        assert_eq!(controller.tick().unwrap(), Tick::Counting(1));

        let tick = controller.tick().unwrap();
        let photo = match tick {
            Tick::Captured(photo) => photo,
            other => panic!("expected a captured still, got {:?}", other),
        };
        assert_eq!(controller.phase(), CameraPhase::Captured);
        assert_eq!((photo.width, photo.height), (2, 2));

        // The still is a decodable PNG at the frame's native size.
        let decoded = image::load_from_memory(&photo.png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (2, 2));
    }

    #[test]
    fn test_capture_releases_the_device() {
        let mut controller = live_controller();
        controller.begin_countdown();
        for _ in 0..3 {
            controller.tick().unwrap();
        }
        assert!(!controller.device.is_acquired());
        assert_eq!(controller.device.releases, 1);
    }

    #[test]
    fn test_retake_reacquires_after_release() {
        let mut controller = live_controller();
        controller.begin_countdown();
        for _ in 0..3 {
            controller.tick().unwrap();
        }

        // The prior release is what makes this second acquire succeed.
        controller.retake().unwrap();
        assert_eq!(controller.phase(), CameraPhase::Live);
        assert_eq!(controller.device.acquires, 2);
        assert_eq!(controller.device.releases, 1);
        assert!(controller.device.is_acquired());
    }

    #[test]
    fn test_begin_countdown_requires_live_preview() {
        let mut controller = CameraController::new(FakeDevice::new());
        controller.begin_countdown();
        assert_eq!(controller.phase(), CameraPhase::Idle);
        assert_eq!(controller.tick().unwrap(), Tick::Idle);
    }

    #[test]
    fn test_failed_capture_keeps_stream_for_another_try() {
        let mut controller = live_controller();
        controller.begin_countdown();
        controller.tick().unwrap();
        controller.tick().unwrap();

        controller.device.fail_grab = true;
        assert!(controller.tick().is_err());
        assert_eq!(controller.phase(), CameraPhase::Live);
        assert!(controller.device.is_acquired());

        controller.device.fail_grab = false;
        controller.begin_countdown();
        controller.tick().unwrap();
        controller.tick().unwrap();
        assert!(matches!(controller.tick().unwrap(), Tick::Captured(_)));
    }

    #[test]
    fn test_shutdown_releases_in_any_phase() {
        let mut controller = live_controller();
        controller.shutdown();
        assert_eq!(controller.phase(), CameraPhase::Idle);
        assert_eq!(controller.device.releases, 1);

        // Already idle: no double release.
        controller.shutdown();
        assert_eq!(controller.device.releases, 1);
    }

    #[test]
    fn test_preview_only_while_stream_is_live() {
        let mut controller = CameraController::new(FakeDevice::new());
        assert!(controller.preview_frame().is_none());

        controller.start().unwrap();
        let preview = controller.preview_frame().unwrap();
        assert_eq!((preview.width, preview.height), (2, 2));
        // RGB expanded to RGBA, alpha opaque.
        assert_eq!(preview.rgba.len(), 16);
        assert_eq!(preview.rgba[3], 0xFF);

        controller.begin_countdown();
        assert!(controller.preview_frame().is_some());

        controller.shutdown();
        assert!(controller.preview_frame().is_none());
    }
}
