use image::DynamicImage;
use std::sync::mpsc::Receiver;

/// Row-major 3x3 intrinsic matrix reported by the camera for a frame.
pub type CameraIntrinsics = [[f32; 3]; 3];

/// One camera sample, already converted to RGB8 and rotated upright.
#[derive(Clone, PartialEq)]
pub struct Frame {
    pub image: DynamicImage,
    pub intrinsics: Option<CameraIntrinsics>,
}

impl Frame {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image: DynamicImage::ImageRgb8(image.to_rgb8()),
            intrinsics: None,
        }
    }

    pub fn with_intrinsics(mut self, intrinsics: CameraIntrinsics) -> Self {
        self.intrinsics = Some(intrinsics);
        self
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .field("intrinsics", &self.intrinsics.is_some())
            .finish()
    }
}

pub trait DeviceCamera {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// Frames pushed at camera rate. The receiver disconnects once the
    /// camera stops; it cannot be restarted.
    fn frames(&self) -> Receiver<Frame>;
}
