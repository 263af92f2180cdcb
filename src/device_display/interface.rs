use crate::asset_pool::ImageAsset;
use std::error::Error;

/// Presents the feedback overlay on top of the camera preview.
pub trait DeviceDisplay: Send + Sync {
    /// Reveal `image` over the preview, replacing any visible overlay.
    fn show_image(
        &mut self,
        index: usize,
        image: &ImageAsset,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn hide_image(&mut self) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Pool index of the overlay currently shown, if any.
    fn visible_image(&self) -> Option<usize>;
}
