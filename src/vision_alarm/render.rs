use crate::asset_pool::AssetPool;
use crate::device_display::interface::DeviceDisplay;
use crate::library::logger::interface::Logger;
use crate::vision_alarm::core::Model;
use std::sync::{Arc, Mutex};

/// Brings the overlay in line with the model. Only touches the display when
/// the visible image has to change.
#[derive(Clone)]
pub struct Render {
    device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
    asset_pool: Arc<AssetPool>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Render {
    pub fn new(
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        asset_pool: Arc<AssetPool>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            device_display,
            asset_pool,
            logger,
        }
    }

    pub fn render(&self, model: &Model) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut device_display = self.device_display.lock().map_err(|e| e.to_string())?;

        match (model.feedback.overlay_image(), device_display.visible_image()) {
            (Some(wanted), visible) if visible != Some(wanted) => {
                let image = self
                    .asset_pool
                    .image(wanted)
                    .ok_or_else(|| format!("no image at index {}", wanted))?;
                self.logger.info(&format!("Showing {}", image.name))?;
                device_display.show_image(wanted, image)?;
            }
            (None, Some(_)) => {
                self.logger.info("Hiding overlay")?;
                device_display.hide_image()?;
            }
            _ => {}
        }

        Ok(())
    }
}
