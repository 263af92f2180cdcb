use crate::asset_pool::ImageAsset;
use crate::device_display::interface::DeviceDisplay;
use crate::library::logger::interface::Logger;
use std::error::Error;
use std::sync::Arc;

pub struct DeviceDisplayConsole {
    visible: Option<usize>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceDisplayConsole {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            visible: None,
            logger: logger.with_namespace("display").with_namespace("console"),
        }
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn show_image(
        &mut self,
        index: usize,
        image: &ImageAsset,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.visible = Some(index);
        self.logger.info(&format!(
            "┌ overlay ┐ {} ({}x{})",
            image.name,
            image.image.width(),
            image.image.height()
        ))?;
        Ok(())
    }

    fn hide_image(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.visible = None;
        self.logger.info("└ overlay hidden ┘")?;
        Ok(())
    }

    fn visible_image(&self) -> Option<usize> {
        self.visible
    }
}
