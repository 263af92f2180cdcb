use crate::asset_pool::ImageAsset;
use crate::device_display::interface::DeviceDisplay;
use std::error::Error;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    Show(usize),
    Hide,
}

/// Records every call with the time it happened.
#[derive(Clone, Default)]
pub struct DeviceDisplayFake {
    visible: Option<usize>,
    fail_show: bool,
    history: Arc<Mutex<Vec<(DisplayCall, Instant)>>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `show_image` call fails, as an unplugged screen would.
    pub fn failing_show() -> Self {
        Self {
            fail_show: true,
            ..Self::default()
        }
    }

    /// Shared view of the history, readable after the display moved into the runtime.
    pub fn history_handle(&self) -> Arc<Mutex<Vec<(DisplayCall, Instant)>>> {
        Arc::clone(&self.history)
    }

    fn record(&self, call: DisplayCall) {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((call, Instant::now()));
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn show_image(
        &mut self,
        index: usize,
        _image: &ImageAsset,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.fail_show {
            return Err("display unavailable".into());
        }
        self.visible = Some(index);
        self.record(DisplayCall::Show(index));
        Ok(())
    }

    fn hide_image(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.visible = None;
        self.record(DisplayCall::Hide);
        Ok(())
    }

    fn visible_image(&self) -> Option<usize> {
        self.visible
    }
}
