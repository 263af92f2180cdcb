use crate::asset_pool::AssetPool;
use crate::config::Config;
use crate::device_camera::interface::DeviceCamera;
use crate::device_display::interface::DeviceDisplay;
use crate::device_speaker::interface::DeviceSpeaker;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use crate::vision_alarm::core::Msg;
use crate::vision_alarm::feedback::PollId;
use crate::vision_alarm::render::Render;
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct VisionAlarm {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub device_camera: Arc<dyn DeviceCamera + Send + Sync>,
    pub device_speaker: Arc<dyn DeviceSpeaker + Send + Sync>,
    pub image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    pub asset_pool: Arc<AssetPool>,
    pub render: Render,
    pub msg_sender: Sender<Msg>,
    pub msg_receiver: Arc<Mutex<Receiver<Msg>>>,
    /// Cancel handles of the running playback polls.
    pub polls: Arc<Mutex<HashMap<PollId, Sender<()>>>>,
}

impl VisionAlarm {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        device_camera: Arc<dyn DeviceCamera + Send + Sync>,
        device_speaker: Arc<dyn DeviceSpeaker + Send + Sync>,
        device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        asset_pool: Arc<AssetPool>,
    ) -> Self {
        let (msg_sender, msg_receiver) = channel();
        let logger = logger.with_namespace("vision_alarm");
        let render = Render::new(device_display, Arc::clone(&asset_pool), logger.clone());

        Self {
            config,
            logger,
            device_camera,
            device_speaker,
            image_classifier,
            asset_pool,
            render,
            msg_sender,
            msg_receiver: Arc::new(Mutex::new(msg_receiver)),
            polls: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn send(&self, msg: Msg) {
        // The loop holds its own receiver for as long as `self` lives.
        let _ = self.msg_sender.send(msg);
    }
}
