use asset_pool::AssetPool;
use config::{ClassifierKind, Config, DisplayKind, SpeakerKind};
use device_camera::impl_fake::DeviceCameraFake;
use device_display::impl_console::DeviceDisplayConsole;
use device_display::impl_gui::{run_window, DeviceDisplayGui};
use device_display::interface::DeviceDisplay;
use device_speaker::impl_fake::DeviceSpeakerFake;
use device_speaker::interface::DeviceSpeaker;
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::interface::ImageClassifier;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use std::sync::{Arc, Mutex};
use vision_alarm::main::VisionAlarm;

mod asset_pool;
mod config;
mod device_camera;
mod device_display;
mod device_speaker;
mod image_classifier;
mod library;
mod vision_alarm;

fn image_classifier(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Arc<dyn ImageClassifier + Send + Sync>, Box<dyn std::error::Error + Send + Sync>> {
    match &config.classifier {
        ClassifierKind::Fake => Ok(Arc::new(ImageClassifierFake::new(
            vec![config.trigger.label.clone(), "SFW".to_string()],
            logger,
        ))),
        #[cfg(feature = "onnx")]
        ClassifierKind::Onnx {
            model_path,
            labels,
            input_shape,
        } => Ok(Arc::new(
            image_classifier::impl_tract_onnx::ImageClassifierTractOnnx::new(
                model_path,
                labels.clone(),
                *input_shape,
                logger,
            )?,
        )),
        #[cfg(not(feature = "onnx"))]
        ClassifierKind::Onnx { .. } => {
            Err("this build has no ONNX support; enable the `onnx` feature".into())
        }
    }
}

fn device_speaker(
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> Result<Arc<dyn DeviceSpeaker + Send + Sync>, Box<dyn std::error::Error + Send + Sync>> {
    match &config.speaker {
        SpeakerKind::Fake => Ok(Arc::new(DeviceSpeakerFake::new(
            config.speaker_fake_playback_duration,
            logger,
        ))),
        #[cfg(feature = "audio")]
        SpeakerKind::Cpal { tone_duration } => Ok(Arc::new(
            device_speaker::impl_cpal::DeviceSpeakerCpal::new(*tone_duration, logger),
        )),
        #[cfg(not(feature = "audio"))]
        SpeakerKind::Cpal { .. } => {
            Err("this build has no audio output; enable the `audio` feature".into())
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::default();
    config.validate()?;

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let asset_pool = Arc::new(AssetPool::from_config(&config)?);
    let image_classifier = image_classifier(&config, logger.clone())?;

    let device_camera = Arc::new(DeviceCameraFake::new(
        config.camera_fake.clone(),
        logger.clone(),
    ));
    let device_speaker = device_speaker(&config, logger.clone())?;

    let gui = match config.display {
        DisplayKind::Gui => Some(DeviceDisplayGui::new()),
        DisplayKind::Console => None,
    };
    let window = gui.as_ref().map(DeviceDisplayGui::window);
    let device_display: Arc<Mutex<dyn DeviceDisplay + Send + Sync>> = match gui {
        Some(gui) => Arc::new(Mutex::new(gui)),
        None => Arc::new(Mutex::new(DeviceDisplayConsole::new(logger.clone()))),
    };

    let vision_alarm = VisionAlarm::new(
        config,
        logger.clone(),
        device_camera,
        device_speaker,
        device_display,
        image_classifier,
        asset_pool,
    );

    match window {
        Some(window) => {
            let pipeline_logger = logger.clone();
            std::thread::spawn(move || {
                if let Err(e) = vision_alarm.run() {
                    let _ = pipeline_logger.error(&e.to_string());
                }
            });
            run_window(window)
        }
        None => {
            vision_alarm.run()?;
            Ok(())
        }
    }
}
