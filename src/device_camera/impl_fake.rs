use crate::config::CameraFakeConfig;
use crate::device_camera::interface::{DeviceCamera, Frame};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, Rgb, RgbImage};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};

pub struct DeviceCameraFake {
    config: CameraFakeConfig,
    fail_start: bool,
    running: Arc<AtomicBool>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceCameraFake {
    pub fn new(config: CameraFakeConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            fail_start: false,
            running: Arc::new(AtomicBool::new(false)),
            logger: logger.with_namespace("camera").with_namespace("fake"),
        }
    }

    #[allow(dead_code)]
    pub fn failing(config: CameraFakeConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            fail_start: true,
            ..Self::new(config, logger)
        }
    }

    #[allow(dead_code)]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

fn synthetic_frame(config: &CameraFakeConfig, sequence: usize) -> Frame {
    let shade = (sequence % 256) as u8;
    let image = RgbImage::from_pixel(
        config.frame_width,
        config.frame_height,
        Rgb([shade, 255 - shade, 128]),
    );
    let focal = config.frame_width as f32;
    Frame::new(DynamicImage::ImageRgb8(image)).with_intrinsics([
        [focal, 0.0, config.frame_width as f32 / 2.0],
        [0.0, focal, config.frame_height as f32 / 2.0],
        [0.0, 0.0, 1.0],
    ])
}

impl DeviceCamera for DeviceCameraFake {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Starting camera...")?;
        if self.fail_start {
            return Err("no video camera available".into());
        }
        self.running.store(true, Ordering::SeqCst);
        self.logger.info("Camera started")?;
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info("Stopping camera...")?;
        self.running.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn frames(&self) -> mpsc::Receiver<Frame> {
        let (tx, rx) = mpsc::channel();
        let config = self.config.clone();
        let running = Arc::clone(&self.running);

        std::thread::spawn(move || {
            let mut sequence = 0;
            while running.load(Ordering::SeqCst) {
                if config.frame_limit.is_some_and(|limit| sequence >= limit) {
                    break;
                }
                if tx.send(synthetic_frame(&config, sequence)).is_err() {
                    break;
                }
                sequence += 1;
                std::thread::sleep(config.frame_interval);
            }
        });

        rx
    }
}

#[cfg(test)]
mod camera_fake_test {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;
    use std::time::Duration;

    fn config(frame_limit: Option<usize>) -> CameraFakeConfig {
        CameraFakeConfig {
            frame_interval: Duration::from_millis(1),
            frame_limit,
            frame_width: 8,
            frame_height: 6,
        }
    }

    #[test]
    fn test_emits_limited_frames_then_disconnects() {
        let camera = DeviceCameraFake::new(config(Some(4)), Arc::new(LoggerFake::new()));
        camera.start().unwrap();

        let frames: Vec<Frame> = camera.frames().iter().collect();

        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].image.width(), 8);
        assert_eq!(frames[0].image.height(), 6);
        assert!(frames[0].intrinsics.is_some());
    }

    #[test]
    fn test_no_frames_before_start() {
        let camera = DeviceCameraFake::new(config(Some(4)), Arc::new(LoggerFake::new()));
        assert_eq!(camera.frames().iter().count(), 0);
    }

    #[test]
    fn test_stop_ends_frame_stream() {
        let camera = DeviceCameraFake::new(config(None), Arc::new(LoggerFake::new()));
        camera.start().unwrap();
        assert!(camera.is_running());

        let frames = camera.frames();
        assert!(frames.recv().is_ok());
        camera.stop().unwrap();

        assert!(!camera.is_running());
        let ended = loop {
            if let Err(e) = frames.recv_timeout(Duration::from_secs(1)) {
                break e;
            }
        };
        assert_eq!(ended, mpsc::RecvTimeoutError::Disconnected);
    }

    #[test]
    fn test_failing_start() {
        let camera = DeviceCameraFake::failing(config(None), Arc::new(LoggerFake::new()));
        assert!(camera.start().is_err());
    }
}
