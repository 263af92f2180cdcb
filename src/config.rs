use chrono::Offset;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ClassificationConfig {
    pub label: String,
    pub min_confidence: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackpressurePolicy {
    /// Frames arriving while a classification is in flight are discarded.
    DropWhileBusy,
    /// Only the newest frame waits for the classifier.
    #[allow(dead_code)]
    KeepLatest,
    /// Frames wait in arrival order, up to `capacity`.
    #[allow(dead_code)]
    Queue { capacity: usize },
}

#[derive(Debug, Clone)]
pub enum AssetSource {
    #[allow(dead_code)]
    Directory(PathBuf),
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayKind {
    Console,
    #[allow(dead_code)]
    Gui,
}

#[derive(Debug, Clone)]
pub enum ClassifierKind {
    Fake,
    #[allow(dead_code)]
    Onnx {
        model_path: PathBuf,
        labels: Vec<String>,
        input_shape: (u32, u32),
    },
}

#[derive(Debug, Clone)]
pub enum SpeakerKind {
    Fake,
    /// An empty sound plays a tone lasting `tone_duration`.
    #[allow(dead_code)]
    Cpal { tone_duration: Duration },
}

#[derive(Debug, Clone)]
pub struct CameraFakeConfig {
    pub frame_interval: Duration,
    pub frame_limit: Option<usize>,
    pub frame_width: u32,
    pub frame_height: u32,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub trigger: ClassificationConfig,
    pub poll_interval: Duration,
    pub image_pool_size: usize,
    pub sound_pool_size: usize,
    pub image_extension: String,
    pub sound_extension: String,
    pub asset_source: AssetSource,
    pub backpressure: BackpressurePolicy,
    pub play_on_startup: bool,
    pub logger_timezone: chrono::FixedOffset,
    pub camera_fake: CameraFakeConfig,
    pub speaker_fake_playback_duration: Duration,
    pub display: DisplayKind,
    pub classifier: ClassifierKind,
    pub speaker: SpeakerKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trigger: ClassificationConfig {
                label: "NSFW".to_string(),
                min_confidence: 0.75,
            },
            poll_interval: Duration::from_millis(500),
            image_pool_size: 12,
            sound_pool_size: 12,
            image_extension: "jpg".to_string(),
            sound_extension: "mp3".to_string(),
            asset_source: AssetSource::Placeholder,
            backpressure: BackpressurePolicy::DropWhileBusy,
            play_on_startup: true,
            logger_timezone: utc(),
            camera_fake: CameraFakeConfig {
                frame_interval: Duration::from_millis(100),
                frame_limit: None,
                frame_width: 224,
                frame_height: 224,
            },
            speaker_fake_playback_duration: Duration::from_secs(2),
            display: DisplayKind::Console,
            classifier: ClassifierKind::Fake,
            speaker: SpeakerKind::Fake,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.image_pool_size == 0 || self.sound_pool_size == 0 {
            return Err("asset pools must hold at least one image and one sound".into());
        }
        if self.poll_interval.is_zero() {
            return Err("poll interval must be greater than zero".into());
        }
        if !(0.0..=1.0).contains(&self.trigger.min_confidence) {
            return Err(format!(
                "trigger threshold {} is outside [0, 1]",
                self.trigger.min_confidence
            )
            .into());
        }
        if let BackpressurePolicy::Queue { capacity: 0 } = self.backpressure {
            return Err("frame queue capacity must be greater than zero".into());
        }
        Ok(())
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trigger.label, "NSFW");
        assert_eq!(config.trigger.min_confidence, 0.75);
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert!(matches!(config.speaker, SpeakerKind::Fake));
    }

    #[test]
    fn test_rejects_empty_pools() {
        let mut config = Config::default();
        config.sound_pool_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_queue_capacity() {
        let mut config = Config::default();
        config.backpressure = BackpressurePolicy::Queue { capacity: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_threshold_out_of_range() {
        let mut config = Config::default();
        config.trigger.min_confidence = 1.5;
        assert!(config.validate().is_err());
    }
}
