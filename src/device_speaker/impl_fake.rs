use crate::asset_pool::SoundAsset;
use crate::device_speaker::interface::DeviceSpeaker;
use crate::library::logger::interface::Logger;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Pretends every sound lasts `playback_duration`.
pub struct DeviceSpeakerFake {
    playback_duration: Duration,
    fail_play: AtomicBool,
    started_at: Mutex<Option<Instant>>,
    played: Mutex<Vec<String>>,
    is_playing_calls: AtomicUsize,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl DeviceSpeakerFake {
    pub fn new(playback_duration: Duration, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            playback_duration,
            fail_play: AtomicBool::new(false),
            started_at: Mutex::new(None),
            played: Mutex::new(Vec::new()),
            is_playing_calls: AtomicUsize::new(0),
            logger: logger.with_namespace("speaker").with_namespace("fake"),
        }
    }

    #[allow(dead_code)]
    pub fn set_fail_play(&self, fail: bool) {
        self.fail_play.store(fail, Ordering::SeqCst);
    }

    #[allow(dead_code)]
    pub fn played(&self) -> Vec<String> {
        self.played
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// When the most recent playback ended (or will end).
    #[allow(dead_code)]
    pub fn finished_at(&self) -> Option<Instant> {
        self.started_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .map(|started_at| started_at + self.playback_duration)
    }

    #[allow(dead_code)]
    pub fn is_playing_calls(&self) -> usize {
        self.is_playing_calls.load(Ordering::SeqCst)
    }
}

impl DeviceSpeaker for DeviceSpeakerFake {
    fn play(&self, sound: &SoundAsset) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if self.fail_play.load(Ordering::SeqCst) {
            return Err(format!("could not open {}", sound.name).into());
        }

        self.logger.info(&format!(
            "Playing {} for {:?}",
            sound.name, self.playback_duration
        ))?;
        *self.started_at.lock().map_err(|e| e.to_string())? = Some(Instant::now());
        self.played
            .lock()
            .map_err(|e| e.to_string())?
            .push(sound.name.clone());
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.is_playing_calls.fetch_add(1, Ordering::SeqCst);
        self.started_at
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some_and(|started_at| started_at.elapsed() < self.playback_duration)
    }
}
