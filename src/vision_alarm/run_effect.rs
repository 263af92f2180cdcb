use super::main::VisionAlarm;
use crate::vision_alarm::core::{Effect, Msg};
use crate::vision_alarm::feedback::PollId;
use std::sync::mpsc::{channel, RecvTimeoutError};
use std::sync::PoisonError;

impl VisionAlarm {
    pub fn run_effect(&self, effect: Effect) {
        let _ = self.logger.info(&format!("Running effect: {:?}", effect));

        match effect {
            Effect::StartCamera => {
                let started = self.device_camera.start();
                self.send(Msg::CameraStartDone(started));
            }
            Effect::SubscribeFrames => {
                for frame in self.device_camera.frames() {
                    if self.msg_sender.send(Msg::FrameReceived(frame)).is_err() {
                        return;
                    }
                }
                self.send(Msg::FramesEnded);
            }
            Effect::ClassifyFrame { frame } => {
                let classifications = self.image_classifier.classify(&frame);
                if let Err(e) = &classifications {
                    let _ = self
                        .logger
                        .error(&format!("classification failed, skipping frame: {}", e));
                }
                self.send(Msg::ClassifyDone(classifications));
            }
            Effect::PlaySound { sound_index } => {
                let played = match self.asset_pool.sound(sound_index) {
                    Some(sound) => self.device_speaker.play(sound),
                    None => Err(format!("no sound at index {}", sound_index).into()),
                };
                if let Err(e) = &played {
                    let _ = self.logger.error(&format!("playback failed: {}", e));
                }
                self.send(Msg::SoundPlayDone(played));
            }
            Effect::StartPoll { poll_id } => self.start_poll(poll_id),
            Effect::CancelPoll { poll_id } => self.cancel_poll(poll_id),
        }
    }

    /// Every `poll_interval` asks the speaker whether it is still playing.
    /// Stops by itself after reporting the end of playback, or when cancelled.
    fn start_poll(&self, poll_id: PollId) {
        let (cancel_sender, cancel_receiver) = channel::<()>();
        self.polls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(poll_id, cancel_sender);

        let interval = self.config.poll_interval;
        let device_speaker = self.device_speaker.clone();
        let msg_sender = self.msg_sender.clone();

        std::thread::spawn(move || loop {
            match cancel_receiver.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => {
                    let is_playing = device_speaker.is_playing();
                    let sent = msg_sender.send(Msg::PlaybackPolled {
                        poll_id,
                        is_playing,
                    });
                    if sent.is_err() || !is_playing {
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        });
    }

    fn cancel_poll(&self, poll_id: PollId) {
        let cancel = self
            .polls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&poll_id);

        match cancel {
            // The poll may already have stopped on its own.
            Some(cancel) => {
                let _ = cancel.send(());
            }
            None => {
                let _ = self
                    .logger
                    .error(&format!("poll {} cancelled twice", poll_id));
            }
        }
    }
}
