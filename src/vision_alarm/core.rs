use crate::config::{BackpressurePolicy, Config};
use crate::device_camera::interface::Frame;
use crate::image_classifier::interface::Classification;
use crate::vision_alarm::feedback::{pick_feedback, FeedbackState, PollId};
use crate::vision_alarm::trigger::should_fire;
use rand::Rng;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceState {
    #[default]
    Starting,
    Streaming,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierState {
    #[default]
    Idle,
    Busy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    pub frames_received: u64,
    pub frames_classified: u64,
    pub frames_dropped: u64,
    pub classification_errors: u64,
    pub triggers: u64,
    pub playback_failures: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Model {
    pub source: SourceState,
    pub classifier: ClassifierState,
    pub pending: VecDeque<Frame>,
    pub feedback: FeedbackState,
    pub next_poll_id: PollId,
    pub stats: Stats,
    pub fatal: Option<String>,
}

impl Model {
    /// Nothing left to do: the camera is done, every admitted frame has been
    /// classified, and no feedback is playing.
    pub fn is_finished(&self) -> bool {
        self.fatal.is_some()
            || (self.source == SourceState::Ended
                && self.classifier == ClassifierState::Idle
                && self.pending.is_empty()
                && self.feedback == FeedbackState::Idle)
    }
}

#[derive(Debug)]
pub enum Msg {
    CameraStartDone(Result<(), Box<dyn std::error::Error + Send + Sync>>),
    FrameReceived(Frame),
    FramesEnded,
    ClassifyDone(Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>),
    SoundPlayDone(Result<(), Box<dyn std::error::Error + Send + Sync>>),
    PlaybackPolled { poll_id: PollId, is_playing: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    StartCamera,
    SubscribeFrames,
    ClassifyFrame { frame: Frame },
    PlaySound { sound_index: usize },
    StartPoll { poll_id: PollId },
    CancelPoll { poll_id: PollId },
}

impl Effect {
    /// Foreground effects run inline on the loop thread; the rest get their own thread.
    pub fn is_foreground(&self) -> bool {
        matches!(
            self,
            Effect::PlaySound { .. } | Effect::StartPoll { .. } | Effect::CancelPoll { .. }
        )
    }
}

pub fn init<R: Rng>(config: &Config, rng: &mut R) -> (Model, Vec<Effect>) {
    let mut model = Model::default();
    let mut effects = vec![Effect::StartCamera];

    if config.play_on_startup {
        effects.extend(trigger_feedback(config, &mut model, rng));
    }

    (model, effects)
}

pub fn transition<R: Rng>(
    config: &Config,
    mut model: Model,
    msg: Msg,
    rng: &mut R,
) -> (Model, Vec<Effect>) {
    match msg {
        Msg::CameraStartDone(Ok(())) => {
            model.source = SourceState::Streaming;
            (model, vec![Effect::SubscribeFrames])
        }
        Msg::CameraStartDone(Err(e)) => {
            model.source = SourceState::Ended;
            model.fatal = Some(format!("camera failed to start: {}", e));
            (model, vec![])
        }
        Msg::FrameReceived(frame) => {
            model.stats.frames_received += 1;
            admit_frame(config, model, frame)
        }
        Msg::FramesEnded => {
            model.source = SourceState::Ended;
            (model, vec![])
        }
        Msg::ClassifyDone(result) => {
            model.classifier = ClassifierState::Idle;
            let mut effects = vec![];

            match result {
                Ok(classifications) => {
                    model.stats.frames_classified += 1;
                    if should_fire(
                        &config.trigger,
                        &classifications,
                        model.feedback.is_playing(),
                    ) {
                        effects.extend(trigger_feedback(config, &mut model, rng));
                    }
                }
                Err(_) => model.stats.classification_errors += 1,
            }

            if let Some(frame) = model.pending.pop_front() {
                model.classifier = ClassifierState::Busy;
                effects.push(Effect::ClassifyFrame { frame });
            }

            (model, effects)
        }
        Msg::SoundPlayDone(result) => match (model.feedback, result) {
            (FeedbackState::Starting { selection }, Ok(())) => {
                let poll_id = model.next_poll_id;
                model.next_poll_id += 1;
                model.feedback = FeedbackState::Playing { selection, poll_id };
                (model, vec![Effect::StartPoll { poll_id }])
            }
            (FeedbackState::Starting { .. }, Err(_)) => {
                model.stats.playback_failures += 1;
                model.feedback = FeedbackState::Idle;
                (model, vec![])
            }
            _ => (model, vec![]),
        },
        Msg::PlaybackPolled {
            poll_id,
            is_playing,
        } => match model.feedback {
            FeedbackState::Playing {
                poll_id: current, ..
            } if current == poll_id && !is_playing => {
                model.feedback = FeedbackState::Idle;
                (model, vec![Effect::CancelPoll { poll_id }])
            }
            _ => (model, vec![]),
        },
    }
}

fn trigger_feedback<R: Rng>(
    config: &Config,
    model: &mut Model,
    rng: &mut R,
) -> Vec<Effect> {
    let selection = pick_feedback(rng, config.image_pool_size, config.sound_pool_size);
    model.stats.triggers += 1;
    model.feedback = FeedbackState::Starting { selection };
    vec![Effect::PlaySound {
        sound_index: selection.sound_index,
    }]
}

fn admit_frame(config: &Config, mut model: Model, frame: Frame) -> (Model, Vec<Effect>) {
    if model.classifier == ClassifierState::Idle {
        model.classifier = ClassifierState::Busy;
        return (model, vec![Effect::ClassifyFrame { frame }]);
    }

    match config.backpressure {
        BackpressurePolicy::DropWhileBusy => {
            model.stats.frames_dropped += 1;
        }
        BackpressurePolicy::KeepLatest => {
            model.stats.frames_dropped += model.pending.len() as u64;
            model.pending.clear();
            model.pending.push_back(frame);
        }
        BackpressurePolicy::Queue { capacity } => {
            if model.pending.len() < capacity {
                model.pending.push_back(frame);
            } else {
                model.stats.frames_dropped += 1;
            }
        }
    }

    (model, vec![])
}
