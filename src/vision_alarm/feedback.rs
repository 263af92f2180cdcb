use rand::Rng;

pub type PollId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackSelection {
    pub image_index: usize,
    pub sound_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackState {
    #[default]
    Idle,
    /// Triggered; waiting for the speaker to confirm playback started.
    Starting { selection: FeedbackSelection },
    Playing {
        selection: FeedbackSelection,
        poll_id: PollId,
    },
}

impl FeedbackState {
    pub fn is_playing(&self) -> bool {
        !matches!(self, FeedbackState::Idle)
    }

    /// The overlay is only visible once the sound is actually playing.
    pub fn overlay_image(&self) -> Option<usize> {
        match self {
            FeedbackState::Playing { selection, .. } => Some(selection.image_index),
            _ => None,
        }
    }
}

/// Picks the image and the sound independently, each uniform over its pool.
pub fn pick_feedback<R: Rng>(
    rng: &mut R,
    image_pool_size: usize,
    sound_pool_size: usize,
) -> FeedbackSelection {
    FeedbackSelection {
        image_index: rng.random_range(0..image_pool_size),
        sound_index: rng.random_range(0..sound_pool_size),
    }
}
