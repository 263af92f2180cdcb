use crate::config::ClassificationConfig;
use crate::image_classifier::interface::Classification;

/// Fires when the top-ranked label is the target, its confidence is strictly
/// above the threshold, and no feedback is playing.
pub fn should_fire(
    trigger: &ClassificationConfig,
    classifications: &[Classification],
    is_playing: bool,
) -> bool {
    if is_playing {
        return false;
    }

    match classifications.first() {
        Some(top) => top.label == trigger.label && top.confidence > trigger.min_confidence,
        None => false,
    }
}
