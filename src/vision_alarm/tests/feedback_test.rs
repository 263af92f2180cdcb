use crate::vision_alarm::feedback::{pick_feedback, FeedbackSelection, FeedbackState};
use rand::rngs::StdRng;
use rand::SeedableRng;

const TRIALS: usize = 10_000;

fn assert_roughly_uniform(counts: &[usize]) {
    let expected = TRIALS as f64 / counts.len() as f64;
    for (index, &count) in counts.iter().enumerate() {
        let deviation = (count as f64 - expected).abs() / expected;
        assert!(
            deviation < 0.2,
            "index {} picked {} times, expected about {}",
            index,
            count,
            expected
        );
    }
}

#[test]
fn test_indices_stay_in_pool() {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..1_000 {
        let selection = pick_feedback(&mut rng, 3, 7);
        assert!(selection.image_index < 3);
        assert!(selection.sound_index < 7);
    }
}

#[test]
fn test_selection_is_uniform() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut images = vec![0usize; 12];
    let mut sounds = vec![0usize; 12];

    for _ in 0..TRIALS {
        let selection = pick_feedback(&mut rng, 12, 12);
        images[selection.image_index] += 1;
        sounds[selection.sound_index] += 1;
    }

    assert_roughly_uniform(&images);
    assert_roughly_uniform(&sounds);
}

#[test]
fn test_image_and_sound_are_independent() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut same = 0;
    let mut joint = vec![0usize; 4];

    for _ in 0..TRIALS {
        let selection = pick_feedback(&mut rng, 2, 2);
        if selection.image_index == selection.sound_index {
            same += 1;
        }
        joint[selection.image_index * 2 + selection.sound_index] += 1;
    }

    // Independent picks agree about half the time and fill all four cells evenly.
    let ratio = same as f64 / TRIALS as f64;
    assert!((0.45..0.55).contains(&ratio), "agreement ratio {}", ratio);
    assert_roughly_uniform(&joint);
}

#[test]
fn test_single_asset_pools() {
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(
        pick_feedback(&mut rng, 1, 1),
        FeedbackSelection {
            image_index: 0,
            sound_index: 0
        }
    );
}

#[test]
fn test_overlay_only_while_playing() {
    let selection = FeedbackSelection {
        image_index: 4,
        sound_index: 9,
    };

    assert!(!FeedbackState::Idle.is_playing());
    assert_eq!(FeedbackState::Idle.overlay_image(), None);

    let starting = FeedbackState::Starting { selection };
    assert!(starting.is_playing());
    assert_eq!(starting.overlay_image(), None);

    let playing = FeedbackState::Playing {
        selection,
        poll_id: 0,
    };
    assert!(playing.is_playing());
    assert_eq!(playing.overlay_image(), Some(4));
}
