use crate::device_camera::interface::Frame;
use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::library::logger::interface::Logger;
use rand::distr::{Distribution, Uniform};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

type ScriptedResult = Result<Vec<Classification>, String>;

enum Mode {
    Random { labels: Vec<String> },
    Scripted { results: Mutex<VecDeque<ScriptedResult>>, fallback: ScriptedResult },
}

pub struct ImageClassifierFake {
    mode: Mode,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierFake {
    pub fn new(labels: Vec<String>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            mode: Mode::Random { labels },
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
        }
    }

    /// Returns `results` in order, then `fallback` for every later frame.
    #[allow(dead_code)]
    pub fn scripted(
        results: Vec<ScriptedResult>,
        fallback: ScriptedResult,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            mode: Mode::Scripted {
                results: Mutex::new(results.into()),
                fallback,
            },
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
        }
    }

    fn classify_random(
        &self,
        labels: &[String],
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        if labels.is_empty() {
            return Ok(vec![]);
        }

        let mut rng = rand::rng();
        let confidence_dist = Uniform::new(0.0f32, 1.0)?;

        let mut classifications: Vec<Classification> = labels
            .iter()
            .map(|label| Classification {
                label: label.clone(),
                confidence: confidence_dist.sample(&mut rng),
            })
            .collect();

        let total: f32 = classifications.iter().map(|c| c.confidence).sum();
        if total > 0.0 {
            for classification in &mut classifications {
                classification.confidence /= total;
            }
        }
        classifications.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        Ok(classifications)
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(
        &self,
        frame: &Frame,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!("Classifying {:?}", frame))?;

        match &self.mode {
            Mode::Random { labels } => self.classify_random(labels),
            Mode::Scripted { results, fallback } => {
                let next = results
                    .lock()
                    .map_err(|e| e.to_string())?
                    .pop_front()
                    .unwrap_or_else(|| fallback.clone());
                next.map_err(|message| message.into())
            }
        }
    }
}

#[cfg(test)]
mod image_classifier_fake_test {
    use super::*;
    use crate::library::logger::impl_fake::LoggerFake;
    use image::{DynamicImage, RgbImage};

    fn frame() -> Frame {
        Frame::new(DynamicImage::ImageRgb8(RgbImage::new(4, 4)))
    }

    #[test]
    fn test_random_results_are_ranked_probabilities() {
        let classifier = ImageClassifierFake::new(
            vec!["NSFW".to_string(), "SFW".to_string()],
            Arc::new(LoggerFake::new()),
        );

        for _ in 0..100 {
            let result = classifier.classify(&frame()).unwrap();
            assert_eq!(result.len(), 2);
            assert!(result[0].confidence >= result[1].confidence);
            let total: f32 = result.iter().map(|c| c.confidence).sum();
            assert!((total - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_scripted_results_then_fallback() {
        let classifier = ImageClassifierFake::scripted(
            vec![
                Ok(vec![Classification::new("NSFW", 0.9)]),
                Err("model failure".to_string()),
            ],
            Ok(vec![]),
            Arc::new(LoggerFake::new()),
        );

        assert_eq!(
            classifier.classify(&frame()).unwrap(),
            vec![Classification::new("NSFW", 0.9)]
        );
        assert!(classifier.classify(&frame()).is_err());
        assert!(classifier.classify(&frame()).unwrap().is_empty());
        assert!(classifier.classify(&frame()).unwrap().is_empty());
    }
}
