use crate::device_camera::interface::Frame;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

impl Classification {
    #[allow(dead_code)]
    pub fn new(label: &str, confidence: f32) -> Self {
        Self {
            label: label.to_string(),
            confidence,
        }
    }
}

pub trait ImageClassifier {
    /// Ranked best first. An empty result is valid and means nothing was recognized.
    fn classify(
        &self,
        frame: &Frame,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>;
}
