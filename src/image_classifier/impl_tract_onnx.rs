use crate::device_camera::interface::Frame;
use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

pub struct ImageClassifierTractOnnx {
    model: OnnxPlan,
    labels: Vec<String>,
    input_shape: (u32, u32),
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTractOnnx {
    /// Loads and optimizes the model once. The model takes one NCHW float
    /// image and outputs one score per entry of `labels`.
    pub fn new(
        model_path: &Path,
        labels: Vec<String>,
        input_shape: (u32, u32),
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let (width, height) = input_shape;
        let model = tract_onnx::onnx()
            .model_for_path(model_path)?
            .with_input_fact(
                0,
                f32::fact([1, 3, height as usize, width as usize]).into(),
            )?
            .into_optimized()?
            .into_runnable()?;

        let logger = logger
            .with_namespace("image_classifier")
            .with_namespace("tract_onnx");
        logger.info(&format!(
            "Loaded model {} ({} labels)",
            model_path.display(),
            labels.len()
        ))?;

        Ok(Self {
            model,
            labels,
            input_shape,
            logger,
        })
    }

    /// Center crop to the model aspect ratio, then scale to the input size.
    fn preprocess(&self, image: &DynamicImage) -> Tensor {
        let (width, height) = self.input_shape;
        let target_aspect = width as f32 / height as f32;
        let (source_width, source_height) = (image.width(), image.height());

        let (crop_width, crop_height) =
            if source_width as f32 / source_height as f32 > target_aspect {
                ((source_height as f32 * target_aspect) as u32, source_height)
            } else {
                (source_width, (source_width as f32 / target_aspect) as u32)
            };
        let cropped = image.crop_imm(
            (source_width - crop_width) / 2,
            (source_height - crop_height) / 2,
            crop_width.max(1),
            crop_height.max(1),
        );
        let rgb = cropped
            .resize_exact(width, height, image::imageops::FilterType::Triangle)
            .to_rgb8();

        tract_ndarray::Array4::from_shape_fn(
            (1, 3, height as usize, width as usize),
            |(_, c, y, x)| rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
        )
        .into_tensor()
    }
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

fn first_output_scores(
    outputs: &[TValue],
) -> Result<Vec<f32>, Box<dyn std::error::Error + Send + Sync>> {
    let output = outputs
        .first()
        .ok_or("model produced no outputs")?
        .to_array_view::<f32>()?;
    Ok(output.iter().copied().collect())
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn classify(
        &self,
        frame: &Frame,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        let input = self.preprocess(&frame.image);
        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let scores = first_output_scores(&outputs)?;

        if scores.len() != self.labels.len() {
            return Err(format!(
                "model produced {} scores for {} labels",
                scores.len(),
                self.labels.len()
            )
            .into());
        }

        let already_probabilities = scores.iter().all(|s| (0.0..=1.0).contains(s))
            && (scores.iter().sum::<f32>() - 1.0).abs() < 1e-3;
        let probabilities = if already_probabilities {
            scores
        } else {
            softmax(&scores)
        };

        let mut classifications: Vec<Classification> = self
            .labels
            .iter()
            .zip(probabilities)
            .map(|(label, confidence)| Classification {
                label: label.clone(),
                confidence,
            })
            .collect();
        classifications.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        if let Some(top) = classifications.first() {
            self.logger
                .info(&format!("Top label {} ({:.3})", top.label, top.confidence))?;
        }

        Ok(classifications)
    }
}
