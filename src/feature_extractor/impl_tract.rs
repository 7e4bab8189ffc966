use crate::feature_extractor::interface::{Embedding, FeatureExtractor};
use crate::feature_extractor::models::model_config::ModelConfig;
use crate::feature_extractor::tract::preprocess::frame_to_tensor;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::Arc;
use tract_onnx::prelude::*;

/// Embeddings read from an intermediate layer of a pretrained ONNX image model.
pub struct FeatureExtractorTract {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
    config: ModelConfig,
}

impl FeatureExtractorTract {
    pub fn new(
        config: ModelConfig,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let logger = logger.with_namespace("feature_extractor").with_namespace("tract");
        logger.info(&format!("Loading model {}...", config.onnx_model_path))?;

        let (width, height) = config.input_shape;
        let mut model = tract_onnx::onnx()
            .model_for_path(&config.onnx_model_path)?
            .with_input_fact(0, f32::fact([1, 3, height as usize, width as usize]).into())?;

        if let Some(layer) = &config.output_layer {
            model = model.with_output_names([layer.as_str()])?;
        }

        let model = model.into_optimized()?.into_runnable()?;

        logger.info("Model loaded")?;

        Ok(Self { model, config })
    }
}

impl FeatureExtractor for FeatureExtractorTract {
    fn infer(&self, frame: &DynamicImage) -> Result<Embedding, Box<dyn std::error::Error + Send + Sync>> {
        let input = frame_to_tensor(frame, self.config.input_shape, self.config.normalization);

        let outputs = self.model.run(tvec!(input.into_tvalue()))?;
        let output = outputs
            .first()
            .ok_or("Model produced no outputs")?
            .to_array_view::<f32>()?;

        Ok(output.iter().copied().collect::<Vec<f32>>().into())
    }
}
