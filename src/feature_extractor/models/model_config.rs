/// How pixel bytes are mapped to model input values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    ZeroToOne,
    /// MobileNet style inputs.
    MinusOneToOne,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub onnx_model_path: String,
    /// (width, height)
    pub input_shape: (u32, u32),
    /// Intermediate node to read the embedding from. `None` uses the model output.
    pub output_layer: Option<String>,
    pub normalization: Normalization,
}
