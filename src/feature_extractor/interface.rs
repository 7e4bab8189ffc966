use image::DynamicImage;

/// Feature vector for a single frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

pub trait FeatureExtractor {
    fn infer(&self, frame: &DynamicImage) -> Result<Embedding, Box<dyn std::error::Error + Send + Sync>>;
}
