use crate::feature_extractor::interface::Embedding;
use crate::knn_classifier::error::KnnError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub class_index: usize,
    pub confidences: BTreeMap<usize, f32>,
}

impl Prediction {
    pub fn top_confidence(&self) -> f32 {
        self.confidences
            .get(&self.class_index)
            .copied()
            .unwrap_or(0.0)
    }
}

pub trait KnnClassifier {
    fn add_example(&mut self, embedding: Embedding, class_index: usize) -> Result<(), KnnError>;

    /// Number of distinct classes holding at least one example.
    fn num_classes(&self) -> usize;

    fn num_examples(&self) -> usize;

    /// Votes among the `k` most similar stored examples.
    fn predict_class(&self, embedding: &Embedding, k: usize) -> Result<Prediction, KnnError>;
}
