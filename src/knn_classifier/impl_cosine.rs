use crate::feature_extractor::interface::Embedding;
use crate::knn_classifier::error::KnnError;
use crate::knn_classifier::interface::{KnnClassifier, Prediction};
use std::collections::BTreeMap;

struct StoredExample {
    unit: Vec<f32>,
    class_index: usize,
}

/// Nearest neighbors by cosine similarity. Examples are normalized once on
/// insert so a query costs one dot product per stored example.
#[derive(Default)]
pub struct KnnClassifierCosine {
    examples: Vec<StoredExample>,
    dimension: Option<usize>,
    class_counts: BTreeMap<usize, usize>,
}

impl KnnClassifierCosine {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_dimension(&self, embedding: &Embedding) -> Result<(), KnnError> {
        if embedding.is_empty() {
            return Err(KnnError::EmptyEmbedding);
        }
        match self.dimension {
            Some(expected) if expected != embedding.len() => Err(KnnError::DimensionMismatch {
                expected,
                actual: embedding.len(),
            }),
            _ => Ok(()),
        }
    }
}

impl KnnClassifier for KnnClassifierCosine {
    fn add_example(&mut self, embedding: Embedding, class_index: usize) -> Result<(), KnnError> {
        self.check_dimension(&embedding)?;

        self.dimension = Some(embedding.len());
        self.examples.push(StoredExample {
            unit: unit_vector(embedding.as_slice()),
            class_index,
        });
        *self.class_counts.entry(class_index).or_insert(0) += 1;

        Ok(())
    }

    fn num_classes(&self) -> usize {
        self.class_counts.len()
    }

    fn num_examples(&self) -> usize {
        self.examples.len()
    }

    fn predict_class(&self, embedding: &Embedding, k: usize) -> Result<Prediction, KnnError> {
        if self.examples.is_empty() {
            return Err(KnnError::NoExamples);
        }
        if k == 0 {
            return Err(KnnError::ZeroNeighbors);
        }
        self.check_dimension(embedding)?;

        let query = unit_vector(embedding.as_slice());
        let mut similarities: Vec<(f32, usize)> = self
            .examples
            .iter()
            .map(|example| (dot(&query, &example.unit), example.class_index))
            .collect();

        // Stable sort: equally similar examples keep insertion order.
        similarities.sort_by(|a, b| b.0.total_cmp(&a.0));

        let k = k.min(similarities.len());
        let mut votes: BTreeMap<usize, usize> =
            self.class_counts.keys().map(|class| (*class, 0)).collect();
        for (_, class_index) in similarities.iter().take(k) {
            *votes.entry(*class_index).or_insert(0) += 1;
        }

        let mut class_index = 0;
        let mut top_confidence = 0.0;
        let mut confidences = BTreeMap::new();
        for (class, count) in votes {
            let confidence = count as f32 / k as f32;
            if confidence > top_confidence {
                top_confidence = confidence;
                class_index = class;
            }
            confidences.insert(class, confidence);
        }

        Ok(Prediction {
            class_index,
            confidences,
        })
    }
}

fn unit_vector(values: &[f32]) -> Vec<f32> {
    let norm = values.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm <= f32::EPSILON {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / norm).collect()
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
