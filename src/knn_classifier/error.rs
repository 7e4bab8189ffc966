use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum KnnError {
    #[error("No examples have been added to the classifier")]
    NoExamples,
    #[error("Embedding has {actual} dimensions, classifier holds {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("Embedding is empty")]
    EmptyEmbedding,
    #[error("Neighbor count must be at least 1")]
    ZeroNeighbors,
}
