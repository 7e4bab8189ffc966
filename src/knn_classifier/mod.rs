pub mod error;
pub mod impl_cosine;
pub mod interface;
