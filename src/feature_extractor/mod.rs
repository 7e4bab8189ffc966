pub mod impl_pooling;
pub mod impl_tract;
pub mod interface;
pub mod models;
pub mod tract;
