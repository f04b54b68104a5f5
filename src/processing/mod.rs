//! Text vectorization and clustering

pub mod cluster;
pub mod kmeans;
pub mod spectral;
pub mod tokenize;
pub mod vector_space;

pub use cluster::Clusterer;
pub use tokenize::Analyzer;
pub use vector_space::{Neighbor, VectorSpace};
