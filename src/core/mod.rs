//! Core domain types

pub mod cluster;
pub mod document;
pub mod hash;
pub mod options;
pub mod vector;

pub use cluster::{Affinity, ClusterOptions};
pub use document::{Corpus, Dataset, Document};
pub use hash::Fingerprint;
pub use options::{AnalyzerKind, DocFrequency, FitOptions, StopWords};
pub use vector::SparseVector;
