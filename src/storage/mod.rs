//! Corpus, user and model files

pub mod dataset;
pub mod directory;
pub mod model;

pub use dataset::{load_corpus, parse_corpus};
pub use directory::JsonDirectory;
pub use model::{load, save, verify_dataset, ModelFile};
