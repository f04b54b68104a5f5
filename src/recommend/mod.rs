//! # Recommendation
//!
//! Keyword index, preference directories and the recommender built on a
//! fitted vector space.

pub mod directory;
pub mod engine;
pub mod keywords;
pub mod recommender;

pub use directory::{Directory, InMemoryDirectory, Preferences};
pub use engine::{Engine, EngineHandle, EngineOptions};
pub use keywords::KeywordIndex;
pub use recommender::{Recommendation, Recommender};
