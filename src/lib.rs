//! # Orgrec Library
//!
//! Organization recommendations over a TF-IDF vector space.
//! Provides history-based ranking, keyword cold start through spectral
//! topic clusters, and model persistence.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod processing;
pub mod recommend;
pub mod storage;
pub mod ui;

pub use error::{Error, ErrorKind, Result};
