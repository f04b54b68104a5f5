//! # User Interface
//!
//! Colored terminal output for commands and verbose engine diagnostics.

pub mod log;

pub use log::{debug, error, header, info, score, success, warn, Log};
