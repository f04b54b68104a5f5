//! Application configuration and constants

use std::path::PathBuf;
use std::sync::OnceLock;

static CUSTOM_MODEL_PATH: OnceLock<PathBuf> = OnceLock::new();

// === Storage ===
pub const MODEL_FILE: &str = "orgrec.msgpack";
pub const MODEL_ENV: &str = "ORGREC_MODEL";

// === Clustering ===
pub const DEFAULT_CLUSTER_COUNT: usize = 10;
pub const DEFAULT_RBF_GAMMA: f64 = 1.0;
pub const DEFAULT_SEED: u64 = 42;
pub const MAX_EIGEN_ITER: usize = 300;
pub const EIGEN_TOLERANCE: f64 = 1e-9;
pub const KMEANS_RESTARTS: usize = 10;
pub const MAX_KMEANS_ITER: usize = 300;
pub const KMEANS_TOLERANCE: f64 = 1e-8;

// === Keywords ===
pub const DEFAULT_KEYWORDS_PER_CLUSTER: usize = 5;

// === Recommendation Defaults ===
pub const DEFAULT_COUNT: usize = 10;

pub fn set_model_path(path: PathBuf) {
	let _ = CUSTOM_MODEL_PATH.set(path);
}

/// Model file location: CLI override, then ORGREC_MODEL, then the working directory
pub fn model_path() -> PathBuf {
	if let Some(custom) = CUSTOM_MODEL_PATH.get() {
		crate::ui::debug(&format!("Using model path: {}", custom.display()));
		return custom.clone();
	}

	if let Ok(env_path) = std::env::var(MODEL_ENV) {
		if !env_path.trim().is_empty() {
			crate::ui::debug(&format!("Using {}: {}", MODEL_ENV, env_path));
			return PathBuf::from(env_path);
		}
	}

	PathBuf::from(MODEL_FILE)
}
