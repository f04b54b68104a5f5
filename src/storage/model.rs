//! Fitted model file format and I/O

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Corpus, Fingerprint};
use crate::error::{Error, Result};
use crate::recommend::Engine;
use crate::ui;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// MessagePack envelope around a fitted engine. `E` is `&Engine` when
/// writing and `Engine` when reading.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelFile<E> {
	version: String,
	created: DateTime<Utc>,
	fingerprint: Fingerprint,
	engine: E,
}

impl<E> ModelFile<E> {
	pub fn version(&self) -> &str {
		&self.version
	}

	pub fn created(&self) -> DateTime<Utc> {
		self.created
	}

	pub fn fingerprint(&self) -> &Fingerprint {
		&self.fingerprint
	}

	pub fn is_current_version(&self) -> bool {
		self.version == VERSION
	}
}

impl ModelFile<Engine> {
	pub fn engine(&self) -> &Engine {
		&self.engine
	}

	pub fn into_engine(self) -> Engine {
		self.engine
	}
}

/// Save a fitted engine to disk
pub fn save(path: &Path, engine: &Engine) -> Result<()> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent)?;
	}

	let file = ModelFile {
		version: VERSION.to_string(),
		created: Utc::now(),
		fingerprint: Fingerprint::compute(engine.corpus()),
		engine,
	};

	let bytes = rmp_serde::to_vec(&file).map_err(|e| Error::Storage(format!("failed to serialize model: {}", e)))?;
	fs::write(path, &bytes)?;

	ui::debug(&format!(
		"Wrote {} bytes to {} (corpus {})",
		bytes.len(),
		path.display(),
		file.fingerprint.short()
	));
	Ok(())
}

/// Load a model and check that its corpus is intact
pub fn load(path: &Path) -> Result<ModelFile<Engine>> {
	let bytes = fs::read(path)
		.map_err(|e| Error::Storage(format!("failed to read model {}: {}", path.display(), e)))?;
	let file: ModelFile<Engine> = rmp_serde::from_slice(&bytes)
		.map_err(|e| Error::Storage(format!("failed to deserialize model {}: {}", path.display(), e)))?;

	let actual = Fingerprint::compute(file.engine.corpus());
	if actual != file.fingerprint {
		return Err(Error::Storage(format!(
			"model corpus fingerprint {} does not match recorded {}",
			actual.short(),
			file.fingerprint.short()
		)));
	}

	if !file.is_current_version() {
		ui::debug(&format!("Model written by v{}, running v{}", file.version, VERSION));
	}
	Ok(file)
}

/// Fails unless `dataset` lists the same ids in the same order as the corpus
/// the engine was fit on.
pub fn verify_dataset(engine: &Engine, dataset: &Corpus) -> Result<()> {
	let expected = Fingerprint::compute(engine.corpus());
	let actual = Fingerprint::compute(dataset);
	if expected != actual {
		return Err(Error::Storage(format!(
			"dataset ({} documents, {}) does not match the model corpus ({} documents, {}); refit the model",
			dataset.len(),
			actual.short(),
			engine.corpus().len(),
			expected.short()
		)));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::Document;
	use crate::error::ErrorKind;
	use crate::recommend::EngineOptions;

	fn corpus() -> Corpus {
		Corpus::new(vec![
			Document::new("A", "", "robotics club builds robots"),
			Document::new("B", "", "chess club plays chess"),
			Document::new("C", "", "robotics and chess hybrid club"),
		])
		.unwrap()
	}

	fn engine() -> Engine {
		Engine::build(corpus(), &EngineOptions::default().with_cluster_count(2)).unwrap()
	}

	#[test]
	fn save_then_load_preserves_rankings() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("model.msgpack");
		let engine = engine();
		save(&path, &engine).unwrap();

		let loaded = load(&path).unwrap();
		assert!(loaded.is_current_version());
		let restored = loaded.into_engine();
		assert_eq!(restored.space().terms(), engine.space().terms());
		assert_eq!(restored.clusterer().labels(), engine.clusterer().labels());

		let a = engine.recommender().similar_to_text("robotics club", 3).unwrap();
		let b = restored.recommender().similar_to_text("robotics club", 3).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn garbage_is_a_storage_error() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bad.msgpack");
		fs::write(&path, b"not a model").unwrap();
		assert_eq!(load(&path).unwrap_err().kind(), ErrorKind::Storage);
		assert_eq!(load(&dir.path().join("missing")).unwrap_err().kind(), ErrorKind::Storage);
	}

	#[test]
	fn reordered_dataset_is_rejected() {
		let engine = engine();
		assert!(verify_dataset(&engine, &corpus()).is_ok());

		let reordered = Corpus::new(vec![
			Document::new("B", "", "chess club plays chess"),
			Document::new("A", "", "robotics club builds robots"),
			Document::new("C", "", "robotics and chess hybrid club"),
		])
		.unwrap();
		assert_eq!(verify_dataset(&engine, &reordered).unwrap_err().kind(), ErrorKind::Storage);
	}
}
