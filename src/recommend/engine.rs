//! Fitted engine bundle and the active-instance handle

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::config;
use crate::core::{ClusterOptions, Corpus, FitOptions};
use crate::error::Result;
use crate::processing::{Clusterer, VectorSpace};
use crate::recommend::{KeywordIndex, Recommender};
use crate::ui;

/// Everything needed to fit an engine from a corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
	pub fit: FitOptions,
	pub cluster: ClusterOptions,
	pub cluster_count: usize,
	pub keywords_per_cluster: usize,
}

impl Default for EngineOptions {
	fn default() -> Self {
		Self {
			fit: FitOptions::default(),
			cluster: ClusterOptions::default(),
			cluster_count: config::DEFAULT_CLUSTER_COUNT,
			keywords_per_cluster: config::DEFAULT_KEYWORDS_PER_CLUSTER,
		}
	}
}

impl EngineOptions {
	pub fn with_cluster_count(mut self, cluster_count: usize) -> Self {
		self.cluster_count = cluster_count;
		self
	}

	pub fn with_keywords_per_cluster(mut self, keywords: usize) -> Self {
		self.keywords_per_cluster = keywords;
		self
	}

	pub fn with_fit(mut self, fit: FitOptions) -> Self {
		self.fit = fit;
		self
	}

	pub fn with_cluster(mut self, cluster: ClusterOptions) -> Self {
		self.cluster = cluster;
		self
	}
}

/// A fitted vector space with its clusters and keyword index. Immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
	options: EngineOptions,
	space: VectorSpace,
	clusterer: Clusterer,
	keywords: KeywordIndex,
}

impl Engine {
	/// Fit, cluster, then index keywords.
	pub fn build(corpus: Corpus, options: &EngineOptions) -> Result<Self> {
		let space = VectorSpace::fit(corpus, options.fit.clone())?;
		let clusterer = Clusterer::cluster(space.embeddings(), options.cluster_count, &options.cluster)?;
		let keywords = KeywordIndex::build(&clusterer, &space, options.keywords_per_cluster)?;

		ui::debug(&format!(
			"Engine ready: {} documents, {} terms, {} clusters",
			space.corpus().len(),
			space.dim(),
			clusterer.cluster_count()
		));

		Ok(Self {
			options: options.clone(),
			space,
			clusterer,
			keywords,
		})
	}

	pub fn recommender(&self) -> Recommender<'_> {
		Recommender::new(&self.space, &self.keywords)
	}

	pub fn space(&self) -> &VectorSpace {
		&self.space
	}

	pub fn clusterer(&self) -> &Clusterer {
		&self.clusterer
	}

	pub fn keywords(&self) -> &KeywordIndex {
		&self.keywords
	}

	pub fn corpus(&self) -> &Corpus {
		self.space.corpus()
	}

	pub fn options(&self) -> &EngineOptions {
		&self.options
	}
}

/// Shared pointer to the active engine. Readers clone the `Arc` and never
/// hold the lock while computing; a refresh swaps in a new engine.
#[derive(Debug)]
pub struct EngineHandle {
	active: RwLock<Arc<Engine>>,
}

impl EngineHandle {
	pub fn new(engine: Engine) -> Self {
		Self { active: RwLock::new(Arc::new(engine)) }
	}

	pub fn current(&self) -> Arc<Engine> {
		match self.active.read() {
			Ok(guard) => Arc::clone(&guard),
			Err(poisoned) => Arc::clone(&poisoned.into_inner()),
		}
	}

	/// Installs `engine` and returns the one it replaces.
	pub fn swap(&self, engine: Engine) -> Arc<Engine> {
		let next = Arc::new(engine);
		let mut guard = match self.active.write() {
			Ok(guard) => guard,
			Err(poisoned) => poisoned.into_inner(),
		};
		std::mem::replace(&mut *guard, next)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::core::Document;

	fn corpus(extra: &str) -> Corpus {
		Corpus::new(vec![
			Document::new("a", "Robotics", "robots and circuits"),
			Document::new("b", "Chess", "chess openings"),
			Document::new("c", extra, "circuits and chess"),
		])
		.unwrap()
	}

	#[test]
	fn build_runs_every_stage() {
		let options = EngineOptions::default().with_cluster_count(2).with_keywords_per_cluster(2);
		let engine = Engine::build(corpus("Hybrid"), &options).unwrap();
		assert_eq!(engine.clusterer().labels().len(), 3);
		assert_eq!(engine.clusterer().cluster_count(), 2);
		assert!(engine.keywords().terms_for(0).is_some_and(|t| !t.is_empty()));
		assert_eq!(engine.recommender().similar_to_text("chess", 1).unwrap()[0].id, "b");
	}

	#[test]
	fn too_many_clusters_is_a_configuration_error() {
		let err = Engine::build(corpus("Hybrid"), &EngineOptions::default()).unwrap_err();
		assert_eq!(err.kind(), crate::error::ErrorKind::Configuration);
	}

	#[test]
	fn swap_replaces_active_engine() {
		let options = EngineOptions::default().with_cluster_count(1);
		let handle = EngineHandle::new(Engine::build(corpus("Hybrid"), &options).unwrap());
		let before = handle.current();

		let previous = handle.swap(Engine::build(corpus("Mixed"), &options).unwrap());
		assert!(Arc::ptr_eq(&before, &previous));
		assert_eq!(handle.current().corpus().get(2).unwrap().name, "Mixed");
		// readers holding the old engine keep a consistent view
		assert_eq!(before.corpus().get(2).unwrap().name, "Hybrid");
	}

	fn assert_send_sync<T: Send + Sync>() {}

	#[test]
	fn readers_run_while_engine_is_swapped() {
		assert_send_sync::<Engine>();
		assert_send_sync::<EngineHandle>();

		let options = EngineOptions::default().with_cluster_count(1);
		let handle = EngineHandle::new(Engine::build(corpus("Hybrid"), &options).unwrap());
		let replacements: Vec<Engine> = ["Mixed", "Blend", "Fusion"]
			.iter()
			.map(|name| Engine::build(corpus(name), &options).unwrap())
			.collect();

		std::thread::scope(|scope| {
			for _ in 0..4 {
				scope.spawn(|| {
					for _ in 0..50 {
						let engine = handle.current();
						let hits = engine.recommender().similar_to_text("chess", 1).unwrap();
						assert_eq!(hits[0].id, "b");
						let name = &engine.corpus().get(2).unwrap().name;
						assert!(["Hybrid", "Mixed", "Blend", "Fusion"].contains(&name.as_str()));
					}
				});
			}
			scope.spawn(|| {
				for engine in replacements {
					handle.swap(engine);
					std::thread::yield_now();
				}
			});
		});

		assert_eq!(handle.current().corpus().get(2).unwrap().name, "Fusion");
	}
}
