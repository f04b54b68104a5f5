//! Fit command - build and save a model from a corpus file

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::*;

use crate::core::StopWords;
use crate::recommend::{Engine, EngineOptions};
use crate::storage;
use crate::ui;

pub fn run(corpus_path: &Path, output: &Path, options: &EngineOptions) -> Result<()> {
	let start = Instant::now();

	ui::info(&format!("Loading corpus from {}", corpus_path.display()));
	let corpus = storage::load_corpus(corpus_path).context("Failed to load corpus")?;
	ui::success(&format!("Loaded {} organizations", corpus.len()));

	ui::debug(&format!("Fit options: {:?}", options.fit));
	ui::debug(&format!("Cluster options: {:?}", options.cluster));

	let engine = Engine::build(corpus, options).context("Failed to fit model")?;
	let space = engine.space();
	ui::success(&format!(
		"Fitted {} terms ({} pruned), {} clusters",
		space.dim(),
		space.stop_words().len(),
		engine.clusterer().cluster_count()
	));
	ui::debug(&space.info());

	storage::save(output, &engine).context("Failed to save model")?;
	ui::success(&format!("Saved model to {}", output.display()));

	eprintln!(
		"{}",
		format!("Completed in {:.1}s", start.elapsed().as_secs_f32()).dimmed()
	);
	Ok(())
}

/// `none`, `english`, or a file with one stop word per line
pub fn parse_stop_words(value: &str) -> Result<StopWords> {
	match value.trim().to_lowercase().as_str() {
		"none" | "" => Ok(StopWords::None),
		"english" => Ok(StopWords::English),
		_ => {
			let text = fs::read_to_string(value)
				.with_context(|| format!("Failed to read stop word file {}", value))?;
			let words = text
				.lines()
				.map(str::trim)
				.filter(|l| !l.is_empty() && !l.starts_with('#'))
				.map(str::to_string)
				.collect();
			Ok(StopWords::Custom(words))
		}
	}
}
