//! # Command Implementations
//!
//! Each submodule handles one CLI command (fit, recommend, keywords, etc.).

pub mod clusters;
pub mod fit;
pub mod keywords;
pub mod recommend;
pub mod similar;

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use crate::recommend::{Engine, Recommendation};
use crate::storage;
use crate::ui;

/// Loads a fitted model, pointing at `orgrec fit` when it is missing.
pub(crate) fn open_engine(path: &Path) -> Result<Engine> {
	if !path.exists() {
		anyhow::bail!(
			"No model at {}. Run 'orgrec fit --corpus <file>' first",
			path.display()
		);
	}

	let file = storage::load(path).with_context(|| format!("Failed to load model {}", path.display()))?;
	if !file.is_current_version() {
		ui::warn(&format!(
			"Model was fitted with v{}; refit if results look off",
			file.version()
		));
	}
	ui::debug(&format!(
		"Model {} created {}",
		file.fingerprint().short(),
		file.created().format("%Y-%m-%d %H:%M")
	));
	Ok(file.into_engine())
}

pub(crate) fn print_results(engine: &Engine, results: &[Recommendation]) {
	if results.is_empty() {
		ui::warn("No recommendations");
		return;
	}

	ui::header("Results");
	let corpus = engine.corpus();
	for (i, rec) in results.iter().enumerate() {
		let name = corpus
			.position(&rec.id)
			.and_then(|p| corpus.get(p))
			.map(|d| d.name.as_str())
			.filter(|n| !n.is_empty())
			.unwrap_or("(unnamed)");
		let score = match rec.similarity {
			Some(s) => ui::score(s),
			None => "random".dimmed().to_string(),
		};

		println!(
			"{}. {} {} {}",
			format!("{:2}", i + 1).bright_blue().bold(),
			name.bright_white(),
			format!("[{}]", rec.id).dimmed(),
			score
		);
	}
	println!();
}
