//! Clusters command - inspect topic clusters of a fitted model

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use serde::{Deserialize, Serialize};

use crate::commands::open_engine;
use crate::recommend::Engine;
use crate::ui;

#[derive(Debug, Serialize, Deserialize)]
struct ClusterExport {
	total_documents: usize,
	vocabulary: usize,
	clusters: Vec<ClusterInfo>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClusterInfo {
	id: usize,
	size: usize,
	terms: Vec<String>,
	members: Vec<String>,
}

pub fn run(model: &Path, preview_count: usize, export: Option<&Path>) -> Result<()> {
	let engine = open_engine(model)?;
	let clusters = collect(&engine);

	ui::debug(&format!(
		"Cluster sizes: {:?}",
		clusters.iter().map(|c| c.size).collect::<Vec<_>>()
	));

	if let Some(export_path) = export {
		return export_clusters(&engine, clusters, export_path);
	}

	print_clusters(&engine, &clusters, preview_count);
	Ok(())
}

fn collect(engine: &Engine) -> Vec<ClusterInfo> {
	let clusterer = engine.clusterer();
	let corpus = engine.corpus();

	(0..clusterer.cluster_count())
		.map(|id| {
			let members: Vec<String> = clusterer
				.members(id)
				.unwrap_or(&[])
				.iter()
				.filter_map(|&p| corpus.get(p))
				.map(|d| d.id.clone())
				.collect();
			ClusterInfo {
				id,
				size: members.len(),
				terms: engine.keywords().terms_for(id).unwrap_or(&[]).to_vec(),
				members,
			}
		})
		.collect()
}

fn print_clusters(engine: &Engine, clusters: &[ClusterInfo], preview_count: usize) {
	let corpus = engine.corpus();
	ui::success(&format!(
		"{} clusters, {} organizations",
		clusters.len(),
		corpus.len()
	));

	for cluster in clusters {
		eprintln!(
			"\n{} {} ({} organizations)",
			"Cluster".bright_white(),
			cluster.id.to_string().bright_cyan(),
			cluster.size
		);

		if cluster.terms.is_empty() {
			eprintln!("  {}", "no keywords".dimmed());
		} else {
			eprintln!("  {}: {}", "Keywords".dimmed(), cluster.terms.join(", ").yellow());
		}

		for (i, id) in cluster.members.iter().take(preview_count).enumerate() {
			let name = corpus
				.position(id)
				.and_then(|p| corpus.get(p))
				.map(|d| d.name.as_str())
				.unwrap_or("");
			eprintln!(
				"  {} {} {}",
				format!("[{}]", i + 1).dimmed(),
				name.bright_white(),
				format!("({})", id).dimmed()
			);
		}

		if cluster.members.len() > preview_count {
			eprintln!(
				"  {}",
				format!("... and {} more", cluster.members.len() - preview_count).dimmed()
			);
		}
	}
}

fn export_clusters(engine: &Engine, clusters: Vec<ClusterInfo>, export_path: &Path) -> Result<()> {
	let export_data = ClusterExport {
		total_documents: engine.corpus().len(),
		vocabulary: engine.space().dim(),
		clusters,
	};

	let json = serde_json::to_string_pretty(&export_data).context("Failed to serialize clusters")?;

	if export_path.to_str() == Some("-") || export_path.as_os_str().is_empty() {
		println!("{}", json);
	} else {
		std::fs::write(export_path, json).context("Failed to write export file")?;
		ui::success(&format!("Exported to {}", export_path.display()));
	}

	Ok(())
}
