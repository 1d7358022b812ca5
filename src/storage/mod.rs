//! Results persistence

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, to_string_pretty};

use crate::report::AnalysisPayload;

/// Write the analysis payload into `output_dir` as three JSON documents:
/// `summary.json`, `hotspots.json`, and `network.json`.
pub fn save_results(payload: &AnalysisPayload, output_dir: &str) -> Result<()> {
    log::info!("Saving analysis results to {}", output_dir);

    fs::create_dir_all(output_dir)?;

    save_summary(payload, output_dir)?;
    save_hotspots(payload, output_dir)?;
    save_network(payload, output_dir)?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Dataset statistics and temporal profile.
fn save_summary(payload: &AnalysisPayload, output_dir: &str) -> Result<()> {
    let path = Path::new(output_dir).join("summary.json");
    let mut file = File::create(path)?;

    let summary = json!({
        "summary": payload.summary,
        "temporal": payload.temporal,
    });

    file.write_all(to_string_pretty(&summary)?.as_bytes())?;
    Ok(())
}

/// Density-cluster hotspot table for the analyzed category.
fn save_hotspots(payload: &AnalysisPayload, output_dir: &str) -> Result<()> {
    let path = Path::new(output_dir).join("hotspots.json");
    let mut file = File::create(path)?;

    let hotspots = json!({
        "crime_type": payload.crime_type,
        "cluster_count": payload.hotspots.len(),
        "clusters": payload.hotspots,
    });

    file.write_all(to_string_pretty(&hotspots)?.as_bytes())?;
    Ok(())
}

/// Proximity-network view: counts, top components, top centrality.
fn save_network(payload: &AnalysisPayload, output_dir: &str) -> Result<()> {
    let path = Path::new(output_dir).join("network.json");
    let mut file = File::create(path)?;

    file.write_all(to_string_pretty(&payload.network)?.as_bytes())?;
    Ok(())
}
