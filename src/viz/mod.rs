//! Static HTML dashboard generation

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::Result;

use crate::report::AnalysisPayload;

/// Hotspot and component rows shown on the dashboard.
const CARD_ROWS: usize = 5;

/// Render `dashboard.html` into the output directory: a dataset card,
/// temporal lists, and the hotspot / component / centrality tables.
pub fn generate_dashboard(payload: &AnalysisPayload, output_dir: &str) -> Result<()> {
    log::info!("Generating dashboard for category {:?}", payload.crime_type);

    fs::create_dir_all(output_dir)?;
    let path = Path::new(output_dir).join("dashboard.html");
    let mut file = File::create(path)?;

    writeln!(file, "<!DOCTYPE html>")?;
    writeln!(file, "<html>")?;
    writeln!(file, "<head>")?;
    writeln!(file, "  <title>Incident Network Analysis</title>")?;
    writeln!(file, "  <style>")?;
    writeln!(
        file,
        "    body {{ font-family: Arial, sans-serif; margin: 24px; background: #f6f7fb; color: #1f2937; }}"
    )?;
    writeln!(file, "    h1, h2, h3 {{ color: #111827; }}")?;
    writeln!(
        file,
        "    .card {{ background: white; padding: 16px; border-radius: 10px; margin-bottom: 18px; box-shadow: 0 4px 10px rgba(0,0,0,0.06); }}"
    )?;
    writeln!(
        file,
        "    .grid {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(280px, 1fr)); gap: 12px; }}"
    )?;
    writeln!(file, "  </style>")?;
    writeln!(file, "</head>")?;
    writeln!(file, "<body>")?;
    writeln!(file, "  <h1>Incident Network Analysis</h1>")?;

    write_dataset_card(&mut file, payload)?;
    write_temporal_cards(&mut file, payload)?;
    write_analysis_cards(&mut file, payload)?;

    writeln!(file, "</body>")?;
    writeln!(file, "</html>")?;

    log::info!("Dashboard written");

    Ok(())
}

fn write_dataset_card(file: &mut File, payload: &AnalysisPayload) -> Result<()> {
    let summary = &payload.summary;
    let span = match (&summary.date_min, &summary.date_max) {
        (Some(min), Some(max)) => format!("{min} to {max}"),
        _ => "no dated records".to_string(),
    };

    writeln!(file, "  <div class=\"card\">")?;
    writeln!(file, "    <h2>Dataset</h2>")?;
    writeln!(
        file,
        "    <p>{} rows | {} primary types | {}</p>",
        summary.rows, summary.unique_primary_types, span
    )?;
    writeln!(
        file,
        "    <p>Arrest rate: {:.3} | Domestic rate: {:.3}</p>",
        summary.arrest_rate, summary.domestic_rate
    )?;
    let top: Vec<String> = summary
        .top_primary_types
        .iter()
        .map(|t| format!("{} ({})", t.primary_type, t.count))
        .collect();
    writeln!(file, "    <p>Top types: {}</p>", top.join(", "))?;
    writeln!(file, "  </div>")?;
    Ok(())
}

fn write_temporal_cards(file: &mut File, payload: &AnalysisPayload) -> Result<()> {
    let temporal = &payload.temporal;

    writeln!(file, "  <div class=\"grid\">")?;

    writeln!(file, "    <div class=\"card\">")?;
    writeln!(file, "      <h3>Last 12 Months</h3>")?;
    writeln!(file, "      <ul>")?;
    for month in &temporal.monthly_tail {
        writeln!(file, "        <li>{}: {}</li>", month.month, month.count)?;
    }
    writeln!(file, "      </ul>")?;
    writeln!(file, "    </div>")?;

    writeln!(file, "    <div class=\"card\">")?;
    writeln!(file, "      <h3>By Hour</h3>")?;
    writeln!(file, "      <ul>")?;
    for (hour, count) in temporal.hourly.iter().enumerate() {
        writeln!(file, "        <li>{:02}:00 - {}</li>", hour, count)?;
    }
    writeln!(file, "      </ul>")?;
    writeln!(file, "    </div>")?;

    writeln!(file, "    <div class=\"card\">")?;
    writeln!(file, "      <h3>By Day of Week</h3>")?;
    writeln!(file, "      <ul>")?;
    for dow in &temporal.dow {
        writeln!(file, "        <li>{}: {}</li>", dow.day, dow.count)?;
    }
    writeln!(file, "      </ul>")?;
    writeln!(file, "    </div>")?;

    writeln!(file, "  </div>")?;
    Ok(())
}

fn write_analysis_cards(file: &mut File, payload: &AnalysisPayload) -> Result<()> {
    writeln!(file, "  <div class=\"grid\">")?;

    writeln!(file, "    <div class=\"card\">")?;
    writeln!(
        file,
        "      <h3>Hotspots (DBSCAN, {})</h3>",
        payload.crime_type
    )?;
    writeln!(file, "      <ul>")?;
    for cluster in payload.hotspots.iter().take(CARD_ROWS) {
        writeln!(
            file,
            "        <li>Cluster {}: size {} ({} to {}) @ ({:.5}, {:.5})</li>",
            cluster.cluster,
            cluster.size,
            cluster.date_min,
            cluster.date_max,
            cluster.lat_center,
            cluster.lon_center
        )?;
    }
    writeln!(file, "      </ul>")?;
    writeln!(file, "    </div>")?;

    writeln!(file, "    <div class=\"card\">")?;
    writeln!(
        file,
        "      <h3>Network Components ({})</h3>",
        payload.crime_type
    )?;
    writeln!(
        file,
        "      <p>{} nodes | {} edges | avg degree {:.2}</p>",
        payload.network.nodes, payload.network.edges, payload.network.avg_degree
    )?;
    writeln!(file, "      <ul>")?;
    for comp in payload.network.components.iter().take(CARD_ROWS) {
        writeln!(
            file,
            "        <li>Size {} | {} to {} | arrest rate {:.3} | center ({:.5}, {:.5})</li>",
            comp.size, comp.date_min, comp.date_max, comp.arrest_rate, comp.lat_center, comp.lon_center
        )?;
    }
    writeln!(file, "      </ul>")?;
    writeln!(file, "    </div>")?;

    writeln!(file, "    <div class=\"card\">")?;
    writeln!(
        file,
        "      <h3>Top Centrality ({})</h3>",
        payload.crime_type
    )?;
    writeln!(file, "      <ul>")?;
    for record in &payload.network.centrality_top {
        writeln!(
            file,
            "        <li>{} deg {} betw {:.3} | {} | {}</li>",
            record.case_number, record.degree, record.betweenness, record.date, record.block
        )?;
    }
    writeln!(file, "      </ul>")?;
    writeln!(file, "    </div>")?;

    writeln!(file, "  </div>")?;
    Ok(())
}
