//! Topology Chart - Network Topology Metrics Chart Viewer
//!
//! Charts top tier size and minimal blocking/splitting set sizes over time,
//! either per physical node or merged by organization.

mod charts;
mod click;
mod config;
mod data;
mod gui;

use anyhow::Context;
use charts::{ChartData, StaticChartRenderer};
use clap::Parser;
use config::{Args, ViewerConfig};
use data::{DataLoader, DataProcessor};
use eframe::egui;
use gui::TopologyChartApp;
use std::path::Path;

/// Load, project and render straight to a file without opening a window.
fn export_headless(config: &ViewerConfig, output: &Path) -> anyhow::Result<()> {
    let source = config
        .csv_source()
        .context("--export needs a CSV source (argument or config file)")?;

    let dataset = DataLoader::load(&source, config.fetch_timeout())
        .with_context(|| format!("loading {}", source))?;
    let mode = config.view_mode();
    let chart = ChartData::new(DataProcessor::project(&dataset.rows, mode), mode);

    StaticChartRenderer::render_to_file(&chart, output, config.export_size())
        .with_context(|| format!("rendering {}", output.display()))?;
    log::info!("Wrote {}", output.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ViewerConfig::from_args(&args)?;

    if let Some(output) = &args.export {
        return export_headless(&config, output);
    }

    log::info!("Starting Topology Chart");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Topology Chart"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Topology Chart",
        options,
        Box::new(move |cc| Ok(Box::new(TopologyChartApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run window: {}", e))
}
