//! Topology Chart Main Application
//! Main window with control panel and chart viewer.

use crate::charts::{ChartData, StaticChartRenderer};
use crate::click::ClickDispatcher;
use crate::config::ViewerConfig;
use crate::data::{CsvSource, DataLoader, DataProcessor, LoadedDataset, ViewMode};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, UserSettings};
use egui::SidePanel;
use std::sync::mpsc::{channel, Receiver};
use std::thread;

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(LoadedDataset),
    Error(String),
}

/// Main application window.
pub struct TopologyChartApp {
    config: ViewerConfig,
    loader: DataLoader,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    clicks: ClickDispatcher,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl TopologyChartApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> Self {
        let settings = UserSettings {
            source_input: config.source.clone().unwrap_or_default(),
            merge_by_organization: config.merge_by_organization,
        };

        let mut app = Self {
            clicks: ClickDispatcher::from_template(config.click_url_template.as_deref()),
            loader: DataLoader::new(),
            control_panel: ControlPanel::new(settings),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
            config,
        };

        if let Some(source) = app.config.csv_source() {
            app.start_load(source);
        }
        app
    }

    fn view_mode(&self) -> ViewMode {
        ViewMode::from_merge_flag(self.control_panel.settings.merge_by_organization)
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.control_panel.settings.source_input = path.to_string_lossy().to_string();
            self.start_load(CsvSource::File(path));
        }
    }

    fn handle_load(&mut self) {
        let input = self.control_panel.settings.source_input.trim().to_string();
        if input.is_empty() {
            self.control_panel.set_status("Enter a CSV path or URL first");
            return;
        }
        self.start_load(CsvSource::parse(&input));
    }

    /// Fetch and parse in a background thread; only one load runs at a time.
    fn start_load(&mut self, source: CsvSource) {
        if self.is_loading {
            log::debug!("Load of {} ignored, another load is running", source);
            return;
        }

        self.is_loading = true;
        self.control_panel.is_loading = true;
        self.control_panel.set_status(&format!("Loading {}...", source));

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let timeout = self.config.fetch_timeout();

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!("Fetching {}...", source)));

            match DataLoader::load(&source, timeout) {
                Ok(dataset) => {
                    let _ = tx.send(LoadResult::Complete(dataset));
                }
                Err(e) => {
                    log::error!("Failed to load {}: {}", source, e);
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_status(&status);
                    }
                    LoadResult::Complete(dataset) => {
                        let status = if dataset.missing_columns.is_empty() {
                            format!("Loaded {} rows", dataset.rows.len())
                        } else {
                            format!(
                                "Loaded {} rows ({} columns missing)",
                                dataset.rows.len(),
                                dataset.missing_columns.len()
                            )
                        };
                        self.loader.set_dataset(dataset);
                        self.rebuild_chart();
                        self.control_panel.set_status(&status);
                        self.finish_loading();
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(error) => {
                        self.control_panel.set_status(&format!("Error: {}", error));
                        self.finish_loading();
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn finish_loading(&mut self) {
        self.is_loading = false;
        self.control_panel.is_loading = false;
    }

    /// Project the loaded rows for the selected view and replace the chart.
    fn rebuild_chart(&mut self) {
        if self.loader.dataset().is_none() {
            self.chart_viewer.clear();
            self.control_panel.export_enabled = false;
            return;
        }

        let mode = self.view_mode();
        log::debug!("Rendering {} rows as {:?}", self.loader.row_count(), mode);
        let projection = DataProcessor::project(self.loader.rows(), mode);
        self.chart_viewer
            .replace_chart(ChartData::new(projection, mode));
        self.control_panel.export_enabled = true;
    }

    /// Handle image export of the current chart
    fn handle_export_image(&mut self) {
        let Some(chart) = self.chart_viewer.chart() else {
            self.control_panel.set_status("No chart to export");
            return;
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .add_filter("SVG Image", &["svg"])
            .set_file_name("topology_chart.png")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match StaticChartRenderer::render_to_file(chart, &output_path, self.config.export_size())
        {
            Ok(()) => {
                let status = format!("Exported {}", output_path.display());
                self.control_panel.set_status(&status);
            }
            Err(e) => {
                log::error!("Export to {} failed: {}", output_path.display(), e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for TopologyChartApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::Load => self.handle_load(),
                        ControlPanelAction::ViewModeChanged => self.rebuild_chart(),
                        ControlPanelAction::ExportImage => self.handle_export_image(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(hit) = self.chart_viewer.show(ui) {
                if let Some(chart) = self.chart_viewer.chart() {
                    if let Some(event) = self.clicks.dispatch(chart, hit) {
                        self.control_panel.last_click = Some(event.log_line());
                    }
                }
            }
        });
    }
}
