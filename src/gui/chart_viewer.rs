//! Chart Viewer Widget
//! Central panel that owns the current chart and draws it with egui_plot.

use crate::charts::{ChartData, ChartPlotter, PointHit};
use egui::RichText;

/// Owns at most one chart. A new render replaces the previous chart instead
/// of drawing next to it.
#[derive(Default)]
pub struct ChartViewer {
    chart: Option<ChartData>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chart(&self) -> Option<&ChartData> {
        self.chart.as_ref()
    }

    /// Dispose of the current chart and install `chart` in its place.
    pub fn replace_chart(&mut self, chart: ChartData) {
        if let Some(previous) = self.chart.take() {
            log::debug!(
                "Disposing chart '{}' ({} points)",
                previous.title,
                previous.len()
            );
        }
        log::debug!("Mounting chart '{}' ({} points)", chart.title, chart.len());
        self.chart = Some(chart);
    }

    pub fn clear(&mut self) {
        if let Some(previous) = self.chart.take() {
            log::debug!("Disposing chart '{}'", previous.title);
        }
    }

    /// Draw the chart; returns the point hit by a click in this frame.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<PointHit> {
        let Some(chart) = &self.chart else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return None;
        };

        ui.vertical_centered(|ui| {
            ui.label(RichText::new(&chart.title).size(16.0).strong());
        });
        ui.add_space(8.0);

        if let Some(series) = Self::show_legend(ui, chart) {
            self.toggle_series(series);
        }
        ui.add_space(8.0);

        let chart = self.chart.as_ref()?;
        ChartPlotter::draw_line_chart(ui, chart)
    }

    /// Legend of the non-band series; returns the entry clicked this frame.
    fn show_legend(ui: &mut egui::Ui, chart: &ChartData) -> Option<usize> {
        let mut clicked = None;

        ui.horizontal(|ui| {
            for (idx, styled) in chart.series.iter().enumerate() {
                if !styled.in_legend() {
                    continue;
                }

                // Color square
                let (rect, square) =
                    ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::click());
                ui.painter()
                    .rect_filled(rect, 3.0, styled.style.line_color.to_color32());

                let mut text = RichText::new(styled.name()).size(13.0);
                if !styled.visible {
                    text = text.strikethrough().weak();
                }
                let label = ui.add(egui::Label::new(text).sense(egui::Sense::click()));

                if square.clicked() || label.clicked() {
                    clicked = Some(idx);
                }
                ui.add_space(12.0);
            }
        });

        clicked
    }

    /// Show or hide one series of the current chart.
    pub fn toggle_series(&mut self, series: usize) {
        if let Some(chart) = self.chart.as_mut() {
            chart.toggle_visible(series);
            log::debug!(
                "Series {} is now {}",
                series,
                if chart.is_visible(series) { "shown" } else { "hidden" }
            );
        }
    }
}
