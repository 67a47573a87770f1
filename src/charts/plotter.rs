//! Chart Plotter Module
//! Draws the interactive topology chart using egui_plot.

use super::chart_data::{ChartData, PointHit, HIT_RADIUS};
use egui::Stroke;
use egui_plot::{Line, Plot, PlotPoint, PlotPoints, Polygon};

/// Headroom above the largest value so the top line is not glued to the frame
const Y_HEADROOM: f64 = 1.05;

/// Creates the stepped line chart using egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Text shown under an x grid mark: the row label at integer positions.
    pub fn category_label(labels: &[String], value: f64) -> String {
        let rounded = value.round();
        if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }

    /// Draw the chart and resolve a click to the plotted point under the pointer.
    pub fn draw_line_chart(ui: &mut egui::Ui, chart: &ChartData) -> Option<PointHit> {
        let axis_labels = chart.labels.clone();
        let hover_labels = chart.labels.clone();
        let last_x = chart.len().saturating_sub(1) as f64;

        let plot_response = Plot::new(format!("topology_{:?}", chart.mode))
            .include_x(0.0)
            .include_x(last_x)
            .include_y(0.0)
            .include_y(chart.y_upper_bound() * Y_HEADROOM)
            .allow_scroll(false)
            .x_axis_formatter(move |mark, _range| {
                Self::category_label(&axis_labels, mark.value)
            })
            .label_formatter(move |name, value| {
                let label = Self::category_label(&hover_labels, value.x.round());
                if name.is_empty() {
                    format!("{}\n{:.2}", label, value.y)
                } else {
                    format!("{}\n{}: {:.2}", label, name, value.y)
                }
            })
            .show(ui, |plot_ui| {
                // Bands first so the lines stay on top
                for region in chart.fill_regions() {
                    let corners = vec![
                        [region.x0, region.low],
                        [region.x1, region.low],
                        [region.x1, region.high],
                        [region.x0, region.high],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(corners))
                            .fill_color(region.color.to_color32())
                            .stroke(Stroke::NONE),
                    );
                }

                for (idx, styled) in chart.series.iter().enumerate() {
                    if !styled.visible || styled.style.line_width <= 0.0 {
                        continue;
                    }
                    let color = styled.style.line_color.to_color32();

                    for segment in chart.step_segments(idx) {
                        let mut line = Line::new(PlotPoints::new(segment))
                            .color(color)
                            .width(styled.style.line_width);
                        // Named lines get a hover label
                        if styled.in_legend() {
                            line = line.name(styled.name());
                        }
                        plot_ui.line(line);
                    }
                }
            });

        let response = &plot_response.response;
        if !response.clicked() {
            return None;
        }
        let pointer = response.interact_pointer_pos()?;
        let transform = &plot_response.transform;

        chart.hit_test(
            pointer,
            |x, y| transform.position_from_point(&PlotPoint::new(x, y)),
            HIT_RADIUS,
        )
    }
}
