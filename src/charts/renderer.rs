//! Static Chart Renderer
//! Renders the topology chart to an image file with plotters.
//!
//! Layout:
//! 1. Title caption for the selected view
//! 2. Shaded blocking/splitting bands
//! 3. Stepped lines for top tier and the means
//! 4. Legend with the non-band series

use super::chart_data::{ChartData, SeriesColor};
use super::plotter::ChartPlotter;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Chart drawing failed: {0}")]
    Backend(String),
}

fn backend_err(err: impl std::fmt::Display) -> RenderError {
    RenderError::Backend(err.to_string())
}

/// Image format picked from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => ImageFormat::Svg,
            _ => ImageFormat::Png,
        }
    }
}

fn plotters_color(color: SeriesColor) -> RGBAColor {
    RGBAColor(color.r, color.g, color.b, color.a as f64 / 255.0)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `chart` to `path`; `.svg` selects vector output, anything else PNG.
    pub fn render_to_file(
        chart: &ChartData,
        path: &Path,
        size: (u32, u32),
    ) -> Result<(), RenderError> {
        log::info!(
            "Exporting chart '{}' to {} ({}x{})",
            chart.title,
            path.display(),
            size.0,
            size.1
        );

        match ImageFormat::from_path(path) {
            ImageFormat::Svg => Self::draw(chart, SVGBackend::new(path, size).into_drawing_area()),
            ImageFormat::Png => {
                Self::draw(chart, BitMapBackend::new(path, size).into_drawing_area())
            }
        }
    }

    fn draw<DB: DrawingBackend>(
        chart: &ChartData,
        root: DrawingArea<DB, Shift>,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(backend_err)?;

        let x_max = chart.len().saturating_sub(1).max(1) as f64;
        let y_max = chart.y_upper_bound() * 1.05;
        let labels = chart.labels.clone();

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 22))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0f64..x_max, 0f64..y_max)
            .map_err(backend_err)?;

        ctx.configure_mesh()
            .disable_x_mesh()
            .x_labels(chart.len().clamp(2, 12))
            .x_label_formatter(&|x| ChartPlotter::category_label(&labels, *x))
            .draw()
            .map_err(backend_err)?;

        let regions = chart.fill_regions();
        ctx.draw_series(regions.iter().map(|region| {
            Rectangle::new(
                [(region.x0, region.low), (region.x1, region.high)],
                plotters_color(region.color).filled(),
            )
        }))
        .map_err(backend_err)?;

        for (idx, styled) in chart.series.iter().enumerate() {
            if !styled.visible || styled.style.line_width <= 0.0 {
                continue;
            }
            let style = plotters_color(styled.style.line_color)
                .stroke_width(styled.style.line_width.round() as u32);

            let mut labelled = !styled.in_legend();
            for segment in chart.step_segments(idx) {
                let drawn = ctx
                    .draw_series(LineSeries::new(
                        segment.into_iter().map(|[x, y]| (x, y)),
                        style,
                    ))
                    .map_err(backend_err)?;
                if !labelled {
                    drawn
                        .label(styled.name())
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
                    labelled = true;
                }
            }
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(backend_err)?;

        root.present().map_err(backend_err)?;
        Ok(())
    }
}
