//! Charts module - Chart model and rendering

mod chart_data;
mod plotter;
mod renderer;

pub use chart_data::{ChartData, PointHit};
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
