//! Data module - CSV loading and series projection

mod loader;
mod processor;
mod row;

pub use loader::{CsvSource, DataLoader, LoadedDataset};
pub use processor::{DataProcessor, Projection, Series};
pub use row::{Metric, MetricRow, ViewMode};
