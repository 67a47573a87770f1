//! CSV Data Loader Module
//! Fetches the metrics CSV from disk or over HTTP and parses it using Polars.

use super::row::{Metric, MetricRow, ViewMode, LABEL_COLUMN};
use polars::prelude::*;
use std::fmt;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to fetch CSV: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("CSV has no 'label' column")]
    MissingLabelColumn,
}

/// Where the metrics CSV lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvSource {
    File(PathBuf),
    Url(String),
}

impl CsvSource {
    /// Classify a user supplied string: `http://` and `https://` are URLs,
    /// everything else is a local path.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            CsvSource::Url(trimmed.to_string())
        } else {
            CsvSource::File(PathBuf::from(trimmed))
        }
    }
}

impl fmt::Display for CsvSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvSource::File(path) => write!(f, "{}", path.display()),
            CsvSource::Url(url) => f.write_str(url),
        }
    }
}

/// Rows parsed from one CSV source.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub source: CsvSource,
    pub rows: Vec<MetricRow>,
    /// Metric columns absent from the header; their values are all missing.
    pub missing_columns: Vec<String>,
}

/// Holds the currently loaded dataset.
pub struct DataLoader {
    dataset: Option<LoadedDataset>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { dataset: None }
    }

    /// Fetch and parse a source. Blocking; the GUI calls this from a worker thread.
    pub fn load(source: &CsvSource, timeout: Duration) -> Result<LoadedDataset, LoaderError> {
        log::info!("Loading metrics CSV from {}", source);
        let bytes = Self::fetch_bytes(source, timeout)?;
        let (rows, missing_columns) = Self::parse_rows(bytes)?;

        if !missing_columns.is_empty() {
            log::warn!(
                "CSV from {} lacks columns: {}",
                source,
                missing_columns.join(", ")
            );
        }
        log::info!("Loaded {} rows from {}", rows.len(), source);

        Ok(LoadedDataset {
            source: source.clone(),
            rows,
            missing_columns,
        })
    }

    /// Read the raw CSV bytes from disk or over HTTP.
    pub fn fetch_bytes(source: &CsvSource, timeout: Duration) -> Result<Vec<u8>, LoaderError> {
        match source {
            CsvSource::File(path) => std::fs::read(path).map_err(|source| LoaderError::Io {
                path: path.clone(),
                source,
            }),
            CsvSource::Url(url) => {
                let client = reqwest::blocking::Client::builder()
                    .timeout(timeout)
                    .build()?;
                let response = client.get(url).send()?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoaderError::HttpStatus {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.bytes()?.to_vec())
            }
        }
    }

    /// Parse CSV bytes into rows.
    ///
    /// Every column is read as text so labels and values keep the spelling
    /// of the file. Cells that are empty or not numeric become `None`. A
    /// metric column missing from the header yields `None` for every row and
    /// is reported in the returned list; only a missing `label` column is an
    /// error.
    pub fn parse_rows(bytes: Vec<u8>) -> Result<(Vec<MetricRow>, Vec<String>), LoaderError> {
        // A zero-length inference window reads every column as String
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        let label_col = df
            .column(LABEL_COLUMN)
            .map_err(|_| LoaderError::MissingLabelColumn)?;
        let labels = label_col.cast(&DataType::String)?;
        let mut rows: Vec<MetricRow> = labels
            .str()?
            .into_iter()
            .map(|label| MetricRow::new(label.unwrap_or_default()))
            .collect();

        let mut missing_columns = Vec::new();
        for mode in ViewMode::ALL {
            for metric in Metric::ALL {
                let name = mode.column_name(metric);
                let Ok(column) = df.column(&name) else {
                    missing_columns.push(name);
                    continue;
                };

                let cells = column.cast(&DataType::String)?;
                for (row, cell) in rows.iter_mut().zip(cells.str()?.into_iter()) {
                    row.view_mut(mode).set_cell(metric, cell);
                }
            }
        }

        Ok((rows, missing_columns))
    }

    pub fn set_dataset(&mut self, dataset: LoadedDataset) {
        self.dataset = Some(dataset);
    }

    pub fn dataset(&self) -> Option<&LoadedDataset> {
        self.dataset.as_ref()
    }

    pub fn rows(&self) -> &[MetricRow] {
        self.dataset
            .as_ref()
            .map(|d| d.rows.as_slice())
            .unwrap_or_default()
    }

    pub fn row_count(&self) -> usize {
        self.rows().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "label,top_tier_size,mbs_mean,mbs_min,mbs_max,mss_mean,mss_min,mss_max,\
orgs_top_tier_size,orgs_mbs_mean,orgs_mbs_min,orgs_mbs_max,orgs_mss_mean,orgs_mss_min,orgs_mss_max";

    fn csv(lines: &[&str]) -> Vec<u8> {
        let mut text = String::from(HEADER);
        for line in lines {
            text.push('\n');
            text.push_str(line);
        }
        text.push('\n');
        text.into_bytes()
    }

    #[test]
    fn parses_both_views() {
        let bytes = csv(&[
            "2020-01,5,3.5,2,6,2.5,1,4,3,2,1,3,1.5,1,2",
            "2020-02,6,4,3,7,3,2,5,4,2.5,2,3,2,1,3",
        ]);
        let (rows, missing) = DataLoader::parse_rows(bytes).unwrap();

        assert!(missing.is_empty());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "2020-01");
        assert_eq!(rows[0].raw.top_tier_size, Some(5.0));
        assert_eq!(rows[0].raw.blocking.mean, Some(3.5));
        assert_eq!(rows[0].orgs.top_tier_size, Some(3.0));
        assert_eq!(rows[0].orgs.splitting.mean, Some(1.5));
        assert_eq!(rows[1].raw.splitting.max, Some(5.0));
    }

    #[test]
    fn bad_cells_become_missing() {
        let bytes = csv(&[
            "2020-01,5,n/a,2,6,2.5,1,4,3,2,1,3,1.5,1,2",
            "2020-02,6,4,3,7,,2,5,4,2.5,2,3,2,1,3",
        ]);
        let (rows, _) = DataLoader::parse_rows(bytes).unwrap();

        assert_eq!(rows[0].raw.blocking.mean, None);
        assert_eq!(rows[1].raw.blocking.mean, Some(4.0));
        assert_eq!(rows[1].raw.splitting.mean, None);
        assert_eq!(rows[0].raw.splitting.mean, Some(2.5));
    }

    #[test]
    fn missing_metric_columns_are_reported() {
        let bytes = b"label,top_tier_size,orgs_top_tier_size\n2020-01,5,3\n".to_vec();
        let (rows, missing) = DataLoader::parse_rows(bytes).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].raw.top_tier_size, Some(5.0));
        assert_eq!(rows[0].raw.blocking.max, None);
        assert_eq!(missing.len(), 12);
        assert!(missing.contains(&"orgs_mss_min".to_string()));
        assert!(!missing.contains(&"top_tier_size".to_string()));
    }

    #[test]
    fn missing_label_column_is_an_error() {
        let bytes = b"top_tier_size,orgs_top_tier_size\n5,3\n".to_vec();
        assert!(matches!(
            DataLoader::parse_rows(bytes),
            Err(LoaderError::MissingLabelColumn)
        ));
    }

    #[test]
    fn numeric_labels_stay_text() {
        let bytes = b"label,top_tier_size\n1577836800,5\n1580515200,6\n".to_vec();
        let (rows, _) = DataLoader::parse_rows(bytes).unwrap();
        assert_eq!(rows[0].label, "1577836800");
        assert_eq!(rows[1].label, "1580515200");
    }

    #[test]
    fn decimal_labels_keep_trailing_zeros() {
        let bytes = b"label,top_tier_size\n2020.10,5\n2020.20,6\n".to_vec();
        let (rows, _) = DataLoader::parse_rows(bytes).unwrap();
        assert_eq!(rows[0].label, "2020.10");
        assert_eq!(rows[1].label, "2020.20");
    }

    #[test]
    fn values_keep_cell_text() {
        let bytes = b"label,top_tier_size,mbs_mean\n2020-01,5.0,3.50\n".to_vec();
        let (rows, _) = DataLoader::parse_rows(bytes).unwrap();

        assert_eq!(rows[0].raw.top_tier_size, Some(5.0));
        assert_eq!(
            rows[0].raw.display_value(Metric::TopTierSize).as_deref(),
            Some("5.0")
        );
        assert_eq!(
            rows[0].raw.display_value(Metric::BlockingMean).as_deref(),
            Some("3.50")
        );
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&csv(&["2020-01,5,3.5,2,6,2.5,1,4,3,2,1,3,1.5,1,2"]))
            .unwrap();

        let source = CsvSource::File(file.path().to_path_buf());
        let dataset = DataLoader::load(&source, Duration::from_secs(1)).unwrap();

        assert_eq!(dataset.source, source);
        assert_eq!(dataset.rows.len(), 1);

        let mut loader = DataLoader::new();
        assert_eq!(loader.row_count(), 0);
        loader.set_dataset(dataset);
        assert_eq!(loader.row_count(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = CsvSource::File(PathBuf::from("/nonexistent/metrics.csv"));
        assert!(matches!(
            DataLoader::load(&source, Duration::from_secs(1)),
            Err(LoaderError::Io { .. })
        ));
    }

    #[test]
    fn classifies_sources() {
        assert_eq!(
            CsvSource::parse("https://example.org/top_tier.csv"),
            CsvSource::Url("https://example.org/top_tier.csv".to_string())
        );
        assert_eq!(
            CsvSource::parse(" HTTP://example.org/a.csv "),
            CsvSource::Url("HTTP://example.org/a.csv".to_string())
        );
        assert_eq!(
            CsvSource::parse("data/metrics.csv"),
            CsvSource::File(PathBuf::from("data/metrics.csv"))
        );
    }
}
