//! Data Processor Module
//! Projects metric rows into one named series per statistic for a given view.

use super::row::{Metric, MetricRow, ViewMode};

/// Values of one statistic across all rows, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub metric: Metric,
    pub values: Vec<Option<f64>>,
    /// Values as written in the source, for display.
    pub texts: Vec<Option<String>>,
}

impl Series {
    pub fn name(&self) -> &'static str {
        self.metric.legend_label()
    }
}

/// Labels plus one series per metric, all of the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Projection {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

impl Projection {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn series(&self, metric: Metric) -> Option<&Series> {
        self.series.iter().find(|s| s.metric == metric)
    }
}

pub struct DataProcessor;

impl DataProcessor {
    /// Select the raw or `orgs_` fields of every row.
    ///
    /// Series come out in `Metric::ALL` order and each has exactly
    /// `rows.len()` entries; missing values stay `None`.
    pub fn project(rows: &[MetricRow], mode: ViewMode) -> Projection {
        let labels = rows.iter().map(|row| row.label.clone()).collect();
        let series = Metric::ALL
            .iter()
            .map(|&metric| Series {
                metric,
                values: rows.iter().map(|row| row.view(mode).get(metric)).collect(),
                texts: rows
                    .iter()
                    .map(|row| row.view(mode).display_value(metric))
                    .collect(),
            })
            .collect();

        Projection { labels, series }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, raw_tt: f64, orgs_tt: f64) -> MetricRow {
        let mut row = MetricRow::new(label);
        row.raw.top_tier_size = Some(raw_tt);
        row.orgs.top_tier_size = Some(orgs_tt);
        row.raw.blocking.mean = Some(raw_tt / 2.0);
        row.orgs.blocking.mean = Some(orgs_tt / 2.0);
        row
    }

    #[test]
    fn raw_and_merged_select_their_fields() {
        let rows = vec![row("2020-01", 5.0, 3.0)];

        let raw = DataProcessor::project(&rows, ViewMode::Raw);
        let top = raw.series(Metric::TopTierSize).unwrap();
        assert_eq!(top.name(), "|top tier|");
        assert_eq!(top.values, vec![Some(5.0)]);

        let merged = DataProcessor::project(&rows, ViewMode::MergedByOrganization);
        assert_eq!(
            merged.series(Metric::TopTierSize).unwrap().values,
            vec![Some(3.0)]
        );
        assert_eq!(
            merged.series(Metric::BlockingMean).unwrap().values,
            vec![Some(1.5)]
        );
    }

    #[test]
    fn every_series_matches_row_count() {
        let rows: Vec<MetricRow> = (0..12)
            .map(|i| row(&format!("2020-{:02}", i + 1), i as f64, i as f64 / 2.0))
            .collect();

        for mode in ViewMode::ALL {
            let projection = DataProcessor::project(&rows, mode);
            assert_eq!(projection.len(), rows.len());
            assert_eq!(projection.series.len(), Metric::ALL.len());
            for series in &projection.series {
                assert_eq!(series.values.len(), rows.len());
                assert_eq!(series.texts.len(), rows.len());
            }
        }
    }

    #[test]
    fn series_follow_metric_order() {
        let projection = DataProcessor::project(&[], ViewMode::Raw);
        let order: Vec<Metric> = projection.series.iter().map(|s| s.metric).collect();
        assert_eq!(order, Metric::ALL.to_vec());
        assert!(projection.is_empty());
    }

    #[test]
    fn missing_values_pass_through() {
        let mut sparse = MetricRow::new("2020-03");
        sparse.orgs.splitting.min = Some(1.0);
        let projection = DataProcessor::project(&[sparse], ViewMode::MergedByOrganization);

        assert_eq!(
            projection.series(Metric::SplittingMin).unwrap().values,
            vec![Some(1.0)]
        );
        assert_eq!(
            projection.series(Metric::SplittingMax).unwrap().values,
            vec![None]
        );
        assert_eq!(projection.labels, vec!["2020-03".to_string()]);
    }

    #[test]
    fn texts_follow_the_view() {
        let mut row = MetricRow::new("2020-04");
        row.raw.set_cell(Metric::BlockingMean, Some("3.50"));
        row.orgs.set_cell(Metric::BlockingMean, Some("2.0"));

        let raw = DataProcessor::project(std::slice::from_ref(&row), ViewMode::Raw);
        let mean = raw.series(Metric::BlockingMean).unwrap();
        assert_eq!(mean.values, vec![Some(3.5)]);
        assert_eq!(mean.texts, vec![Some("3.50".to_string())]);
        assert_eq!(raw.series(Metric::TopTierSize).unwrap().texts, vec![None]);

        let merged = DataProcessor::project(&[row], ViewMode::MergedByOrganization);
        assert_eq!(
            merged.series(Metric::BlockingMean).unwrap().texts,
            vec![Some("2.0".to_string())]
        );
    }
}
