//! Metric Row Module
//! Typed rows of topology metrics and the column naming scheme.

use std::collections::HashMap;

/// Name of the time-series key column.
pub const LABEL_COLUMN: &str = "label";

/// Which node view a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Each physical node counts as 1
    #[default]
    Raw,
    /// Nodes run by the same organization count as 1
    MergedByOrganization,
}

impl ViewMode {
    pub const ALL: [ViewMode; 2] = [ViewMode::Raw, ViewMode::MergedByOrganization];

    pub fn from_merge_flag(merge: bool) -> Self {
        if merge {
            ViewMode::MergedByOrganization
        } else {
            ViewMode::Raw
        }
    }

    /// Column prefix used by this view in the CSV header.
    pub fn column_prefix(&self) -> &'static str {
        match self {
            ViewMode::Raw => "",
            ViewMode::MergedByOrganization => "orgs_",
        }
    }

    pub fn column_name(&self, metric: Metric) -> String {
        format!("{}{}", self.column_prefix(), metric.column_suffix())
    }

    pub fn title(&self) -> &'static str {
        match self {
            ViewMode::Raw => "Raw nodes (each physical node counts as 1)",
            ViewMode::MergedByOrganization => {
                "Merged by organization (nodes by the same organization count as 1)"
            }
        }
    }
}

/// One plotted statistic. Declaration order is the series order of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    TopTierSize,
    BlockingMean,
    BlockingMin,
    BlockingMax,
    SplittingMean,
    SplittingMin,
    SplittingMax,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::TopTierSize,
        Metric::BlockingMean,
        Metric::BlockingMin,
        Metric::BlockingMax,
        Metric::SplittingMean,
        Metric::SplittingMin,
        Metric::SplittingMax,
    ];

    pub fn column_suffix(&self) -> &'static str {
        match self {
            Metric::TopTierSize => "top_tier_size",
            Metric::BlockingMean => "mbs_mean",
            Metric::BlockingMin => "mbs_min",
            Metric::BlockingMax => "mbs_max",
            Metric::SplittingMean => "mss_mean",
            Metric::SplittingMin => "mss_min",
            Metric::SplittingMax => "mss_max",
        }
    }

    pub fn legend_label(&self) -> &'static str {
        match self {
            Metric::TopTierSize => "|top tier|",
            Metric::BlockingMean => "mean(|minimal blocking sets|)",
            Metric::BlockingMin => "min(|minimal blocking sets|)",
            Metric::BlockingMax => "max(|minimal blocking sets|)",
            Metric::SplittingMean => "mean(|minimal splitting sets|)",
            Metric::SplittingMin => "min(|minimal splitting sets|)",
            Metric::SplittingMax => "max(|minimal splitting sets|)",
        }
    }

    /// Min/max bounds are drawn as shaded bands only and stay out of the legend.
    pub fn in_legend(&self) -> bool {
        let label = self.legend_label();
        !label.starts_with("min") && !label.starts_with("max")
    }
}

/// Mean, min and max cardinality of a family of minimal sets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SetSizeStats {
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// All metrics of one row for a single view.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewMetrics {
    pub top_tier_size: Option<f64>,
    pub blocking: SetSizeStats,
    pub splitting: SetSizeStats,
    /// Cell text as written in the CSV, kept for display.
    cell_text: HashMap<Metric, String>,
}

impl ViewMetrics {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::TopTierSize => self.top_tier_size,
            Metric::BlockingMean => self.blocking.mean,
            Metric::BlockingMin => self.blocking.min,
            Metric::BlockingMax => self.blocking.max,
            Metric::SplittingMean => self.splitting.mean,
            Metric::SplittingMin => self.splitting.min,
            Metric::SplittingMax => self.splitting.max,
        }
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        let slot = match metric {
            Metric::TopTierSize => &mut self.top_tier_size,
            Metric::BlockingMean => &mut self.blocking.mean,
            Metric::BlockingMin => &mut self.blocking.min,
            Metric::BlockingMax => &mut self.blocking.max,
            Metric::SplittingMean => &mut self.splitting.mean,
            Metric::SplittingMin => &mut self.splitting.min,
            Metric::SplittingMax => &mut self.splitting.max,
        };
        *slot = value;
        self.cell_text.remove(&metric);
    }

    /// Store a CSV cell. Text that is not a finite number leaves the value missing.
    pub fn set_cell(&mut self, metric: Metric, text: Option<&str>) {
        let text = text.map(str::trim).unwrap_or_default();
        let value = text.parse::<f64>().ok().filter(|v| v.is_finite());
        self.set(metric, value);
        if value.is_some() {
            self.cell_text.insert(metric, text.to_string());
        }
    }

    /// The value as it appeared in the CSV, or its decimal form when it was
    /// set programmatically.
    pub fn display_value(&self, metric: Metric) -> Option<String> {
        let value = self.get(metric)?;
        Some(
            self.cell_text
                .get(&metric)
                .cloned()
                .unwrap_or_else(|| value.to_string()),
        )
    }
}

/// A single time sample with both views.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricRow {
    pub label: String,
    pub raw: ViewMetrics,
    pub orgs: ViewMetrics,
}

impl MetricRow {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn view(&self, mode: ViewMode) -> &ViewMetrics {
        match mode {
            ViewMode::Raw => &self.raw,
            ViewMode::MergedByOrganization => &self.orgs,
        }
    }

    pub fn view_mut(&mut self, mode: ViewMode) -> &mut ViewMetrics {
        match mode {
            ViewMode::Raw => &mut self.raw,
            ViewMode::MergedByOrganization => &mut self.orgs,
        }
    }
}
