//! Chart Model Module
//! Styled, renderer independent description of the topology chart.

use crate::data::{Metric, Projection, Series, ViewMode};
use egui::{Color32, Pos2};

/// Pointer distance in screen pixels within which a click selects a point.
pub const HIT_RADIUS: f32 = 5.0;

/// Unmultiplied RGBA color shared by the interactive and static renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SeriesColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn to_color32(self) -> Color32 {
        Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }
}

pub const TOP_TIER_COLOR: SeriesColor = SeriesColor::rgb(70, 105, 90);
pub const BLOCKING_COLOR: SeriesColor = SeriesColor::rgb(35, 90, 130);
pub const SPLITTING_COLOR: SeriesColor = SeriesColor::rgb(190, 85, 45);
/// 35% opacity for the shaded bands
const LIGHT_ALPHA: u8 = 89;

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub line_color: SeriesColor,
    /// Zero hides the line and leaves only the band.
    pub line_width: f32,
    pub fill_color: Option<SeriesColor>,
    /// Series whose line this one is shaded towards.
    pub fill_target: Option<Metric>,
}

impl SeriesStyle {
    pub fn for_metric(metric: Metric) -> Self {
        let blocking_light = BLOCKING_COLOR.with_alpha(LIGHT_ALPHA);
        let splitting_light = SPLITTING_COLOR.with_alpha(LIGHT_ALPHA);

        match metric {
            Metric::TopTierSize => Self {
                line_color: TOP_TIER_COLOR,
                line_width: 2.0,
                fill_color: None,
                fill_target: None,
            },
            Metric::BlockingMean => Self {
                line_color: BLOCKING_COLOR,
                line_width: 2.0,
                fill_color: Some(blocking_light),
                fill_target: Some(Metric::TopTierSize),
            },
            Metric::BlockingMin | Metric::BlockingMax => Self {
                line_color: blocking_light,
                line_width: 0.0,
                fill_color: Some(blocking_light),
                fill_target: Some(Metric::BlockingMean),
            },
            Metric::SplittingMean => Self {
                line_color: SPLITTING_COLOR,
                line_width: 2.0,
                fill_color: Some(splitting_light),
                fill_target: Some(Metric::BlockingMax),
            },
            Metric::SplittingMin | Metric::SplittingMax => Self {
                line_color: splitting_light,
                line_width: 0.0,
                fill_color: Some(splitting_light),
                fill_target: Some(Metric::SplittingMean),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledSeries {
    pub series: Series,
    pub style: SeriesStyle,
    /// Hidden series are not drawn, filled or hit tested.
    pub visible: bool,
}

impl StyledSeries {
    pub fn name(&self) -> &'static str {
        self.series.name()
    }

    pub fn in_legend(&self) -> bool {
        self.series.metric.in_legend()
    }
}

/// Shaded rectangle between two series over one step interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillRegion {
    pub x0: f64,
    pub x1: f64,
    pub low: f64,
    pub high: f64,
    pub color: SeriesColor,
}

/// A plotted point selected by the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointHit {
    pub series: usize,
    pub index: usize,
}

/// Everything needed to draw the chart for one view.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub title: String,
    pub mode: ViewMode,
    pub labels: Vec<String>,
    pub series: Vec<StyledSeries>,
}

impl ChartData {
    pub fn new(projection: Projection, mode: ViewMode) -> Self {
        let series = projection
            .series
            .into_iter()
            .map(|series| StyledSeries {
                style: SeriesStyle::for_metric(series.metric),
                series,
                visible: true,
            })
            .collect();

        Self {
            title: mode.title().to_string(),
            mode,
            labels: projection.labels,
            series,
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn value_at(&self, series: usize, index: usize) -> Option<f64> {
        self.series.get(series)?.series.values.get(index).copied().flatten()
    }

    /// The value as written in the source, falling back to its decimal form.
    pub fn value_text_at(&self, series: usize, index: usize) -> Option<String> {
        let value = self.value_at(series, index)?;
        let text = self.series[series].series.texts.get(index).cloned().flatten();
        Some(text.unwrap_or_else(|| value.to_string()))
    }

    fn series_index(&self, metric: Metric) -> Option<usize> {
        self.series.iter().position(|s| s.series.metric == metric)
    }

    pub fn is_visible(&self, series: usize) -> bool {
        self.series.get(series).is_some_and(|s| s.visible)
    }

    pub fn set_visible(&mut self, series: usize, visible: bool) {
        if let Some(styled) = self.series.get_mut(series) {
            styled.visible = visible;
        }
    }

    pub fn toggle_visible(&mut self, series: usize) {
        let visible = self.is_visible(series);
        self.set_visible(series, !visible);
    }

    /// Series a band is shaded towards. A hidden target passes the band on
    /// to its own target; the chain ends without a fill at a series that
    /// has none or at a cycle.
    pub fn resolved_fill_target(&self, series: usize) -> Option<usize> {
        let mut visited = vec![series];
        let mut target = self.series_index(self.series.get(series)?.style.fill_target?)?;

        while !visited.contains(&target) {
            let styled = &self.series[target];
            if styled.visible {
                return Some(target);
            }
            visited.push(target);
            target = self.series_index(styled.style.fill_target?)?;
        }
        None
    }

    /// Largest plotted value, never below 1 so an all-zero chart keeps an axis.
    pub fn y_upper_bound(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.series.values.iter().flatten())
            .fold(1.0_f64, |acc, &v| acc.max(v))
    }

    /// Stepped polylines of a series. A value holds until the next x position,
    /// where the line jumps to the next value. Missing values split the line.
    pub fn step_segments(&self, series: usize) -> Vec<Vec<[f64; 2]>> {
        let Some(styled) = self.series.get(series) else {
            return Vec::new();
        };
        let values = &styled.series.values;

        let mut segments = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();

        for (i, value) in values.iter().enumerate() {
            let Some(y) = *value else {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                continue;
            };

            let x = i as f64;
            if current.is_empty() {
                current.push([x, y]);
            }
            if let Some(Some(next)) = values.get(i + 1) {
                current.push([x + 1.0, y]);
                current.push([x + 1.0, *next]);
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        segments
    }

    /// Shaded bands: for every visible series with a fill target, one
    /// rectangle per step interval where both series are drawn on both ends.
    pub fn fill_regions(&self) -> Vec<FillRegion> {
        let mut regions = Vec::new();

        for (idx, styled) in self.series.iter().enumerate() {
            if !styled.visible {
                continue;
            }
            let Some(color) = styled.style.fill_color else {
                continue;
            };
            let Some(target_idx) = self.resolved_fill_target(idx) else {
                continue;
            };
            let target_values = &self.series[target_idx].series.values;

            let own_values = &styled.series.values;
            for i in 0..self.len().saturating_sub(1) {
                let own = own_values.get(i).copied().flatten();
                let other = target_values.get(i).copied().flatten();
                let continues = own_values.get(i + 1).copied().flatten().is_some()
                    && target_values.get(i + 1).copied().flatten().is_some();
                if let (Some(a), Some(b), true) = (own, other, continues) {
                    if a != b {
                        regions.push(FillRegion {
                            x0: i as f64,
                            x1: i as f64 + 1.0,
                            low: a.min(b),
                            high: a.max(b),
                            color,
                        });
                    }
                }
            }
        }

        regions
    }

    /// First plotted point, in series then index order, lying strictly
    /// closer than `radius` pixels to `pointer`.
    ///
    /// `to_screen` maps plot coordinates to screen coordinates. Hidden series
    /// are skipped. An earlier series wins even when a later one is nearer.
    pub fn hit_test(
        &self,
        pointer: Pos2,
        to_screen: impl Fn(f64, f64) -> Pos2,
        radius: f32,
    ) -> Option<PointHit> {
        self.series
            .iter()
            .enumerate()
            .filter(|(_, styled)| styled.visible)
            .find_map(|(series, styled)| {
                styled
                    .series
                    .values
                    .iter()
                    .enumerate()
                    .find(|(index, value)| {
                        value.is_some_and(|y| {
                            to_screen(*index as f64, y).distance(pointer) < radius
                        })
                    })
                    .map(|(index, _)| PointHit { series, index })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataProcessor, MetricRow};

    fn chart(top_tier: &[Option<f64>]) -> ChartData {
        let rows: Vec<MetricRow> = top_tier
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut row = MetricRow::new(format!("t{}", i));
                row.raw.top_tier_size = *v;
                row.raw.blocking.mean = v.map(|v| v - 1.0);
                row.raw.blocking.min = v.map(|v| v - 2.0);
                row.raw.blocking.max = *v;
                row
            })
            .collect();
        ChartData::new(DataProcessor::project(&rows, ViewMode::Raw), ViewMode::Raw)
    }

    // 10 px per unit on both axes
    fn scale(x: f64, y: f64) -> Pos2 {
        Pos2::new((x * 10.0) as f32, (y * 10.0) as f32)
    }

    #[test]
    fn title_follows_view() {
        let merged = ChartData::new(Projection::default(), ViewMode::MergedByOrganization);
        assert_eq!(
            merged.title,
            "Merged by organization (nodes by the same organization count as 1)"
        );
        assert!(merged.is_empty());
        assert_eq!(merged.y_upper_bound(), 1.0);
    }

    #[test]
    fn stepped_segments_split_on_gaps() {
        let data = chart(&[Some(1.0), Some(2.0), None, Some(3.0)]);
        let segments = data.step_segments(0);

        assert_eq!(
            segments,
            vec![
                vec![[0.0, 1.0], [1.0, 1.0], [1.0, 2.0]],
                vec![[3.0, 3.0]],
            ]
        );
        assert!(data.step_segments(99).is_empty());
    }

    #[test]
    fn bands_fill_towards_target() {
        let data = chart(&[Some(5.0), Some(6.0), Some(7.0)]);
        let regions = data.fill_regions();

        // min band at t0 spans from min (3) up to the mean (4)
        let mean_band: Vec<&FillRegion> = regions
            .iter()
            .filter(|r| r.x0 == 0.0 && r.low == 3.0)
            .collect();
        assert_eq!(mean_band.len(), 1);
        assert_eq!(mean_band[0].high, 4.0);
        assert_eq!(mean_band[0].x1, 1.0);

        // two intervals for each of mean, min and max
        assert_eq!(regions.len(), 6);
        assert!(regions.iter().all(|r| r.x1 <= 2.0));
    }

    #[test]
    fn bands_skip_missing_values() {
        let data = chart(&[Some(5.0), None, Some(7.0), Some(7.0)]);
        let regions = data.fill_regions();
        assert!(!regions.is_empty());
        assert!(regions.iter().all(|r| r.x0 == 2.0));
    }

    #[test]
    fn hit_inside_radius() {
        let data = chart(&[Some(5.0), Some(6.0)]);
        let hit = data.hit_test(Pos2::new(12.0, 61.0), scale, HIT_RADIUS);
        // top tier and blocking max share (1, 6); the earlier series wins
        assert_eq!(hit, Some(PointHit { series: 0, index: 1 }));
        assert_eq!(data.label_at(1), Some("t1"));
        assert_eq!(data.value_at(0, 1), Some(6.0));
    }

    #[test]
    fn first_series_in_range_wins() {
        let data = chart(&[Some(5.0), Some(6.0)]);
        // 5 px per unit: top tier (1, 6) -> (5, 30), blocking mean (1, 5) -> (5, 25)
        let half_scale = |x: f64, y: f64| Pos2::new((x * 5.0) as f32, (y * 5.0) as f32);
        let hit = data.hit_test(Pos2::new(5.0, 26.0), half_scale, HIT_RADIUS);
        // the mean is nearer but the top tier comes first
        assert_eq!(hit, Some(PointHit { series: 0, index: 1 }));
    }

    #[test]
    fn radius_is_exclusive() {
        let data = chart(&[Some(5.0), Some(6.0)]);
        // exactly 5 px from (0, 5) -> (0, 50)
        assert_eq!(data.hit_test(Pos2::new(3.0, 54.0), scale, HIT_RADIUS), None);
        assert_eq!(
            data.hit_test(Pos2::new(3.0, 53.0), scale, HIT_RADIUS),
            Some(PointHit { series: 0, index: 0 })
        );
    }

    #[test]
    fn hidden_series_are_not_hittable() {
        let mut data = chart(&[Some(5.0), Some(6.0)]);
        data.set_visible(0, false);
        // blocking max shares (1, 6) with the hidden top tier
        let hit = data.hit_test(Pos2::new(12.0, 61.0), scale, HIT_RADIUS);
        assert_eq!(hit, Some(PointHit { series: 3, index: 1 }));

        data.toggle_visible(0);
        assert!(data.is_visible(0));
        let hit = data.hit_test(Pos2::new(12.0, 61.0), scale, HIT_RADIUS);
        assert_eq!(hit, Some(PointHit { series: 0, index: 1 }));
    }

    #[test]
    fn hidden_target_passes_the_band_on() {
        let mut data = chart(&[Some(5.0), Some(6.0), Some(7.0)]);

        // without the mean, the min band reaches the top tier
        data.set_visible(1, false);
        assert_eq!(data.resolved_fill_target(2), Some(0));
        let regions = data.fill_regions();
        // max equals top tier, so only the two min intervals remain
        assert_eq!(regions.len(), 2);
        assert!(regions.iter().all(|r| r.high - r.low == 2.0));

        // without the top tier, the mean has nothing to fill towards
        data.set_visible(1, true);
        data.set_visible(0, false);
        assert_eq!(data.resolved_fill_target(1), None);
        assert_eq!(data.resolved_fill_target(2), Some(1));
        assert_eq!(data.fill_regions().len(), 4);
    }

    #[test]
    fn value_text_prefers_source_spelling() {
        let mut row = MetricRow::new("2020-01");
        row.raw.set_cell(Metric::TopTierSize, Some("3.50"));
        row.raw.blocking.mean = Some(2.0);
        let data = ChartData::new(DataProcessor::project(&[row], ViewMode::Raw), ViewMode::Raw);

        assert_eq!(data.value_text_at(0, 0).as_deref(), Some("3.50"));
        assert_eq!(data.value_text_at(1, 0).as_deref(), Some("2"));
        assert_eq!(data.value_text_at(2, 0), None);
    }

    #[test]
    fn miss_outside_radius() {
        let data = chart(&[Some(5.0), Some(6.0)]);
        assert_eq!(data.hit_test(Pos2::new(5.0, 80.0), scale, HIT_RADIUS), None);
    }

    #[test]
    fn missing_values_are_not_hittable() {
        let data = chart(&[None, Some(6.0)]);
        assert_eq!(data.hit_test(Pos2::new(0.0, 0.0), scale, HIT_RADIUS), None);
        assert_eq!(data.value_at(0, 0), None);
    }
}
