//! Click Dispatch Module
//! Turns a clicked chart point into a log line and forwards its label.

use crate::charts::{ChartData, PointHit};

/// Receives the time label of every clicked point.
pub trait LabelSink {
    fn forward(&mut self, label: &str);
}

/// Used when no click target is configured; the dispatcher's log line is all that happens.
pub struct LogOnlySink;

impl LabelSink for LogOnlySink {
    fn forward(&mut self, label: &str) {
        log::debug!("No click target configured, dropping label {}", label);
    }
}

/// Opens a URL built from a template in the system browser.
/// Every `{label}` in the template is replaced by the clicked label.
pub struct OpenUrlSink {
    template: String,
}

impl OpenUrlSink {
    pub const PLACEHOLDER: &'static str = "{label}";

    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn url_for(&self, label: &str) -> String {
        self.template.replace(Self::PLACEHOLDER, label)
    }
}

impl LabelSink for OpenUrlSink {
    fn forward(&mut self, label: &str) {
        let url = self.url_for(label);
        log::debug!("Opening {}", url);
        if let Err(e) = open::that(&url) {
            log::error!("Failed to open {}: {}", url, e);
        }
    }
}

/// A resolved click on a plotted point.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub label: String,
    pub value: f64,
    /// The value as written in the source CSV.
    pub value_text: String,
}

impl ClickEvent {
    pub fn log_line(&self) -> String {
        format!("Clicked: {} - {}", self.label, self.value_text)
    }
}

pub struct ClickDispatcher {
    sink: Box<dyn LabelSink>,
}

impl ClickDispatcher {
    pub fn new(sink: Box<dyn LabelSink>) -> Self {
        Self { sink }
    }

    /// `OpenUrlSink` when a template is given, `LogOnlySink` otherwise.
    pub fn from_template(template: Option<&str>) -> Self {
        match template {
            Some(template) => Self::new(Box::new(OpenUrlSink::new(template))),
            None => Self::new(Box::new(LogOnlySink)),
        }
    }

    /// Log the clicked point and forward its label. Returns `None` when the
    /// hit does not refer to a plotted value of `chart`.
    pub fn dispatch(&mut self, chart: &ChartData, hit: PointHit) -> Option<ClickEvent> {
        let label = chart.label_at(hit.index)?;
        let value = chart.value_at(hit.series, hit.index)?;
        let value_text = chart.value_text_at(hit.series, hit.index)?;

        let event = ClickEvent {
            label: label.to_string(),
            value,
            value_text,
        };
        log::info!("{}", event.log_line());
        self.sink.forward(&event.label);

        Some(event)
    }
}
