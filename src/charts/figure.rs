//! Figure Model
//! The chart handle produced by the plotter: ordered traces plus a layout.

use serde::{Deserialize, Serialize};

use super::ChartType;

/// Values of one axis of a trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum SeriesData {
    Numeric(Vec<Option<f64>>),
    /// Epoch milliseconds
    Temporal(Vec<Option<i64>>),
    Labels(Vec<Option<String>>),
}

impl SeriesData {
    pub fn len(&self) -> usize {
        match self {
            SeriesData::Numeric(v) => v.len(),
            SeriesData::Temporal(v) => v.len(),
            SeriesData::Labels(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_labels(&self) -> bool {
        matches!(self, SeriesData::Labels(_))
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, SeriesData::Temporal(_))
    }
}

/// One plotted data series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub kind: ChartType,
    pub x: SeriesData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<SeriesData>,
}

/// Figure-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub show_legend: bool,
    #[serde(default)]
    pub x_axis_title: Option<String>,
    #[serde(default)]
    pub y_axis_title: Option<String>,
}

/// Rendered chart handle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    data: Vec<Trace>,
    layout: Layout,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Traces in plotting order.
    pub fn data(&self) -> &[Trace] {
        &self.data
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn title(&self) -> Option<&str> {
        self.layout.title.as_deref()
    }

    pub fn add_trace(&mut self, trace: Trace) -> &mut Self {
        self.data.push(trace);
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.layout.title = Some(title.into());
        self
    }

    pub fn show_legend(&mut self, show: bool) -> &mut Self {
        self.layout.show_legend = show;
        self
    }

    pub fn set_axis_titles(&mut self, x: impl Into<String>, y: Option<String>) -> &mut Self {
        self.layout.x_axis_title = Some(x.into());
        self.layout.y_axis_title = y;
        self
    }

    /// Consume the figure, returning its traces.
    pub fn into_traces(self) -> Vec<Trace> {
        self.data
    }

    /// Serialize as `{"data": [...], "layout": {...}}`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
