//! Chart vocabulary.
//!
//! A single enum backs both the suggestion labels ("Bar Chart") and the request
//! tokens ("bar"), so a suggestion can always be turned into a valid request.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::data::ColumnKind;

/// Chart types understood by the advisor and the plotter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Bar,
    Scatter,
    Histogram,
}

/// Error returned when parsing an unknown request token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported chart type: {0}")]
pub struct UnknownChartType(pub String);

impl ChartType {
    pub const ALL: [ChartType; 4] = [
        ChartType::Line,
        ChartType::Bar,
        ChartType::Scatter,
        ChartType::Histogram,
    ];

    /// Chart suggested for a column of the given kind.
    pub fn suggested_for(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Numeric => ChartType::Histogram,
            ColumnKind::Temporal => ChartType::Line,
            ColumnKind::Categorical => ChartType::Bar,
            ColumnKind::Other => ChartType::Scatter,
        }
    }

    /// Token accepted by `generate_chart`.
    pub fn token(self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Scatter => "scatter",
            ChartType::Histogram => "histogram",
        }
    }

    /// Label shown in column suggestions.
    pub fn label(self) -> &'static str {
        match self {
            ChartType::Line => "Time Series",
            ChartType::Bar => "Bar Chart",
            ChartType::Scatter => "Scatter Plot",
            ChartType::Histogram => "Histogram",
        }
    }

    /// Leading part of a generated chart title.
    pub fn title_prefix(self) -> &'static str {
        match self {
            ChartType::Line => "Line Chart",
            ChartType::Bar => "Bar Chart",
            ChartType::Scatter => "Scatter Plot",
            ChartType::Histogram => "Histogram",
        }
    }

    /// Whether the chart plots a y column. Histograms count x values only.
    pub fn uses_y(self) -> bool {
        !matches!(self, ChartType::Histogram)
    }

    /// Title for a chart of `x` against `y`.
    ///
    /// Histograms ignore `y`; two-axis charts without a `y` drop the "vs" clause.
    pub fn title(self, x: &str, y: Option<&str>) -> String {
        match y {
            Some(y) if self.uses_y() => format!("{}: {} vs {}", self.title_prefix(), x, y),
            _ => format!("{}: {}", self.title_prefix(), x),
        }
    }
}

impl FromStr for ChartType {
    type Err = UnknownChartType;

    /// Case-sensitive match on request tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChartType::ALL
            .into_iter()
            .find(|t| t.token() == s)
            .ok_or_else(|| UnknownChartType(s.to_string()))
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
